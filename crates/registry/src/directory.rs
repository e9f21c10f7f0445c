//! Name lookups for the display fields that go into a fingerprint.

use async_trait::async_trait;
use std::sync::Arc;

use certledger_core::{CourseId, StudentId};

use crate::RegistryError;

/// Read access to student display names.
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    /// `None` when the reference does not resolve (the caller degrades,
    /// it does not fail).
    async fn student_name(&self, id: &StudentId) -> Result<Option<String>, RegistryError>;
}

/// Read access to course display names.
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    async fn course_name(&self, id: &CourseId) -> Result<Option<String>, RegistryError>;
}

#[async_trait]
impl<S> StudentDirectory for Arc<S>
where
    S: StudentDirectory + ?Sized,
{
    async fn student_name(&self, id: &StudentId) -> Result<Option<String>, RegistryError> {
        (**self).student_name(id).await
    }
}

#[async_trait]
impl<C> CourseCatalog for Arc<C>
where
    C: CourseCatalog + ?Sized,
{
    async fn course_name(&self, id: &CourseId) -> Result<Option<String>, RegistryError> {
        (**self).course_name(id).await
    }
}
