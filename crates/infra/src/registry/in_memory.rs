use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use certledger_core::{CertificateId, CourseId, Fingerprint, StudentId};
use certledger_registry::{
    Certificate, CertificateRepository, CertificateStatus, CourseCatalog, RegistryError,
    StudentDirectory,
};

/// In-memory registry backing all three collaborator traits.
///
/// Used for tests/dev and as the default registry in the API wiring; the
/// ledger services only see it through the trait seams, so it can be swapped
/// for persistent adapters without touching them.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    students: RwLock<HashMap<StudentId, String>>,
    courses: RwLock<HashMap<CourseId, String>>,
    certificates: RwLock<HashMap<CertificateId, Certificate>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_student(&self, name: impl Into<String>) -> StudentId {
        let id = StudentId::new();
        if let Ok(mut students) = self.students.write() {
            students.insert(id, name.into());
        }
        id
    }

    pub fn add_course(&self, name: impl Into<String>) -> CourseId {
        let id = CourseId::new();
        if let Ok(mut courses) = self.courses.write() {
            courses.insert(id, name.into());
        }
        id
    }

    /// Insert or replace a certificate record.
    ///
    /// Replacement models the external collaborator rewriting its own copy
    /// (which is exactly what tamper tests need to simulate).
    pub fn upsert_certificate(&self, certificate: Certificate) {
        if let Ok(mut certs) = self.certificates.write() {
            certs.insert(certificate.certificate_id.clone(), certificate);
        }
    }
}

#[async_trait]
impl CertificateRepository for InMemoryRegistry {
    async fn find(&self, id: &CertificateId) -> Result<Option<Certificate>, RegistryError> {
        let certs = self
            .certificates
            .read()
            .map_err(|_| RegistryError::Storage("lock poisoned".to_string()))?;
        Ok(certs.get(id).cloned())
    }

    async fn record_issuance(
        &self,
        id: &CertificateId,
        hash: &Fingerprint,
        block_number: u64,
    ) -> Result<(), RegistryError> {
        let mut certs = self
            .certificates
            .write()
            .map_err(|_| RegistryError::Storage("lock poisoned".to_string()))?;
        if let Some(cert) = certs.get_mut(id) {
            cert.ledger_hash = Some(hash.clone());
            cert.ledger_block_number = Some(block_number);
            cert.status = CertificateStatus::Verified;
        }
        Ok(())
    }
}

#[async_trait]
impl StudentDirectory for InMemoryRegistry {
    async fn student_name(&self, id: &StudentId) -> Result<Option<String>, RegistryError> {
        let students = self
            .students
            .read()
            .map_err(|_| RegistryError::Storage("lock poisoned".to_string()))?;
        Ok(students.get(id).cloned())
    }
}

#[async_trait]
impl CourseCatalog for InMemoryRegistry {
    async fn course_name(&self, id: &CourseId) -> Result<Option<String>, RegistryError> {
        let courses = self
            .courses
            .read()
            .map_err(|_| RegistryError::Storage("lock poisoned".to_string()))?;
        Ok(courses.get(id).cloned())
    }
}
