use criterion::{black_box, criterion_group, criterion_main, Criterion};

use certledger_ledger::CertificateFacts;

fn bench_fingerprint(c: &mut Criterion) {
    let facts = CertificateFacts {
        student_name: "Alice Example".to_string(),
        course_name: "Algorithms and Data Structures".to_string(),
        grade: "A".to_string(),
        issue_date: "2024-01-01T00:00:00Z".to_string(),
        instructor_name: "Dr. Smith".to_string(),
    };

    c.bench_function("fingerprint_five_fields", |b| {
        b.iter(|| black_box(&facts).fingerprint())
    });
}

criterion_group!(benches, bench_fingerprint);
criterion_main!(benches);
