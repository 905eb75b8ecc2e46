use chrono::{NaiveDate, TimeZone, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use quickpact::config::Config;
use quickpact::extract::extract_fields;
use quickpact::service::AgreementService;
use quickpact::storage::AgreementStore;
use std::hint::black_box;

static BENCH_SAMPLE_SIZE: usize = 100;

const TEMPLATES: &[(&str, &str)] = &[
    ("I'll design a logo by Friday, you'll pay ₹{n}", ""),
    ("Pay ${n} for the report", "tomorrow"),
    ("I will translate the brochure for {n} euros within 2 weeks", ""),
    ("Task: fix the leaking tap. Fee £{n}. Deadline: end of month", ""),
    ("Walk the dog every morning for {n} days", "whenever you can"),
];

/// Deal texts cycling through the templates with varying amounts.
fn generate_terms(count: usize) -> Vec<(String, &'static str)> {
    (0..count)
        .map(|i| {
            let (template, deadline) = TEMPLATES[i % TEMPLATES.len()];
            (template.replace("{n}", &(100 + i * 37).to_string()), deadline)
        })
        .collect()
}

fn benchmark_extract(c: &mut Criterion) {
    let terms = generate_terms(BENCH_SAMPLE_SIZE);
    let today = NaiveDate::from_ymd_opt(2025, 8, 11).unwrap();
    c.bench_function("extract_fields", |b| {
        b.iter(|| {
            for (text, deadline) in &terms {
                black_box(extract_fields(text, deadline, today));
            }
        })
    });
}

fn benchmark_create_and_sign(c: &mut Criterion) {
    let terms = generate_terms(BENCH_SAMPLE_SIZE);
    let created_at = Utc.with_ymd_and_hms(2025, 8, 11, 9, 0, 0).unwrap();
    c.bench_function("create_and_sign", |b| {
        b.iter(|| {
            let service = AgreementService::new(
                Config::builder().min_terms_length(0).build(),
                AgreementStore::new(),
            );
            for (text, deadline) in &terms {
                let summary = service
                    .create_agreement_at("John", "Jane", text, deadline, created_at)
                    .unwrap();
                service
                    .sign_agreement(&summary.agreement_id, "John", "party1")
                    .unwrap();
                service
                    .sign_agreement(&summary.agreement_id, "Jane", "party2")
                    .unwrap();
            }
            black_box(service.list_agreements(None, Some("fully_signed")).len())
        })
    });
}

criterion_group!(benches, benchmark_extract, benchmark_create_and_sign);
criterion_main!(benches);
