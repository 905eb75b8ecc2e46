use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use quickpact::config::Config;
use quickpact::service::AgreementService;
use quickpact::storage::AgreementStore;

pub const TEST_NUMBER: &str = "919876543210";

/// A fresh service with its own empty store.
pub fn fresh_service() -> AgreementService {
    AgreementService::new(
        Config::builder().my_number(TEST_NUMBER).build(),
        AgreementStore::new(),
    )
}

/// Monday 2025-08-11, 09:00 UTC.
pub fn monday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 11, 9, 0, 0).unwrap()
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
