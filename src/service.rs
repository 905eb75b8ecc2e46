//! The five QuickPact operations, independent of any transport.
//!
//! `AgreementService` owns its configuration and its store. Construct one per
//! process (or per test) and share it behind an `Arc`.

use crate::agreement::{Agreement, AgreementStatus, NewAgreement, SignerRole};
use crate::config::Config;
use crate::error::QuickPactError;
use crate::extract::{ExtractedFields, extract_fields};
use crate::storage::AgreementStore;
use crate::time_utils;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What `create_agreement` hands back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementSummary {
    pub agreement_id: String,
    pub status: AgreementStatus,
    pub status_label: String,
    pub party1: String,
    pub party2: String,
    pub extracted: ExtractedFields,
    pub deadline_raw: String,
    pub created_at: DateTime<Utc>,
    pub shareable_url: String,
}

impl From<&Agreement> for AgreementSummary {
    fn from(agreement: &Agreement) -> Self {
        AgreementSummary {
            agreement_id: agreement.id().clone(),
            status: *agreement.status(),
            status_label: agreement.status().label().to_string(),
            party1: agreement.party1().clone(),
            party2: agreement.party2().clone(),
            extracted: agreement.extracted().clone(),
            deadline_raw: agreement.deadline_raw().clone(),
            created_at: *agreement.created_at(),
            shareable_url: agreement.shareable_url().clone(),
        }
    }
}

/// Result of a successful signature.
#[derive(Debug, Clone, PartialEq)]
pub struct SignReceipt {
    pub role: SignerRole,
    pub signer_name: String,
    pub previous_status: AgreementStatus,
    pub agreement: Agreement,
}

#[derive(Debug)]
pub struct AgreementService {
    config: Config,
    store: AgreementStore,
}

impl AgreementService {
    pub fn new(config: Config, store: AgreementStore) -> Self {
        Self { config, store }
    }

    pub fn store(&self) -> &AgreementStore {
        &self.store
    }

    /// The configured identity value, returned verbatim.
    pub fn validate(&self) -> Result<String, QuickPactError> {
        self.config.my_number().map(str::to_string)
    }

    /// Create a `Draft` agreement from free text.
    pub fn create_agreement(
        &self,
        party1: &str,
        party2: &str,
        terms: &str,
        deadline: &str,
    ) -> Result<AgreementSummary, QuickPactError> {
        self.create_agreement_at(party1, party2, terms, deadline, time_utils::now_utc())
    }

    /// Like [`AgreementService::create_agreement`] with an explicit creation
    /// time. Relative deadlines resolve against its calendar day.
    pub fn create_agreement_at(
        &self,
        party1: &str,
        party2: &str,
        terms: &str,
        deadline: &str,
        created_at: DateTime<Utc>,
    ) -> Result<AgreementSummary, QuickPactError> {
        let input = NewAgreement::validate(
            party1,
            party2,
            terms,
            deadline,
            self.config.min_terms_length(),
        )?;

        let extracted = extract_fields(&input.terms, &input.deadline, created_at.date_naive());
        let id = Agreement::generate_id();
        let shareable_url = self.config.share_url(&id);
        let agreement = Agreement::new(id, input, extracted, shareable_url, created_at);

        self.store.insert(agreement.clone())?;
        info!(
            agreement_id = %agreement.id(),
            amount = ?agreement.extracted().amount,
            deadline = ?agreement.extracted().deadline,
            "Agreement created"
        );
        Ok(AgreementSummary::from(&agreement))
    }

    /// Sign `agreement_id` as `signer_role`.
    ///
    /// Checks run in order: signer name, role, then the record itself.
    pub fn sign_agreement(
        &self,
        agreement_id: &str,
        signer_name: &str,
        signer_role: &str,
    ) -> Result<SignReceipt, QuickPactError> {
        let signer_name = signer_name.trim();
        if signer_name.is_empty() {
            return Err(QuickPactError::ValidationError(
                "signer_name must not be empty".to_string(),
            ));
        }
        let role = SignerRole::parse(signer_role)?;
        let agreement_id = agreement_id.trim();

        let (agreement, previous_status) = self.store.update(agreement_id, |agreement| {
            let previous = *agreement.status();
            agreement.add_signature(role, signer_name)?;
            Ok(previous)
        })?;

        info!(
            agreement_id = %agreement_id,
            role = %role,
            status = %agreement.status(),
            "Agreement signed"
        );
        Ok(SignReceipt {
            role,
            signer_name: signer_name.to_string(),
            previous_status,
            agreement,
        })
    }

    pub fn get_agreement(&self, agreement_id: &str) -> Result<Agreement, QuickPactError> {
        self.store.get(agreement_id.trim())
    }

    /// Never fails. Blank filters are ignored; an unrecognised status matches
    /// nothing.
    pub fn list_agreements(
        &self,
        filter_party: Option<&str>,
        filter_status: Option<&str>,
    ) -> Vec<Agreement> {
        let filter_party = filter_party.map(str::trim).filter(|p| !p.is_empty());
        let filter_status = filter_status.map(str::trim).filter(|s| !s.is_empty());

        let status = match filter_status {
            Some(raw) => match AgreementStatus::parse_filter(raw) {
                Some(status) => Some(status),
                None => {
                    debug!(filter_status = %raw, "unknown status filter, nothing matches");
                    return Vec::new();
                }
            },
            None => None,
        };

        self.store.list(filter_party, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn service() -> AgreementService {
        AgreementService::new(
            Config::builder().my_number("919876543210").build(),
            AgreementStore::new(),
        )
    }

    #[test]
    fn test_validate_returns_configured_number() {
        assert_eq!(service().validate().unwrap(), "919876543210");
        let unset = AgreementService::new(Config::builder().build(), AgreementStore::new());
        assert_eq!(unset.validate().unwrap_err().kind(), "config_missing");
    }

    #[test]
    fn test_create_resolves_deadline_against_creation_day() {
        let monday = Utc.with_ymd_and_hms(2025, 8, 11, 9, 30, 0).unwrap();
        let summary = service()
            .create_agreement_at(
                "Asha",
                "Ravi",
                "I'll design a logo by Friday, you'll pay ₹2000",
                "",
                monday,
            )
            .unwrap();
        assert_eq!(summary.status, AgreementStatus::Draft);
        assert_eq!(summary.extracted.amount, Some(2000.0));
        assert_eq!(
            summary.extracted.deadline,
            NaiveDate::from_ymd_opt(2025, 8, 15)
        );
        assert_eq!(summary.created_at, monday);
        assert!(summary.shareable_url.ends_with(&summary.agreement_id));
    }

    #[test]
    fn test_sign_checks_name_before_role_before_id() {
        let service = service();
        assert_eq!(
            service.sign_agreement("qp_missing", " ", "notary").unwrap_err().kind(),
            "validation_error"
        );
        assert_eq!(
            service.sign_agreement("qp_missing", "John", "notary").unwrap_err().kind(),
            "invalid_role"
        );
        assert_eq!(
            service.sign_agreement("qp_missing", "John", "party1").unwrap_err().kind(),
            "not_found"
        );
    }

    #[test]
    fn test_sign_receipt_reports_transition() {
        let service = service();
        let summary = service
            .create_agreement("John", "Jane", "Pay $50 for the report", "tomorrow")
            .unwrap();
        let receipt = service
            .sign_agreement(&summary.agreement_id, "John", "Party1")
            .unwrap();
        assert_eq!(receipt.role, SignerRole::Party1);
        assert_eq!(receipt.previous_status, AgreementStatus::Draft);
        assert_eq!(*receipt.agreement.status(), AgreementStatus::PartiallySigned);
        assert_eq!(service.get_agreement(&summary.agreement_id).unwrap(), receipt.agreement);
    }

    #[test]
    fn test_list_ignores_blank_filters_and_unknown_status_matches_nothing() {
        let service = service();
        service
            .create_agreement("John", "Jane", "Pay $50 for the report", "")
            .unwrap();
        assert_eq!(service.list_agreements(Some("  "), Some("")).len(), 1);
        assert!(service.list_agreements(None, Some("archived")).is_empty());
        assert_eq!(service.list_agreements(None, Some("Draft")).len(), 1);
    }
}
