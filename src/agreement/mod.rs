//! The agreement record and the types that make up its lifecycle.

pub mod lifecycle;

use crate::error::QuickPactError;
use crate::extract::ExtractedFields;
use chrono::{DateTime, Utc};
use getset::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumString};

/// Prefix every agreement id carries.
pub const AGREEMENT_ID_PREFIX: &str = "qp_";

/// Lifecycle stage of an agreement. Ordered: a status only ever moves to a
/// greater value.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
pub enum AgreementStatus {
    #[strum(serialize = "draft")]
    Draft,
    #[strum(serialize = "partially_signed")]
    PartiallySigned,
    #[strum(serialize = "fully_signed")]
    FullySigned,
}

impl AgreementStatus {
    /// Human label, e.g. "Partially Signed".
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            AgreementStatus::Draft => "Draft",
            AgreementStatus::PartiallySigned => "Partially Signed",
            AgreementStatus::FullySigned => "Fully Signed",
        }
    }

    /// Lenient parse for list filters: case-insensitive, spaces and hyphens
    /// count as underscores.
    #[must_use]
    pub fn parse_filter(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase().replace([' ', '-'], "_");
        AgreementStatus::from_str(&key).ok()
    }

    /// Status implied by a set of signatures. Only the two parties count.
    #[must_use]
    pub fn from_signatures(signatures: &BTreeMap<SignerRole, Signature>) -> Self {
        let party1 = signatures.contains_key(&SignerRole::Party1);
        let party2 = signatures.contains_key(&SignerRole::Party2);
        match (party1, party2) {
            (true, true) => AgreementStatus::FullySigned,
            (false, false) => AgreementStatus::Draft,
            _ => AgreementStatus::PartiallySigned,
        }
    }
}

/// Who is signing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
pub enum SignerRole {
    #[serde(rename = "party1")]
    #[strum(serialize = "party1")]
    Party1,
    #[serde(rename = "party2")]
    #[strum(serialize = "party2")]
    Party2,
    #[serde(rename = "witness")]
    #[strum(serialize = "witness")]
    Witness,
}

impl SignerRole {
    /// Parse a caller-supplied role, failing with `InvalidRole`.
    pub fn parse(raw: &str) -> Result<Self, QuickPactError> {
        SignerRole::from_str(&raw.trim().to_lowercase()).map_err(|_| {
            QuickPactError::InvalidRole {
                role: raw.to_string(),
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub signer_name: String,
    pub signed_at: DateTime<Utc>,
}

/// Validated, trimmed input for a new agreement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAgreement {
    pub party1: String,
    pub party2: String,
    pub terms: String,
    pub deadline: String,
}

impl NewAgreement {
    /// Trim every field and reject blank parties or terms. `min_terms_length`
    /// counts characters; 0 disables the length check.
    pub fn validate(
        party1: &str,
        party2: &str,
        terms: &str,
        deadline: &str,
        min_terms_length: usize,
    ) -> Result<Self, QuickPactError> {
        let party1 = party1.trim();
        let party2 = party2.trim();
        let terms = terms.trim();

        if party1.is_empty() {
            return Err(QuickPactError::ValidationError(
                "party1 must not be empty".to_string(),
            ));
        }
        if party2.is_empty() {
            return Err(QuickPactError::ValidationError(
                "party2 must not be empty".to_string(),
            ));
        }
        if terms.is_empty() {
            return Err(QuickPactError::ValidationError(
                "terms must not be empty".to_string(),
            ));
        }
        if terms.chars().count() < min_terms_length {
            return Err(QuickPactError::ValidationError(format!(
                "Agreement terms must be at least {} characters long",
                min_terms_length
            )));
        }

        Ok(NewAgreement {
            party1: party1.to_string(),
            party2: party2.to_string(),
            terms: terms.to_string(),
            deadline: deadline.trim().to_string(),
        })
    }
}

/// A micro-agreement between two parties.
///
/// Everything except `status`, `signatures` and `updated_at` is fixed at
/// creation. Those three only change through [`Agreement::add_signature`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct Agreement {
    id: String,
    party1: String,
    party2: String,
    terms: String,
    extracted: ExtractedFields,
    deadline_raw: String,
    status: AgreementStatus,
    signatures: BTreeMap<SignerRole, Signature>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    shareable_url: String,
}

impl Agreement {
    /// A fresh `Draft` with no signatures.
    pub fn new(
        id: String,
        input: NewAgreement,
        extracted: ExtractedFields,
        shareable_url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Agreement {
            id,
            party1: input.party1,
            party2: input.party2,
            terms: input.terms,
            extracted,
            deadline_raw: input.deadline,
            status: AgreementStatus::Draft,
            signatures: BTreeMap::new(),
            created_at,
            updated_at: created_at,
            shareable_url,
        }
    }

    /// `qp_` followed by eight hex characters of a random v4 UUID.
    #[must_use]
    pub fn generate_id() -> String {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        format!("{}{}", AGREEMENT_ID_PREFIX, &hex[..8])
    }

    /// True when `party` names either party, case-insensitively, as a substring.
    #[must_use]
    pub fn involves(&self, party: &str) -> bool {
        let needle = party.trim().to_lowercase();
        self.party1.to_lowercase().contains(&needle) || self.party2.to_lowercase().contains(&needle)
    }

    #[must_use]
    pub fn signature(&self, role: SignerRole) -> Option<&Signature> {
        self.signatures.get(&role)
    }

    #[must_use]
    pub fn is_fully_signed(&self) -> bool {
        self.status == AgreementStatus::FullySigned
    }
}
