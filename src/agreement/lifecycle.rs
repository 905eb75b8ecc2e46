use super::{Agreement, AgreementStatus, Signature, SignerRole};
use crate::error::QuickPactError;
use chrono::{DateTime, Utc};
use tracing::debug;

impl Agreement {
    /// Record `signer_name`'s signature in `role`, stamped now.
    pub fn add_signature(
        &mut self,
        role: SignerRole,
        signer_name: &str,
    ) -> Result<AgreementStatus, QuickPactError> {
        self.add_signature_at(role, signer_name, Utc::now())
    }

    /// Record a signature with an explicit timestamp.
    ///
    /// A role can be signed once. Party signatures drive the status forward;
    /// a witness signature never changes it. A fully signed agreement is
    /// closed to further signatures.
    pub fn add_signature_at(
        &mut self,
        role: SignerRole,
        signer_name: &str,
        signed_at: DateTime<Utc>,
    ) -> Result<AgreementStatus, QuickPactError> {
        let signer_name = signer_name.trim();
        if signer_name.is_empty() {
            return Err(QuickPactError::ValidationError(
                "signer_name must not be empty".to_string(),
            ));
        }
        if let Some(existing) = self.signatures.get(&role) {
            return Err(QuickPactError::AlreadySigned {
                role: role.to_string(),
                signer_name: existing.signer_name.clone(),
            });
        }
        if self.is_fully_signed() {
            return Err(QuickPactError::ValidationError(format!(
                "agreement {} is fully signed and can no longer be changed",
                self.id
            )));
        }

        let previous = self.status;
        self.signatures.insert(
            role,
            Signature {
                signer_name: signer_name.to_string(),
                signed_at,
            },
        );
        self.status = AgreementStatus::from_signatures(&self.signatures);
        self.updated_at = signed_at;
        debug_assert!(self.status >= previous, "status moved backwards");

        debug!(
            "agreement {} signed as {} ({} -> {})",
            self.id, role, previous, self.status
        );
        Ok(self.status)
    }
}
