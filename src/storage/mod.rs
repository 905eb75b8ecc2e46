//! In-memory agreement store.
//!
//! A single `RwLock` guards the map and its insertion order. Readers share the
//! lock, writers take it exclusively, so a reader never sees a half-applied
//! update. Contents live as long as the process.

pub mod jenv;

use crate::agreement::{Agreement, AgreementStatus};
use crate::error::QuickPactError;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error};

#[derive(Debug, Default)]
struct StoreInner {
    records: HashMap<String, Agreement>,
    order: Vec<String>,
}

#[derive(Debug, Default)]
pub struct AgreementStore {
    inner: RwLock<StoreInner>,
}

impl AgreementStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic inside a writer never leaves a partial record behind (see
    // `update`), so a poisoned lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a new record. Fails with `DuplicateId` if the id is taken.
    pub fn insert(&self, agreement: Agreement) -> Result<(), QuickPactError> {
        let mut inner = self.write();
        let id = agreement.id().clone();
        if inner.records.contains_key(&id) {
            error!(agreement_id = %id, "duplicate agreement id");
            return Err(QuickPactError::DuplicateId { agreement_id: id });
        }
        inner.order.push(id.clone());
        inner.records.insert(id.clone(), agreement);
        debug!(agreement_id = %id, total = inner.order.len(), "agreement stored");
        Ok(())
    }

    /// Snapshot of one record.
    pub fn get(&self, agreement_id: &str) -> Result<Agreement, QuickPactError> {
        self.read()
            .records
            .get(agreement_id)
            .cloned()
            .ok_or_else(|| QuickPactError::NotFound {
                agreement_id: agreement_id.to_string(),
            })
    }

    /// Records matching every given filter, in insertion order.
    ///
    /// `filter_party` matches either party as a case-insensitive substring.
    pub fn list(
        &self,
        filter_party: Option<&str>,
        filter_status: Option<AgreementStatus>,
    ) -> Vec<Agreement> {
        let inner = self.read();
        inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id))
            .filter(|a| filter_party.is_none_or(|party| a.involves(party)))
            .filter(|a| filter_status.is_none_or(|status| *a.status() == status))
            .cloned()
            .collect()
    }

    /// Apply `mutator` to the record atomically.
    ///
    /// The mutator runs on a copy under the write lock; the copy replaces the
    /// stored record only when the mutator returns `Ok`.
    pub fn update<T, F>(&self, agreement_id: &str, mutator: F) -> Result<(Agreement, T), QuickPactError>
    where
        F: FnOnce(&mut Agreement) -> Result<T, QuickPactError>,
    {
        let mut inner = self.write();
        let current = inner
            .records
            .get(agreement_id)
            .ok_or_else(|| QuickPactError::NotFound {
                agreement_id: agreement_id.to_string(),
            })?;
        let mut draft = current.clone();
        let outcome = mutator(&mut draft)?;
        inner
            .records
            .insert(agreement_id.to_string(), draft.clone());
        Ok((draft, outcome))
    }

    pub fn len(&self) -> usize {
        self.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agreement::{NewAgreement, SignerRole};
    use crate::extract::ExtractedFields;
    use chrono::Utc;

    fn agreement(id: &str, party1: &str, party2: &str) -> Agreement {
        let input =
            NewAgreement::validate(party1, party2, "Pay $50 for the report", "", 0).unwrap();
        Agreement::new(
            id.to_string(),
            input,
            ExtractedFields::default(),
            String::new(),
            Utc::now(),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let store = AgreementStore::new();
        assert!(store.is_empty());
        store.insert(agreement("qp_00000001", "John", "Jane")).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("qp_00000001").unwrap().party1(), "John");
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let store = AgreementStore::new();
        store.insert(agreement("qp_00000001", "John", "Jane")).unwrap();
        let err = store
            .insert(agreement("qp_00000001", "Bob", "Alice"))
            .unwrap_err();
        assert_eq!(err.kind(), "duplicate_id");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("qp_00000001").unwrap().party1(), "John");
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let store = AgreementStore::new();
        assert_eq!(store.get("qp_missing").unwrap_err().kind(), "not_found");
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let store = AgreementStore::new();
        for id in ["qp_0000000c", "qp_0000000a", "qp_0000000b"] {
            store.insert(agreement(id, "John", "Jane")).unwrap();
        }
        let ids: Vec<String> = store
            .list(None, None)
            .iter()
            .map(|a| a.id().clone())
            .collect();
        assert_eq!(ids, vec!["qp_0000000c", "qp_0000000a", "qp_0000000b"]);
    }

    #[test]
    fn test_list_filters_are_combined() {
        let store = AgreementStore::new();
        store.insert(agreement("qp_00000001", "John", "Jane")).unwrap();
        store.insert(agreement("qp_00000002", "Bob", "Jane")).unwrap();
        store
            .update("qp_00000002", |a| a.add_signature(SignerRole::Party1, "Bob"))
            .unwrap();

        assert_eq!(store.list(Some("jane"), None).len(), 2);
        assert_eq!(store.list(Some("bob"), None).len(), 1);
        let partial = store.list(Some("jane"), Some(AgreementStatus::PartiallySigned));
        assert_eq!(partial.len(), 1);
        assert_eq!(partial[0].id(), "qp_00000002");
        assert!(store
            .list(Some("john"), Some(AgreementStatus::FullySigned))
            .is_empty());
    }

    #[test]
    fn test_failed_update_leaves_record_untouched() {
        let store = AgreementStore::new();
        store.insert(agreement("qp_00000001", "John", "Jane")).unwrap();
        store
            .update("qp_00000001", |a| a.add_signature(SignerRole::Party1, "John"))
            .unwrap();
        let before = store.get("qp_00000001").unwrap();

        let err = store
            .update("qp_00000001", |a| a.add_signature(SignerRole::Party1, "Mallory"))
            .unwrap_err();
        assert_eq!(err.kind(), "already_signed");
        assert_eq!(store.get("qp_00000001").unwrap(), before);
    }

    #[test]
    fn test_update_unknown_is_not_found() {
        let store = AgreementStore::new();
        let err = store
            .update("qp_missing", |a| a.add_signature(SignerRole::Party1, "John"))
            .unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
