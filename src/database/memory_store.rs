use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex
};

use crate::{
    database::{db_structs::MemberRow, error::PersistenceError, MemberStore},
    model::structures::member_record::MemberRecord
};

/// Process-local store holding rows in memory. Writes can be made to fail
/// to exercise persistence error handling.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<MemberRow>>,
    reject_writes: AtomicBool
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn with_members(members: &[MemberRecord]) -> MemoryStore {
        let store = MemoryStore::new();
        *store.lock_rows() = members.iter().map(MemberRow::from).collect();
        store
    }

    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<MemberRow> {
        self.lock_rows().clone()
    }

    fn lock_rows(&self) -> std::sync::MutexGuard<'_, Vec<MemberRow>> {
        // Rows are only ever replaced in one assignment
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MemberStore for MemoryStore {
    async fn load_members(&self) -> Result<Vec<MemberRecord>, PersistenceError> {
        self.rows().into_iter().map(MemberRecord::try_from).collect()
    }

    async fn save_members(&self, members: &[MemberRecord]) -> Result<(), PersistenceError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::WriteRejected("permission denied".to_string()));
        }

        *self.lock_rows() = members.iter().map(MemberRow::from).collect();
        Ok(())
    }
}
