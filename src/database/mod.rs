//! Member stores. Every store reads the whole member table and overwrites it
//! wholesale on save; callers must serialize load -> modify -> save sequences.

pub mod db;
pub mod db_structs;
pub mod error;
pub mod file_store;
pub mod memory_store;

use tracing::error;

use crate::model::structures::member_record::MemberRecord;
use error::PersistenceError;

#[allow(async_fn_in_trait)]
pub trait MemberStore {
    /// Reads the full member set
    async fn load_members(&self) -> Result<Vec<MemberRecord>, PersistenceError>;

    /// Replaces the full member set with `members`
    async fn save_members(&self, members: &[MemberRecord]) -> Result<(), PersistenceError>;
}

/// Loads all members, reporting a failure and returning an empty set instead.
/// Only suitable for read-only views: saving after a failed load would wipe the store.
pub async fn load_or_empty<S: MemberStore>(store: &S) -> Vec<MemberRecord> {
    match store.load_members().await {
        Ok(members) => members,
        Err(e) => {
            error!("Failed to load members: {}", e);
            Vec::new()
        }
    }
}

/// Saves all members, reporting a failure instead of propagating it.
/// Returns whether the store accepted the write; nothing is retried.
pub async fn save_or_report<S: MemberStore>(store: &S, members: &[MemberRecord]) -> bool {
    match store.save_members(members).await {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to save {} members: {}", members.len(), e);
            false
        }
    }
}
