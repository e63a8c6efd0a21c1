use std::{
    io::ErrorKind,
    path::{Path, PathBuf}
};

use tracing::{debug, info};

use crate::{
    database::{db_structs::MemberRow, error::PersistenceError, MemberStore},
    model::structures::member_record::MemberRecord
};

/// Member table kept in a local JSON file, one object per row.
///
/// Saves go to a sibling temporary file that then replaces the table, so a
/// failed write never leaves a truncated file behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> JsonFileStore {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl MemberStore for JsonFileStore {
    async fn load_members(&self) -> Result<Vec<MemberRecord>, PersistenceError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No member table at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into())
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<MemberRow> = serde_json::from_str(&contents)?;
        debug!("Loaded {} member rows from {}", rows.len(), self.path.display());

        rows.into_iter().map(MemberRecord::try_from).collect()
    }

    async fn save_members(&self, members: &[MemberRecord]) -> Result<(), PersistenceError> {
        let rows: Vec<MemberRow> = members.iter().map(MemberRow::from).collect();
        let json = serde_json::to_string_pretty(&rows)?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        info!("Saved {} members to {}", rows.len(), self.path.display());
        Ok(())
    }
}
