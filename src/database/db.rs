use super::{db_structs::MemberRow, error::PersistenceError, MemberStore};
use crate::{
    model::structures::{member_record::MemberRecord, outcome_kind::OutcomeKind},
    utils::progress_utils::progress_bar
};
use std::sync::Arc;
use tokio_postgres::{Client, Error, NoTls, Row};
use tracing::{error, info, warn};

const CREATE_MEMBERS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS members (
        position INT NOT NULL,
        display_name TEXT PRIMARY KEY,
        external_id TEXT NOT NULL DEFAULT 'N/A',
        rank TEXT NOT NULL,
        cycle_week INT NOT NULL DEFAULT 1,
        accumulated_score DOUBLE PRECISION NOT NULL DEFAULT 0,
        weekly_score DOUBLE PRECISION NOT NULL DEFAULT 0,
        bonus DOUBLE PRECISION NOT NULL DEFAULT 0,
        multiplier DOUBLE PRECISION NOT NULL DEFAULT 1,
        lifetime_score DOUBLE PRECISION NOT NULL DEFAULT 0,
        outcome INT NOT NULL DEFAULT 0,
        outcome_week INT NOT NULL DEFAULT 1,
        outcome_total INT NOT NULL DEFAULT 1,
        last_updated TIMESTAMPTZ NOT NULL DEFAULT now()
    );";

#[derive(Clone)]
pub struct DbClient {
    client: Arc<Client>
}

impl DbClient {
    // Connect to the database and return a DbClient instance
    pub async fn connect(connection_str: &str) -> Result<Self, Error> {
        let (client, connection) = tokio_postgres::connect(connection_str, NoTls).await?;

        // Spawn the connection object to run in the background
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {}", e);
            }
        });

        Ok(DbClient {
            client: Arc::new(client)
        })
    }

    pub fn client(&self) -> Arc<Client> {
        self.client.clone()
    }

    /// Creates the members table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), PersistenceError> {
        self.client.batch_execute(CREATE_MEMBERS_TABLE).await?;
        Ok(())
    }

    fn row_from_sql(row: &Row) -> Result<MemberRow, PersistenceError> {
        let display_name: String = row.try_get("display_name")?;
        let outcome_code: i32 = row.try_get("outcome")?;
        let outcome = OutcomeKind::try_from(outcome_code).map_err(|_| PersistenceError::InvalidRow {
            name: display_name.clone(),
            reason: format!("unknown outcome code {}", outcome_code)
        })?;

        Ok(MemberRow {
            display_name,
            external_id: row.try_get("external_id")?,
            rank: row.try_get("rank")?,
            cycle_week: row.try_get("cycle_week")?,
            accumulated_score: row.try_get("accumulated_score")?,
            weekly_score: row.try_get("weekly_score")?,
            bonus: row.try_get("bonus")?,
            multiplier: row.try_get("multiplier")?,
            lifetime_score: row.try_get("lifetime_score")?,
            outcome,
            outcome_week: row.try_get("outcome_week")?,
            outcome_total: row.try_get("outcome_total")?,
            last_updated: row.try_get("last_updated")?
        })
    }

    /// Body of the save transaction; the caller owns BEGIN and ROLLBACK
    async fn replace_rows(&self, rows: &[MemberRow]) -> Result<(), PersistenceError> {
        self.client.batch_execute("TRUNCATE TABLE members").await?;

        let statement = self
            .client
            .prepare(
                "INSERT INTO members (position, display_name, external_id, rank, cycle_week, \
                accumulated_score, weekly_score, bonus, multiplier, lifetime_score, outcome, \
                outcome_week, outcome_total, last_updated) \
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"
            )
            .await?;

        let p_bar = progress_bar(rows.len() as u64, "Saving members to db".to_string());

        for (i, row) in rows.iter().enumerate() {
            let position = i as i32;
            let outcome = row.outcome as i32;

            self.client
                .execute(
                    &statement,
                    &[
                        &position,
                        &row.display_name,
                        &row.external_id,
                        &row.rank,
                        &row.cycle_week,
                        &row.accumulated_score,
                        &row.weekly_score,
                        &row.bonus,
                        &row.multiplier,
                        &row.lifetime_score,
                        &outcome,
                        &row.outcome_week,
                        &row.outcome_total,
                        &row.last_updated
                    ]
                )
                .await?;

            if let Some(bar) = &p_bar {
                bar.inc(1);
            }
        }

        if let Some(bar) = p_bar {
            bar.finish_and_clear();
        }

        self.client.batch_execute("COMMIT").await?;
        Ok(())
    }
}

impl MemberStore for DbClient {
    async fn load_members(&self) -> Result<Vec<MemberRecord>, PersistenceError> {
        info!("Fetching members...");
        let rows = self
            .client
            .query("SELECT * FROM members ORDER BY position, display_name", &[])
            .await?;

        let members = rows
            .iter()
            .map(|row| Self::row_from_sql(row).and_then(MemberRecord::try_from))
            .collect::<Result<Vec<_>, _>>()?;

        info!("Fetched {} members", members.len());
        Ok(members)
    }

    /// Truncates and refills the members table inside a single transaction
    async fn save_members(&self, members: &[MemberRecord]) -> Result<(), PersistenceError> {
        let rows: Vec<MemberRow> = members.iter().map(MemberRow::from).collect();

        self.client.batch_execute("BEGIN").await?;

        if let Err(e) = self.replace_rows(&rows).await {
            warn!("Rolling back member save: {}", e);
            // Leaves the connection usable for the next save attempt
            if let Err(rollback) = self.client.batch_execute("ROLLBACK").await {
                error!("Failed to roll back member save: {}", rollback);
            }
            return Err(e);
        }

        info!("Saved {} members", rows.len());
        Ok(())
    }
}
