//! Record Store - durable storage for submitted records.
//!
//! One SQLite table holds every record ever submitted. Approval flips the
//! `approved` flag; nothing is ever deleted. The pending queue is a *view*
//! (`approved = 0`), so an approved record disappears from the queue while
//! its row stays in the table.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row, params};
use signoff_types::{
    ApprovalTransition, ClientId, KnownClient, Record, RecordFields, RecordId, RecordStatus,
};
use thiserror::Error;

use crate::fs_guard::prepare_db_location;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(RecordId),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Filesystem(#[from] anyhow::Error),
}

/// SQLite-backed record store. Owns the process-wide connection.
pub struct RecordStore {
    db: Connection,
}

impl RecordStore {
    const SCHEMA: &'static str = r"
        CREATE TABLE IF NOT EXISTS records (
            id INTEGER PRIMARY KEY,
            client_id TEXT NOT NULL,
            field1 TEXT NOT NULL,
            field2 TEXT NOT NULL,
            field3 TEXT NOT NULL,
            field4 TEXT NOT NULL,
            approved INTEGER NOT NULL DEFAULT 0 CHECK (approved IN (0, 1))
        );

        CREATE INDEX IF NOT EXISTS idx_records_approved
        ON records(approved, id);
    ";

    const SELECT_COLUMNS: &'static str =
        "SELECT id, client_id, field1, field2, field3, field4, approved FROM records";

    /// Open or create the record database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        prepare_db_location(path)?;

        let db = Connection::open(path)?;
        tracing::info!(path = %path.display(), "Opened record store");
        Self::initialize(db)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let db = Connection::open_in_memory()?;
        Self::initialize(db)
    }

    fn initialize(db: Connection) -> Result<Self, StoreError> {
        db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL;")?;
        db.execute_batch(Self::SCHEMA)?;
        Ok(Self { db })
    }

    /// Persist a new pending record for a verified client.
    pub fn create(
        &mut self,
        client: &KnownClient,
        fields: &RecordFields,
    ) -> Result<RecordId, StoreError> {
        self.db.execute(
            "INSERT INTO records (client_id, field1, field2, field3, field4, approved)
             VALUES (?1, ?2, ?3, ?4, ?5, 0)",
            params![
                client.id().as_str(),
                &fields.field1,
                &fields.field2,
                &fields.field3,
                &fields.field4
            ],
        )?;

        let id = RecordId::new(self.db.last_insert_rowid());
        tracing::debug!(record_id = %id, client = %client.id(), "Inserted record");
        Ok(id)
    }

    /// Snapshot of every record still awaiting approval, oldest first.
    pub fn list_pending(&self) -> Result<Vec<Record>, StoreError> {
        let mut stmt = self.db.prepare(&format!(
            "{} WHERE approved = 0 ORDER BY id ASC",
            Self::SELECT_COLUMNS
        ))?;

        let records = stmt
            .query_map([], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn get(&self, id: RecordId) -> Result<Option<Record>, StoreError> {
        let record = self
            .db
            .query_row(
                &format!("{} WHERE id = ?1", Self::SELECT_COLUMNS),
                [id.value()],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Mark a record approved.
    ///
    /// Approving an already-approved record writes nothing and returns
    /// [`ApprovalTransition::AlreadyApproved`].
    pub fn approve(&mut self, id: RecordId) -> Result<ApprovalTransition, StoreError> {
        let tx = self.db.transaction()?;

        let changed = tx.execute(
            "UPDATE records SET approved = 1 WHERE id = ?1 AND approved = 0",
            [id.value()],
        )?;
        let record = tx
            .query_row(
                &format!("{} WHERE id = ?1", Self::SELECT_COLUMNS),
                [id.value()],
                record_from_row,
            )
            .optional()?;

        tx.commit()?;

        match record {
            None => Err(StoreError::NotFound(id)),
            Some(record) if changed == 0 => {
                tracing::debug!(record_id = %id, "Record was already approved");
                Ok(ApprovalTransition::AlreadyApproved(record))
            }
            Some(record) => Ok(ApprovalTransition::Approved(record)),
        }
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    let approved: i64 = row.get(6)?;
    Ok(Record {
        id: RecordId::new(row.get(0)?),
        client_id: ClientId::new(row.get::<_, String>(1)?),
        fields: RecordFields {
            field1: row.get(2)?,
            field2: row.get(3)?,
            field3: row.get(4)?,
            field4: row.get(5)?,
        },
        status: RecordStatus::from_approved(approved != 0),
    })
}
