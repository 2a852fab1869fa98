use chrono::{NaiveDate, Utc};
use rusqlite::Row;
use tracing::instrument;

use larder_core::{ContextId, LedgerEntry, NewEntry};

use crate::database::Database;
use crate::error::StoreError;

const SELECT_COLUMNS: &str = "id, context_id, item, quantity, unit, date, created_at";

/// Repository for ledger entries. Entries are append-only: created by
/// batch insert, removed by date-scoped delete, never updated.
pub struct EntryRepo {
    db: Database,
}

impl EntryRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a batch of entries in one transaction. All-or-nothing:
    /// if any insert fails the whole batch is rolled back. Returns the
    /// stored rows with their assigned ids.
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub fn insert_batch(&self, entries: &[NewEntry]) -> Result<Vec<LedgerEntry>, StoreError> {
        self.db.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            let now = Utc::now().to_rfc3339();
            let mut stored = Vec::with_capacity(entries.len());
            for entry in entries {
                tx.execute(
                    "INSERT INTO entries (context_id, item, quantity, unit, date, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    rusqlite::params![
                        entry.context_id.as_str(),
                        entry.item,
                        entry.quantity,
                        entry.unit,
                        entry.date.to_string(),
                        now,
                    ],
                )?;
                stored.push(LedgerEntry {
                    id: tx.last_insert_rowid(),
                    context_id: entry.context_id.clone(),
                    item: entry.item.clone(),
                    quantity: entry.quantity,
                    unit: entry.unit.clone(),
                    date: entry.date,
                    created_at: now.clone(),
                });
            }
            tx.commit()?;
            Ok(stored)
        })
    }

    /// Remove every entry with the given date. Zero matches is Ok(0).
    #[instrument(skip(self), fields(context = %context, date = %date))]
    pub fn delete_by_date(&self, context: &ContextId, date: NaiveDate) -> Result<usize, StoreError> {
        self.db.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM entries WHERE context_id = ?1 AND date = ?2",
                rusqlite::params![context.as_str(), date.to_string()],
            )?;
            Ok(removed)
        })
    }

    /// Remove entries matching both date and exact item text.
    #[instrument(skip(self), fields(context = %context, date = %date, item))]
    pub fn delete_by_date_and_item(
        &self,
        context: &ContextId,
        date: NaiveDate,
        item: &str,
    ) -> Result<usize, StoreError> {
        self.db.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM entries WHERE context_id = ?1 AND date = ?2 AND item = ?3",
                rusqlite::params![context.as_str(), date.to_string(), item],
            )?;
            Ok(removed)
        })
    }

    /// Entries with date in the inclusive range `[start, end]`.
    #[instrument(skip(self), fields(context = %context, start = %start, end = %end))]
    pub fn query_range(
        &self,
        context: &ContextId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        self.db.with_conn(|conn| {
            let sql = format!(
                "SELECT {SELECT_COLUMNS} FROM entries
                 WHERE context_id = ?1 AND date >= ?2 AND date <= ?3
                 ORDER BY date ASC, created_at ASC, id ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(rusqlite::params![
                context.as_str(),
                start.to_string(),
                end.to_string(),
            ])?;
            collect_entries(&mut rows)
        })
    }

    /// Entries with exactly the given date, in insertion order.
    #[instrument(skip(self), fields(context = %context, date = %date))]
    pub fn query_by_date(
        &self,
        context: &ContextId,
        date: NaiveDate,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        self.db.with_conn(|conn| {
            let sql = format!(
                "SELECT {SELECT_COLUMNS} FROM entries
                 WHERE context_id = ?1 AND date = ?2
                 ORDER BY created_at ASC, id ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(rusqlite::params![context.as_str(), date.to_string()])?;
            collect_entries(&mut rows)
        })
    }

    /// All entries for a context, in insertion order.
    #[instrument(skip(self), fields(context = %context))]
    pub fn query_all(&self, context: &ContextId) -> Result<Vec<LedgerEntry>, StoreError> {
        self.db.with_conn(|conn| {
            let sql = format!(
                "SELECT {SELECT_COLUMNS} FROM entries
                 WHERE context_id = ?1
                 ORDER BY created_at ASC, id ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query([context.as_str()])?;
            collect_entries(&mut rows)
        })
    }

    /// Cheap reachability probe for health checks.
    pub fn ping(&self) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |_| Ok(()))?;
            Ok(())
        })
    }
}

fn collect_entries(rows: &mut rusqlite::Rows<'_>) -> Result<Vec<LedgerEntry>, StoreError> {
    let mut entries = Vec::new();
    while let Some(row) = rows.next()? {
        entries.push(row_to_entry(row)?);
    }
    Ok(entries)
}

fn row_to_entry(row: &Row<'_>) -> Result<LedgerEntry, StoreError> {
    let date_raw: String = row.get(5)?;
    let date = date_raw
        .parse::<NaiveDate>()
        .map_err(|e| StoreError::CorruptRow {
            table: "entries",
            column: "date",
            detail: e.to_string(),
        })?;
    Ok(LedgerEntry {
        id: row.get(0)?,
        context_id: ContextId::from_raw(row.get::<_, String>(1)?),
        item: row.get(2)?,
        quantity: row.get(3)?,
        unit: row.get(4)?,
        date,
        created_at: row.get(6)?,
    })
}
