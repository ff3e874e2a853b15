//! Database query helpers for the paginated transaction history.

use rusqlite::Connection;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::{SourceId, TransactionId},
    pagination::PageInfo,
    transaction::{Direction, core::count_transactions},
};

/// A transaction row enriched with the name of the source it moved money
/// in or out of.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money that moved, always positive.
    pub amount: f64,
    /// Whether money left or entered the source.
    pub direction: Direction,
    /// A free-form label, e.g. "Groceries" or "Salary".
    pub category: String,
    /// Optional text detailing the transaction.
    pub note: Option<String>,
    /// When the transaction was recorded.
    pub date: OffsetDateTime,
    /// The source the money moved in or out of, if it still exists.
    pub source_id: Option<SourceId>,
    /// The display name of the source, or "Unknown" when the source id is
    /// absent or no longer resolves.
    pub source_name: String,
}

/// Get one page of transaction history, newest first.
///
/// Rows are ordered by date descending with ties broken by ID descending, so
/// transactions recorded at the same instant list newest-insertion first.
/// The caller is expected to have normalized `page` and `page_size` via
/// [PaginationConfig::resolve](crate::pagination::PaginationConfig::resolve);
/// both must be at least 1.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub fn get_history_page(
    page: u64,
    page_size: u64,
    connection: &Connection,
) -> Result<(Vec<HistoryEntry>, PageInfo), Error> {
    let total_records = count_transactions(connection)?;

    let limit = page_size as i64;
    let offset = ((page - 1) * page_size) as i64;

    let entries = connection
        .prepare(
            "SELECT \"transaction\".id, amount, direction, category, note, date, source_id, source.name \
             FROM \"transaction\" \
             LEFT JOIN source ON \"transaction\".source_id = source.id \
             ORDER BY date DESC, \"transaction\".id DESC \
             LIMIT ?1 OFFSET ?2",
        )?
        .query_map((limit, offset), |row| {
            let source_name = row
                .get::<usize, Option<String>>(7)?
                .unwrap_or_else(|| "Unknown".to_owned());

            Ok(HistoryEntry {
                id: row.get(0)?,
                amount: row.get(1)?,
                direction: row.get(2)?,
                category: row.get(3)?,
                note: row.get(4)?,
                date: row.get(5)?,
                source_id: row.get(6)?,
                source_name,
            })
        })?
        .map(|maybe_entry| maybe_entry.map_err(Error::SqlError))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((entries, PageInfo::new(page, page_size, total_records)))
}
