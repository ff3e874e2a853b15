//! Defines the core data model and database queries for receivables.

use rusqlite::{Connection, Row};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::{ReceivableId, SourceId},
};

/// Money owed back by a third party.
///
/// Created when money is lent out and kept forever; settling flips the
/// `settled` flag exactly once and credits the repayment back to a source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receivable {
    /// The ID of the receivable.
    pub id: ReceivableId,
    /// The name of the person who owes the money.
    pub debtor_name: String,
    /// How much money is owed, always positive.
    pub amount: f64,
    /// Why the money was lent.
    pub reason: String,
    /// Whether the debt has been repaid. Never reverts to false.
    pub settled: bool,
    /// When the money was lent, assigned by the server.
    pub created_at: OffsetDateTime,
}

/// The details needed to lend money to someone.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoan {
    /// The name of the person the money is lent to.
    pub debtor_name: String,
    /// How much money to lend, must be positive.
    pub amount: f64,
    /// Why the money was lent.
    pub reason: String,
    /// The source the money is taken from.
    pub source_id: SourceId,
}

/// Create the receivable table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_receivable_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS receivable (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                debtor_name TEXT NOT NULL,
                amount REAL NOT NULL,
                reason TEXT NOT NULL,
                settled INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('receivable', 0)",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Receivable].
pub fn map_row_to_receivable(row: &Row) -> Result<Receivable, rusqlite::Error> {
    let id = row.get(0)?;
    let debtor_name = row.get(1)?;
    let amount = row.get(2)?;
    let reason = row.get(3)?;
    let settled = row.get(4)?;
    let created_at = row.get(5)?;

    Ok(Receivable {
        id,
        debtor_name,
        amount,
        reason,
        settled,
        created_at,
    })
}

/// Insert a new, unsettled receivable row.
///
/// Assigns the row a fresh ID and the current UTC time. This function does
/// not touch source balances or the transaction log; the lend operation
/// performs all three writes in one SQLite transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the loan amount is zero, negative, or not finite,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_receivable(loan: &NewLoan, connection: &Connection) -> Result<Receivable, Error> {
    if !loan.amount.is_finite() || loan.amount <= 0.0 {
        return Err(Error::InvalidAmount(loan.amount));
    }

    let receivable = connection
        .prepare(
            "INSERT INTO receivable (debtor_name, amount, reason, settled, created_at)
             VALUES (?1, ?2, ?3, 0, ?4)
             RETURNING id, debtor_name, amount, reason, settled, created_at",
        )?
        .query_row(
            (
                &loan.debtor_name,
                loan.amount,
                &loan.reason,
                OffsetDateTime::now_utc(),
            ),
            map_row_to_receivable,
        )?;

    Ok(receivable)
}

/// Retrieve a receivable from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid receivable,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_receivable(id: ReceivableId, connection: &Connection) -> Result<Receivable, Error> {
    let receivable = connection
        .prepare(
            "SELECT id, debtor_name, amount, reason, settled, created_at
             FROM receivable WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_row_to_receivable)?;

    Ok(receivable)
}

/// Flip the `settled` flag of the receivable `id` to true.
///
/// Callers must check the current flag first; this function does not reject
/// rows that are already settled.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid receivable,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn mark_settled(id: ReceivableId, connection: &Connection) -> Result<(), Error> {
    let rows_changed = connection.execute("UPDATE receivable SET settled = 1 WHERE id = ?1", [id])?;

    if rows_changed == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Retrieve the receivables that have not been settled yet, newest first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn list_open_receivables(connection: &Connection) -> Result<Vec<Receivable>, Error> {
    connection
        .prepare(
            "SELECT id, debtor_name, amount, reason, settled, created_at
             FROM receivable WHERE settled = 0
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map([], map_row_to_receivable)?
        .map(|maybe_receivable| maybe_receivable.map_err(Error::SqlError))
        .collect()
}
