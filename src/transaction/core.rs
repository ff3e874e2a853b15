//! Defines the core data model and database queries for transactions.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::{SourceId, TransactionId},
};

/// Whether a transaction takes money out of a source or puts money into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Money left the source.
    Expense,
    /// Money entered the source.
    Income,
}

impl Direction {
    /// Apply the direction's sign to a positive `amount`.
    ///
    /// The result is the delta to add to the source balance: negative for an
    /// expense, positive for income.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            Direction::Expense => -amount,
            Direction::Income => amount,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Direction::Expense => "EXPENSE",
            Direction::Income => "INCOME",
        }
    }
}

impl ToSql for Direction {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Direction {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "EXPENSE" => Ok(Direction::Expense),
            "INCOME" => Ok(Direction::Income),
            other => Err(FromSqlError::Other(
                format!("unknown transaction direction {other:?}").into(),
            )),
        }
    }
}

/// An immutable record of money moving in or out of a source.
///
/// Transactions are never updated or deleted once written. Each one is
/// appended in the same SQLite transaction as the balance change it
/// describes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money that moved, always positive. The direction
    /// carries the sign.
    pub amount: f64,
    /// Whether money left or entered the source.
    pub direction: Direction,
    /// A free-form label, e.g. "Groceries" or "Salary".
    pub category: String,
    /// Optional text detailing the transaction.
    pub note: Option<String>,
    /// When the transaction was recorded, assigned by the server.
    pub date: OffsetDateTime,
    /// The source the money moved in or out of. Absent when the source has
    /// since been removed through an admin path.
    pub source_id: Option<SourceId>,
}

/// The details needed to record a new transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The amount of money that moved, must be positive.
    pub amount: f64,
    /// Whether money left or entered the source.
    pub direction: Direction,
    /// A free-form label, e.g. "Groceries" or "Salary".
    pub category: String,
    /// Optional text detailing the transaction.
    pub note: Option<String>,
    /// The source the money moved in or out of.
    pub source_id: SourceId,
}

/// Append a new transaction row to the ledger.
///
/// Assigns the row a fresh ID and the current UTC time. This function does
/// not touch source balances; callers that need the balance updated must do
/// so in the same SQLite transaction via
/// [adjust_balance](crate::source::adjust_balance).
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if `amount` is zero, negative, or not finite,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn append_transaction(
    new: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if !new.amount.is_finite() || new.amount <= 0.0 {
        return Err(Error::InvalidAmount(new.amount));
    }

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (amount, direction, category, note, date, source_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, amount, direction, category, note, date, source_id",
        )?
        .query_row(
            (
                new.amount,
                new.direction,
                &new.category,
                &new.note,
                OffsetDateTime::now_utc(),
                new.source_id,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|count| count as u64)
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                direction TEXT NOT NULL,
                category TEXT NOT NULL,
                note TEXT,
                date TEXT NOT NULL,
                source_id INTEGER,
                FOREIGN KEY(source_id) REFERENCES source(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Index used by the history page's date ordering.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let direction = row.get(2)?;
    let category = row.get(3)?;
    let note = row.get(4)?;
    let date = row.get(5)?;
    let source_id = row.get(6)?;

    Ok(Transaction {
        id,
        amount,
        direction,
        category,
        note,
        date,
        source_id,
    })
}
