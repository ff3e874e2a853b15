//! Defines the core data model and database queries for money sources.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::SourceId};

/// Whether a source holds physical cash or sits in a bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceKind {
    /// Physical cash, e.g. a wallet.
    Cash,
    /// A bank account.
    Bank,
}

impl SourceKind {
    fn as_str(self) -> &'static str {
        match self {
            SourceKind::Cash => "CASH",
            SourceKind::Bank => "BANK",
        }
    }
}

impl ToSql for SourceKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for SourceKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "CASH" => Ok(SourceKind::Cash),
            "BANK" => Ok(SourceKind::Bank),
            other => Err(FromSqlError::Other(
                format!("unknown source kind {other:?}").into(),
            )),
        }
    }
}

/// A named pool of money with a running balance.
///
/// The balance is only ever written through [adjust_balance], and only from
/// within a ledger operation that appends the matching transaction row, so
/// it always equals the seed balance plus the signed sum of the source's
/// transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Source {
    /// The ID of the source.
    pub id: SourceId,
    /// The display label, e.g. "Cash in Wallet".
    pub name: String,
    /// Whether the source is cash or a bank account.
    pub kind: SourceKind,
    /// The current balance. May be negative (overdraft is allowed).
    pub balance: f64,
}

/// Create the source table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_source_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS source (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                balance REAL NOT NULL DEFAULT 0
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Source].
pub fn map_row_to_source(row: &Row) -> Result<Source, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let kind = row.get(2)?;
    let balance = row.get(3)?;

    Ok(Source {
        id,
        name,
        kind,
        balance,
    })
}

/// Add `delta` to the balance of the source `source_id`.
///
/// A negative delta debits the source. Balances are allowed to go negative.
///
/// Callers must invoke this within the same SQLite transaction as the write
/// that records the matching ledger entry.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `source_id` does not refer to a valid source,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn adjust_balance(
    source_id: SourceId,
    delta: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_changed = connection.execute(
        "UPDATE source SET balance = balance + ?1 WHERE id = ?2",
        (delta, source_id),
    )?;

    if rows_changed == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Retrieve a source from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid source,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_source(id: SourceId, connection: &Connection) -> Result<Source, Error> {
    let source = connection
        .prepare("SELECT id, name, kind, balance FROM source WHERE id = :id")?
        .query_row(&[(":id", &id)], map_row_to_source)?;

    Ok(source)
}

/// Retrieve all sources, oldest first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn list_sources(connection: &Connection) -> Result<Vec<Source>, Error> {
    connection
        .prepare("SELECT id, name, kind, balance FROM source ORDER BY id ASC")?
        .query_map([], map_row_to_source)?
        .map(|maybe_source| maybe_source.map_err(Error::SqlError))
        .collect()
}

/// Get the total balance across all sources.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn total_balance(connection: &Connection) -> Result<f64, Error> {
    let mut stmt = connection.prepare("SELECT COALESCE(SUM(balance), 0) FROM source")?;

    let total: f64 = stmt.query_row([], |row| row.get(0))?;

    Ok(total)
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_source_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_source_table(&connection));
    }
}


#[cfg(test)]
mod total_balance_tests {
    use rusqlite::Connection;

    use crate::source::SourceKind;

    use super::{create_source_table, total_balance};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_source_table(&conn).unwrap();
        conn
    }

    #[test]
    fn returns_sum_of_all_sources() {
        let conn = get_test_connection();

        conn.execute(
            "INSERT INTO source (name, kind, balance) VALUES (?1, ?2, ?3)",
            ("Wallet", SourceKind::Cash, 100.50),
        )
        .unwrap();

        conn.execute(
            "INSERT INTO source (name, kind, balance) VALUES (?1, ?2, ?3)",
            ("Bank", SourceKind::Bank, 250.75),
        )
        .unwrap();

        conn.execute(
            "INSERT INTO source (name, kind, balance) VALUES (?1, ?2, ?3)",
            ("Overdrawn", SourceKind::Bank, -50.25),
        )
        .unwrap();

        let result = total_balance(&conn).unwrap();

        assert_eq!(result, 301.0);
    }

    #[test]
    fn returns_zero_for_no_sources() {
        let conn = get_test_connection();

        let result = total_balance(&conn).unwrap();

        assert_eq!(result, 0.0);
    }
}
