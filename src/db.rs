//! Database initialization and first-run seeding.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error,
    receivable::create_receivable_table,
    source::{SourceKind, create_source_table},
    transaction::create_transaction_table,
};

/// Create the tables for the domain models.
///
/// The tables are created within a single SQLite transaction so that a
/// failure partway through leaves the database untouched.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_source_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_receivable_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Insert the default money sources if the source table is empty.
///
/// Does nothing when at least one source already exists, so it is safe to
/// call on every server start.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn seed_default_sources(connection: &Connection) -> Result<(), Error> {
    let source_count: i64 =
        connection.query_row("SELECT COUNT(id) FROM source", [], |row| row.get(0))?;

    if source_count > 0 {
        return Ok(());
    }

    tracing::info!("Seeding initial money sources.");

    let mut statement =
        connection.prepare("INSERT INTO source (name, kind, balance) VALUES (?1, ?2, ?3)")?;

    statement.execute(("Cash in Wallet", SourceKind::Cash, 800.0))?;
    statement.execute(("BOI Bank", SourceKind::Bank, 168.73))?;
    statement.execute(("IPPB Bank", SourceKind::Bank, 1074.36))?;

    Ok(())
}


#[cfg(test)]
mod seed_tests {
    use rusqlite::Connection;

    use crate::source::list_sources;

    use super::{initialize, seed_default_sources};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn seeds_sources_on_empty_database() {
        let conn = get_test_connection();

        seed_default_sources(&conn).unwrap();

        let sources = list_sources(&conn).unwrap();
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].name, "Cash in Wallet");
        assert_eq!(sources[0].balance, 800.0);
    }

    #[test]
    fn second_run_adds_nothing() {
        let conn = get_test_connection();

        seed_default_sources(&conn).unwrap();
        seed_default_sources(&conn).unwrap();

        let sources = list_sources(&conn).unwrap();
        assert_eq!(sources.len(), 3);
    }
}
