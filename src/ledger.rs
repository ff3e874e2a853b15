//! The composite ledger operations.
//!
//! Each operation here touches at least two tables that must stay mutually
//! consistent: a source balance never changes without a matching transaction
//! row being appended in the same SQLite transaction, and vice versa. All
//! writes go through these functions; the per-table helpers in
//! [source](crate::source), [transaction](crate::transaction), and
//! [receivable](crate::receivable) are never called standalone for writes.

use rusqlite::Connection;

use crate::{
    Error,
    database_id::{ReceivableId, SourceId},
    receivable::{NewLoan, Receivable, create_receivable, get_receivable, mark_settled},
    source::adjust_balance,
    transaction::{Direction, NewTransaction, Transaction, append_transaction},
};

/// Record a transaction and apply it to the source balance.
///
/// Appends the transaction row, then adjusts the source balance by the
/// signed amount (negative for an expense, positive for income). Both writes
/// happen in one SQLite transaction: if either fails, neither persists.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is zero, negative, or not finite,
/// - [Error::NotFound] if the source does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn record_transaction(
    new: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let tx = connection.unchecked_transaction()?;

    let transaction = append_transaction(&new, &tx)?;
    adjust_balance(new.source_id, new.direction.signed(new.amount), &tx)?;

    tx.commit()?;

    Ok(transaction)
}

/// Lend money to someone.
///
/// Creates an unsettled receivable, debits the source by the loan amount,
/// and appends the matching expense transaction (category "Lending"). All
/// three writes happen in one SQLite transaction: they commit together or
/// not at all.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the loan amount is zero, negative, or not finite,
/// - [Error::NotFound] if the source does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn lend_money(loan: NewLoan, connection: &Connection) -> Result<Receivable, Error> {
    let tx = connection.unchecked_transaction()?;

    let receivable = create_receivable(&loan, &tx)?;
    adjust_balance(loan.source_id, -loan.amount, &tx)?;
    append_transaction(
        &NewTransaction {
            amount: loan.amount,
            direction: Direction::Expense,
            category: "Lending".to_owned(),
            note: Some(format!("Lent to {}", loan.debtor_name)),
            source_id: loan.source_id,
        },
        &tx,
    )?;

    tx.commit()?;

    Ok(receivable)
}

/// Settle a debt.
///
/// Marks the receivable settled, credits the repayment to the source, and
/// appends the matching income transaction (category "Debt Repayment"). All
/// three writes happen in one SQLite transaction: they commit together or
/// not at all.
///
/// Settling is a one-way transition: a receivable that is already settled is
/// rejected so that the repayment is credited exactly once.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the receivable or the source does not exist,
/// - [Error::AlreadySettled] if the receivable has already been settled,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn settle_debt(
    receivable_id: ReceivableId,
    source_id: SourceId,
    connection: &Connection,
) -> Result<Receivable, Error> {
    let tx = connection.unchecked_transaction()?;

    let receivable = get_receivable(receivable_id, &tx)?;

    if receivable.settled {
        return Err(Error::AlreadySettled);
    }

    mark_settled(receivable_id, &tx)?;
    adjust_balance(source_id, receivable.amount, &tx)?;
    append_transaction(
        &NewTransaction {
            amount: receivable.amount,
            direction: Direction::Income,
            category: "Debt Repayment".to_owned(),
            note: Some(format!("Settled: {}", receivable.debtor_name)),
            source_id,
        },
        &tx,
    )?;

    tx.commit()?;

    Ok(Receivable {
        settled: true,
        ..receivable
    })
}
