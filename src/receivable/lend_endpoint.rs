//! Defines the endpoint for lending money to someone.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, database_id::SourceId, ledger::lend_money, receivable::NewLoan};

/// The state needed to lend money.
#[derive(Debug, Clone)]
pub struct LendMoneyState {
    /// The database connection for creating receivables.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LendMoneyState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for lending money.
#[derive(Debug, Deserialize)]
pub struct LoanRequest {
    /// The name of the person the money is lent to.
    pub debtor_name: String,
    /// How much money to lend, must be positive.
    pub amount: f64,
    /// Why the money was lent.
    pub reason: String,
    /// The source the money is taken from.
    pub source_id: SourceId,
}

/// A route handler for lending money: creates the receivable, debits the
/// source, and records the expense in one atomic step.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn lend_money_endpoint(
    State(state): State<LendMoneyState>,
    Json(request): Json<LoanRequest>,
) -> Response {
    let loan = NewLoan {
        debtor_name: request.debtor_name,
        amount: request.amount,
        reason: request.reason,
        source_id: request.source_id,
    };

    let connection = state.db_connection.lock().unwrap();

    match lend_money(loan, &connection) {
        Ok(receivable) => (StatusCode::CREATED, Json(receivable)).into_response(),
        Err(error) => error.into_response(),
    }
}
