//! Defines the endpoint for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState,
    database_id::SourceId,
    ledger::record_transaction,
    transaction::{Direction, NewTransaction},
};

/// The state needed to record a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for recording transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    /// The amount of money that moved, must be positive.
    pub amount: f64,
    /// Whether money left or entered the source.
    pub direction: Direction,
    /// A free-form label, e.g. "Groceries" or "Salary".
    pub category: String,
    /// Optional text detailing the transaction.
    #[serde(default)]
    pub note: Option<String>,
    /// The source the money moved in or out of.
    pub source_id: SourceId,
}

/// A route handler for recording a new transaction and updating the source
/// balance in the same atomic step.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Json(request): Json<TransactionRequest>,
) -> Response {
    let new = NewTransaction {
        amount: request.amount,
        direction: request.direction,
        category: request.category,
        note: request.note,
        source_id: request.source_id,
    };

    let connection = state.db_connection.lock().unwrap();

    match record_transaction(new, &connection) {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(error) => error.into_response(),
    }
}
