//! Defines the endpoint for listing receivables that are still open.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, receivable::core::list_open_receivables};

/// The state needed to list open receivables.
#[derive(Debug, Clone)]
pub struct ListReceivablesState {
    /// The database connection for reading receivables.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListReceivablesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing the receivables that have not been settled
/// yet, newest first.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_receivables_endpoint(State(state): State<ListReceivablesState>) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match list_open_receivables(&connection) {
        Ok(receivables) => Json(receivables).into_response(),
        Err(error) => error.into_response(),
    }
}
