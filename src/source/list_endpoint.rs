//! Defines the endpoint for listing sources along with their combined balance.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState,
    source::{Source, core::list_sources, core::total_balance},
};

/// The state needed to list sources.
#[derive(Debug, Clone)]
pub struct ListSourcesState {
    /// The database connection for reading sources.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListSourcesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// All sources and the sum of their balances.
#[derive(Debug, Serialize)]
pub struct SourceListResponse {
    /// Every source, oldest first.
    pub sources: Vec<Source>,
    /// The sum of all current balances.
    pub total: f64,
}

/// A route handler for listing all sources with their combined balance.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_sources_endpoint(State(state): State<ListSourcesState>) -> Response {
    let connection = state.db_connection.lock().unwrap();

    let sources = match list_sources(&connection) {
        Ok(sources) => sources,
        Err(error) => return error.into_response(),
    };

    let total = match total_balance(&connection) {
        Ok(total) => total,
        Err(error) => return error.into_response(),
    };

    Json(SourceListResponse { sources, total }).into_response()
}
