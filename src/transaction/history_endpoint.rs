//! Defines the endpoint for browsing the paginated transaction history.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    pagination::{PageInfo, PaginationConfig},
    transaction::{HistoryEntry, history::get_history_page},
};

/// The state needed for the history endpoint.
#[derive(Debug, Clone)]
pub struct HistoryState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls the default page and page size.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for HistoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for selecting a page of history.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// The page number to return, starting at 1.
    #[serde(default)]
    pub page: Option<u64>,
    /// The maximum number of rows per page.
    #[serde(default)]
    pub page_size: Option<u64>,
}

/// One page of transaction history plus where it sits in the full set.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// The page of transactions, newest first.
    pub transactions: Vec<HistoryEntry>,
    /// Where this page sits within the full history.
    pub pagination: PageInfo,
}

/// A route handler for one page of transaction history, newest first.
///
/// Missing or zero-valued `page`/`page_size` parameters fall back to the
/// configured defaults.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_history_endpoint(
    State(state): State<HistoryState>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let (page, page_size) = state.pagination_config.resolve(query.page, query.page_size);

    let connection = state.db_connection.lock().unwrap();

    match get_history_page(page, page_size, &connection) {
        Ok((transactions, pagination)) => Json(HistoryResponse {
            transactions,
            pagination,
        })
        .into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        pagination::PaginationConfig,
        source::SourceKind,
        transaction::{Direction, NewTransaction, append_transaction},
    };

    use super::{HistoryQuery, HistoryState, get_history_endpoint};

    fn get_test_state() -> HistoryState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        HistoryState {
            db_connection: Arc::new(Mutex::new(conn)),
            pagination_config: PaginationConfig::default(),
        }
    }

    fn fill_transactions(state: &HistoryState, count: usize) {
        let conn = state.db_connection.lock().unwrap();
        conn.execute(
            "INSERT INTO source (name, kind, balance) VALUES (?1, ?2, ?3)",
            ("Wallet", SourceKind::Cash, 0.0),
        )
        .unwrap();
        let source_id = conn.last_insert_rowid();

        for i in 1..=count {
            append_transaction(
                &NewTransaction {
                    amount: i as f64,
                    direction: Direction::Expense,
                    category: "Groceries".to_owned(),
                    note: None,
                    source_id,
                },
                &conn,
            )
            .unwrap();
        }
    }

    async fn get_history_json(state: HistoryState, query: HistoryQuery) -> serde_json::Value {
        let response = get_history_endpoint(State(state), Query(query))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn empty_store_returns_zero_totals() {
        let state = get_test_state();

        let json = get_history_json(state, HistoryQuery::default()).await;

        assert_eq!(json["transactions"].as_array().unwrap().len(), 0);
        assert_eq!(json["pagination"]["total_records"], 0);
        assert_eq!(json["pagination"]["total_pages"], 0);
    }

    #[tokio::test]
    async fn defaults_apply_when_parameters_are_absent() {
        let state = get_test_state();
        fill_transactions(&state, 15);

        let json = get_history_json(state, HistoryQuery::default()).await;

        assert_eq!(json["transactions"].as_array().unwrap().len(), 10);
        assert_eq!(json["pagination"]["page"], 1);
        assert_eq!(json["pagination"]["page_size"], 10);
        assert_eq!(json["pagination"]["total_pages"], 2);
    }

    #[tokio::test]
    async fn explicit_page_returns_the_remainder() {
        let state = get_test_state();
        fill_transactions(&state, 25);

        let json = get_history_json(
            state,
            HistoryQuery {
                page: Some(3),
                page_size: Some(10),
            },
        )
        .await;

        assert_eq!(json["transactions"].as_array().unwrap().len(), 5);
        assert_eq!(json["pagination"]["total_records"], 25);
        assert_eq!(json["pagination"]["total_pages"], 3);
    }
}
