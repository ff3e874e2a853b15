//! Defines the endpoint for settling a debt.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState,
    database_id::{ReceivableId, SourceId},
    ledger::settle_debt,
};

/// The state needed to settle a debt.
#[derive(Debug, Clone)]
pub struct SettleDebtState {
    /// The database connection for updating receivables.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettleDebtState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for settling a debt.
#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    /// The receivable being repaid.
    pub receivable_id: ReceivableId,
    /// The source the repayment is credited to.
    pub source_id: SourceId,
}

/// A route handler for settling a debt: marks the receivable settled,
/// credits the source, and records the repayment in one atomic step.
///
/// Settling an already-settled receivable is rejected so the repayment is
/// credited exactly once.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn settle_debt_endpoint(
    State(state): State<SettleDebtState>,
    Json(request): Json<SettleRequest>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match settle_debt(request.receivable_id, request.source_id, &connection) {
        Ok(receivable) => Json(receivable).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        ledger::lend_money,
        receivable::NewLoan,
        source::SourceKind,
    };

    use super::{SettleDebtState, SettleRequest, settle_debt_endpoint};

    fn get_test_state_with_loan() -> (SettleDebtState, i64, i64) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn.execute(
            "INSERT INTO source (name, kind, balance) VALUES (?1, ?2, ?3)",
            ("Wallet", SourceKind::Cash, 700.0),
        )
        .unwrap();
        let source_id = conn.last_insert_rowid();

        let receivable = lend_money(
            NewLoan {
                debtor_name: "Sam".to_owned(),
                amount: 50.0,
                reason: "Lunch".to_owned(),
                source_id,
            },
            &conn,
        )
        .unwrap();

        let state = SettleDebtState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        (state, receivable.id, source_id)
    }

    #[tokio::test]
    async fn settles_debt_and_credits_source() {
        let (state, receivable_id, source_id) = get_test_state_with_loan();

        let response = settle_debt_endpoint(
            State(state.clone()),
            Json(SettleRequest {
                receivable_id,
                source_id,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let connection = state.db_connection.lock().unwrap();
        let balance: f64 = connection
            .query_row("SELECT balance FROM source WHERE id = ?1", [source_id], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(balance, 700.0);
    }

    #[tokio::test]
    async fn second_settle_conflicts() {
        let (state, receivable_id, source_id) = get_test_state_with_loan();

        let first = settle_debt_endpoint(
            State(state.clone()),
            Json(SettleRequest {
                receivable_id,
                source_id,
            }),
        )
        .await
        .into_response();
        assert_eq!(first.status(), StatusCode::OK);

        let second = settle_debt_endpoint(
            State(state.clone()),
            Json(SettleRequest {
                receivable_id,
                source_id,
            }),
        )
        .await
        .into_response();

        assert_eq!(second.status(), StatusCode::CONFLICT);

        // The repayment must have been credited exactly once.
        let connection = state.db_connection.lock().unwrap();
        let balance: f64 = connection
            .query_row("SELECT balance FROM source WHERE id = ?1", [source_id], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(balance, 700.0);
    }

    #[tokio::test]
    async fn unknown_receivable_is_not_found() {
        let (state, receivable_id, source_id) = get_test_state_with_loan();

        let response = settle_debt_endpoint(
            State(state),
            Json(SettleRequest {
                receivable_id: receivable_id + 99,
                source_id,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
