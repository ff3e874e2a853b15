//! Application router configuration.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::{
    AppState, endpoints,
    receivable::{lend_money_endpoint, list_receivables_endpoint, settle_debt_endpoint},
    source::list_sources_endpoint,
    transaction::{create_transaction_endpoint, get_history_endpoint},
};

/// Return a router with all the app's routes.
///
/// CORS is left permissive: the dashboard is served separately and the API
/// only ever binds to localhost.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::SOURCES, get(list_sources_endpoint))
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(endpoints::HISTORY, get(get_history_endpoint))
        .route(
            endpoints::RECEIVABLES,
            get(list_receivables_endpoint).post(lend_money_endpoint),
        )
        .route(endpoints::SETTLE_RECEIVABLE, post(settle_debt_endpoint))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, db::seed_default_sources, pagination::PaginationConfig};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let conn = Connection::open_in_memory().unwrap();
        let state = AppState::new(conn, PaginationConfig::default()).unwrap();

        {
            let connection = state.db_connection.lock().unwrap();
            seed_default_sources(&connection).unwrap();
        }

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn lists_seeded_sources_with_total() {
        let server = get_test_server();

        let response = server.get("/api/sources").await;

        response.assert_status_ok();
        let json = response.json::<Value>();
        assert_eq!(json["sources"].as_array().unwrap().len(), 3);
        let total = json["total"].as_f64().unwrap();
        assert!((total - 2043.09).abs() < 1e-9, "got total {total}");
    }

    #[tokio::test]
    async fn records_transaction_and_updates_balance() {
        let server = get_test_server();

        let response = server
            .post("/api/transactions")
            .json(&json!({
                "amount": 100.0,
                "direction": "EXPENSE",
                "category": "Groceries",
                "note": "weekly shop",
                "source_id": 1,
            }))
            .await;

        response.assert_status(StatusCode::CREATED);

        let sources = server.get("/api/sources").await.json::<Value>();
        assert_eq!(sources["sources"][0]["balance"], 700.0);

        let history = server.get("/api/history").await.json::<Value>();
        assert_eq!(history["transactions"].as_array().unwrap().len(), 1);
        assert_eq!(history["transactions"][0]["direction"], "EXPENSE");
        assert_eq!(history["transactions"][0]["source_name"], "Cash in Wallet");
    }

    #[tokio::test]
    async fn rejects_unknown_direction_at_the_boundary() {
        let server = get_test_server();

        let response = server
            .post("/api/transactions")
            .json(&json!({
                "amount": 100.0,
                "direction": "TRANSFER",
                "category": "Groceries",
                "source_id": 1,
            }))
            .await;

        assert!(
            response.status_code().is_client_error(),
            "got status {}",
            response.status_code()
        );
    }

    #[tokio::test]
    async fn lend_and_settle_round_trip() {
        let server = get_test_server();

        let lend = server
            .post("/api/receivables")
            .json(&json!({
                "debtor_name": "Sam",
                "amount": 50.0,
                "reason": "Lunch",
                "source_id": 1,
            }))
            .await;
        lend.assert_status(StatusCode::CREATED);
        let receivable = lend.json::<Value>();
        assert_eq!(receivable["settled"], false);

        let open = server.get("/api/receivables").await.json::<Value>();
        assert_eq!(open.as_array().unwrap().len(), 1);

        let settle = server
            .post("/api/receivables/settle")
            .json(&json!({
                "receivable_id": receivable["id"],
                "source_id": 1,
            }))
            .await;
        settle.assert_status_ok();
        assert_eq!(settle.json::<Value>()["settled"], true);

        // Debit then credit of the same amount nets out.
        let sources = server.get("/api/sources").await.json::<Value>();
        assert_eq!(sources["sources"][0]["balance"], 800.0);

        let open = server.get("/api/receivables").await.json::<Value>();
        assert_eq!(open.as_array().unwrap().len(), 0);

        let second = server
            .post("/api/receivables/settle")
            .json(&json!({
                "receivable_id": receivable["id"],
                "source_id": 1,
            }))
            .await;
        second.assert_status(StatusCode::CONFLICT);
        let error = second.json::<Value>();
        assert_eq!(error["error"], "the receivable has already been settled");
    }

    #[tokio::test]
    async fn history_paginates_newest_first() {
        let server = get_test_server();

        for i in 1..=25 {
            server
                .post("/api/transactions")
                .json(&json!({
                    "amount": i as f64,
                    "direction": "INCOME",
                    "category": "Salary",
                    "source_id": 1,
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server.get("/api/history?page=3&page_size=10").await;

        response.assert_status_ok();
        let json = response.json::<Value>();
        assert_eq!(json["transactions"].as_array().unwrap().len(), 5);
        assert_eq!(json["pagination"]["page"], 3);
        assert_eq!(json["pagination"]["total_records"], 25);
        assert_eq!(json["pagination"]["total_pages"], 3);
        // Page 3 holds the oldest rows.
        assert_eq!(json["transactions"][4]["amount"], 1.0);
    }

    #[tokio::test]
    async fn missing_source_maps_to_not_found() {
        let server = get_test_server();

        let response = server
            .post("/api/transactions")
            .json(&json!({
                "amount": 10.0,
                "direction": "EXPENSE",
                "category": "Groceries",
                "source_id": 999,
            }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        let json = response.json::<Value>();
        assert_eq!(json["error"], "the requested resource could not be found");
    }
}
