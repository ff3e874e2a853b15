//! Ledger transactions: immutable records of money moving in or out of a source.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the append-only recorder
//! - The paginated history query that joins in source names
//! - Route handlers for recording transactions and browsing history

mod core;
mod create_endpoint;
mod history;
mod history_endpoint;

pub use core::{
    Direction, NewTransaction, Transaction, append_transaction, count_transactions,
    create_transaction_table,
};
pub use create_endpoint::create_transaction_endpoint;
pub use history::{HistoryEntry, get_history_page};
pub use history_endpoint::get_history_endpoint;
