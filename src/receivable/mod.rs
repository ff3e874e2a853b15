//! Receivables: money lent to other people, tracked until the debt is settled.

mod core;
mod lend_endpoint;
mod list_endpoint;
mod settle_endpoint;

pub use core::{
    NewLoan, Receivable, create_receivable, create_receivable_table, get_receivable,
    list_open_receivables, mark_settled,
};
pub use lend_endpoint::lend_money_endpoint;
pub use list_endpoint::list_receivables_endpoint;
pub use settle_endpoint::settle_debt_endpoint;
