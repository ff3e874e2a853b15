//! Money sources: named pools of money (cash or bank) with a running balance.

mod core;
mod list_endpoint;

pub use core::{
    Source, SourceKind, adjust_balance, create_source_table, get_source, list_sources,
    total_balance,
};
pub use list_endpoint::list_sources_endpoint;
