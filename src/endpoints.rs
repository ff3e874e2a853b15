//! The API endpoint URIs.

/// The route for listing sources with their combined balance.
pub const SOURCES: &str = "/api/sources";
/// The route for recording a transaction.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for browsing the paginated transaction history.
pub const HISTORY: &str = "/api/history";
/// The route for listing open receivables and lending money.
pub const RECEIVABLES: &str = "/api/receivables";
/// The route for settling a debt.
pub const SETTLE_RECEIVABLE: &str = "/api/receivables/settle";
