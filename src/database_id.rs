//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a money source (wallet or bank account).
pub type SourceId = DatabaseId;
/// The ID of a ledger transaction.
pub type TransactionId = DatabaseId;
/// The ID of a receivable (money lent out).
pub type ReceivableId = DatabaseId;
