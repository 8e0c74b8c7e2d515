//! Message repository trait definition.
//!
//! The persistence contract the message store needs and nothing more: create
//! the table if it is missing, append one row, read every row back.

use courier_types::error::RepositoryError;
use courier_types::message::MessageRow;

/// Append-only persistence for encoded message rows.
///
/// Implementations must tolerate concurrent calls; the store does not
/// serialize persistence beyond what the implementation provides.
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait MessageRepository: Send + Sync {
    /// Create the message table if absent. Idempotent.
    fn ensure_schema(
        &self,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append a single row. Failures are reported, never retried here.
    fn insert_one(
        &self,
        row: &MessageRow,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Every stored row, in storage (insertion) order.
    fn select_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<MessageRow>, RepositoryError>> + Send;

    /// Release the underlying database handle.
    fn close(&self) -> impl std::future::Future<Output = ()> + Send;
}
