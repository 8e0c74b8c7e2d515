//! Message store and repository trait definitions for Courier.
//!
//! This crate owns the in-memory side of the message history: the keyed
//! concurrent container, the codec that turns messages into persisted rows,
//! the `MessageStore` orchestrator, and chat list derivation. Persistence is
//! reached only through the `MessageRepository` trait; this crate never
//! depends on `courier-infra` or any database crate.

pub mod codec;
pub mod keyed;
pub mod repository;
pub mod store;
pub mod summary;
