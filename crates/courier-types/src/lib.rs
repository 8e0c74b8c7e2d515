//! Shared domain types for Courier.
//!
//! This crate contains the domain types used across the Courier message
//! store: conversation and message identifiers, the metadata envelope, the
//! payload sum type, chat summaries, settings, and the error enums.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod message;
