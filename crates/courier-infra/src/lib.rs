//! Infrastructure layer for Courier.
//!
//! Contains implementations of the repository traits defined in `courier-core`
//! (SQLite storage), the settings file loader, and the wiring that opens a
//! ready-to-serve message store from settings.

pub mod config;
pub mod sqlite;
pub mod store;
