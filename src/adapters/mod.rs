//! Adapters for external storage
//!
//! - [`store`] - Record store trait with JSON file and in-memory backends

pub mod store;
