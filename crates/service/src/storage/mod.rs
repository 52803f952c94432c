//! Storage backends for the service layer.
//!
//! `JsonStore` is a self-contained persistence client usable wherever an
//! external database client is not available.

pub mod json_store;

pub use json_store::JsonStore;
