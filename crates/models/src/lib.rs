//! Data-access contract shared by the service layer.
//! - `PersistenceClient` is the capability a CRUD adapter delegates to.
//! - `ModelTypes` fixes the record and argument shapes of one collection.
//! - `json` provides a schemaless model over JSON documents.

pub mod errors;
pub mod name;
pub mod args;
pub mod client;
pub mod json;

pub use args::{CountArgs, CreateArgs, DeleteArgs, FindManyArgs, FindUniqueArgs, UpdateArgs};
pub use client::{ModelTypes, PersistenceClient};
pub use name::ModelName;
