//! Service layer exposing generic CRUD operations over a persistence client.
//! - `crud::CrudService` binds one collection and delegates every call.
//! - `storage::JsonStore` is a bundled client backed by a JSON file.
//! - `runtime` wires configuration to bound services.

pub mod errors;
pub mod crud;
pub mod pagination;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
pub mod storage;

pub use crud::CrudService;
