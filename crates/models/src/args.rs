//! Argument shapes handed to a [`PersistenceClient`](crate::PersistenceClient).
//!
//! The wrappers mirror the `{ where }`, `{ data }` and `{ where, data }`
//! objects the client expects; they serialize with exactly those keys.

use serde::{Deserialize, Serialize};

/// `{ where: filter }` for a unique read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FindUniqueArgs<W> {
    #[serde(rename = "where")]
    pub r#where: W,
}

/// `{ data: payload }` for an insert.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateArgs<D> {
    pub data: D,
}

/// `{ where, data }` for an update. Callers build this and the adapter
/// forwards it as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateArgs<W, D> {
    #[serde(rename = "where")]
    pub r#where: W,
    pub data: D,
}

/// `{ where: filter }` for a delete.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeleteArgs<W> {
    #[serde(rename = "where")]
    pub r#where: W,
}

/// Optional criteria for a count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountArgs<W> {
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub r#where: Option<W>,
}

/// Parameters for a multi-record read: filter, ordering and a skip/take window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindManyArgs<W, O> {
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub r#where: Option<W>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<O>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take: Option<u64>,
}

impl<W, O> Default for FindManyArgs<W, O> {
    fn default() -> Self {
        Self { r#where: None, order_by: Vec::new(), skip: None, take: None }
    }
}

impl<W, O> FindManyArgs<W, O> {
    pub fn filter(mut self, filter: W) -> Self {
        self.r#where = Some(filter);
        self
    }

    pub fn order_by(mut self, order: O) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: u64) -> Self {
        self.take = Some(take);
        self
    }
}

impl<W> CountArgs<W> {
    pub fn filter(filter: W) -> Self { Self { r#where: Some(filter) } }
}
