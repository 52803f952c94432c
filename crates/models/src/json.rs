//! Schemaless model over JSON documents.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::args::{CountArgs, FindManyArgs};
use crate::client::ModelTypes;

/// A stored record: a JSON object.
pub type Document = Map<String, Value>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// One ordering key of a multi-record read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    #[serde(default)]
    pub direction: SortOrder,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self { Self { field: field.into(), direction: SortOrder::Asc } }

    pub fn desc(field: impl Into<String>) -> Self { Self { field: field.into(), direction: SortOrder::Desc } }
}

/// Marker binding JSON documents to every argument slot.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonModel;

impl ModelTypes for JsonModel {
    type Record = Document;
    type WhereUnique = Document;
    type FindManyArgs = FindManyArgs<Document, OrderBy>;
    type CountArgs = CountArgs<Document>;
    type Create = Document;
    type Update = Document;
}

/// True when every key of `filter` is present in `record` with an equal value.
/// An empty filter matches everything.
pub fn matches(record: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, expected)| record.get(key) == Some(expected))
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order used for sorting: null < bool < number < string < array < object.
/// Arrays and objects compare equal among themselves.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Compare two records by a list of ordering keys; missing fields sort as null.
pub fn compare_documents(a: &Document, b: &Document, order: &[OrderBy]) -> Ordering {
    for key in order {
        let left = a.get(&key.field).unwrap_or(&Value::Null);
        let right = b.get(&key.field).unwrap_or(&Value::Null);
        let ord = match key.direction {
            SortOrder::Asc => compare_values(left, right),
            SortOrder::Desc => compare_values(right, left),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
