#![cfg(test)]
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use models::{CreateArgs, DeleteArgs, FindUniqueArgs, ModelName, ModelTypes, PersistenceClient, UpdateArgs};

/// Every argument slot is an arbitrary JSON value.
pub struct TestModel;

impl ModelTypes for TestModel {
    type Record = Value;
    type WhereUnique = Value;
    type FindManyArgs = Value;
    type CountArgs = Value;
    type Create = Value;
    type Update = Value;
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct FakeError(pub String);

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub model: String,
    pub args: Value,
}

/// Client double: records each call with its serialized arguments and
/// answers with canned values.
#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<Call>>,
    count: u64,
    record: Option<Value>,
    records: Vec<Value>,
    error: Option<String>,
}

impl RecordingClient {
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    pub fn with_record(mut self, record: Value) -> Self {
        self.record = Some(record);
        self
    }

    pub fn with_records(mut self, records: Vec<Value>) -> Self {
        self.records = records;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.error = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> { self.calls.lock().unwrap().clone() }

    fn record_call<A: Serialize>(&self, method: &'static str, model: &ModelName, args: &A) -> Result<(), FakeError> {
        let args = serde_json::to_value(args).unwrap();
        self.calls.lock().unwrap().push(Call { method, model: model.to_string(), args });
        match &self.error {
            Some(message) => Err(FakeError(message.clone())),
            None => Ok(()),
        }
    }

    fn single(&self) -> Value { self.record.clone().unwrap_or(Value::Null) }
}

#[async_trait]
impl PersistenceClient<TestModel> for RecordingClient {
    type Error = FakeError;

    async fn count(&self, model: &ModelName, criteria: Option<Value>) -> Result<u64, FakeError> {
        self.record_call("count", model, &criteria)?;
        Ok(self.count)
    }

    async fn find_unique(&self, model: &ModelName, args: FindUniqueArgs<Value>) -> Result<Option<Value>, FakeError> {
        self.record_call("find_unique", model, &args)?;
        Ok(self.record.clone())
    }

    async fn find_many(&self, model: &ModelName, args: Value) -> Result<Vec<Value>, FakeError> {
        self.record_call("find_many", model, &args)?;
        Ok(self.records.clone())
    }

    async fn create(&self, model: &ModelName, args: CreateArgs<Value>) -> Result<Value, FakeError> {
        self.record_call("create", model, &args)?;
        Ok(self.single())
    }

    async fn update(&self, model: &ModelName, args: UpdateArgs<Value, Value>) -> Result<Value, FakeError> {
        self.record_call("update", model, &args)?;
        Ok(self.single())
    }

    async fn delete(&self, model: &ModelName, args: DeleteArgs<Value>) -> Result<Value, FakeError> {
        self.record_call("delete", model, &args)?;
        Ok(self.single())
    }
}

/// Unique scratch file path for store tests.
pub fn temp_store_path(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}_{}.json", prefix, uuid::Uuid::new_v4()))
}
