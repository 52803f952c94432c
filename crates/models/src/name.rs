use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Identifier of a collection inside a persistence client.
///
/// Cheap to clone; the underlying string is shared.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelName(Arc<str>);

impl ModelName {
    /// Build a name without checks. Use [`ModelName::parse`] for untrusted input.
    pub fn new(name: impl Into<Arc<str>>) -> Self { Self(name.into()) }

    /// Trim and validate a name coming from configuration or user input.
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ModelError::InvalidName("name must not be empty".into()));
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ModelError::InvalidName(format!("`{name}` contains whitespace")));
        }
        Ok(Self(name.into()))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str { &self.0 }
}

impl From<&str> for ModelName {
    fn from(value: &str) -> Self { Self::new(value) }
}

impl From<String> for ModelName {
    fn from(value: String) -> Self { Self::new(value) }
}
