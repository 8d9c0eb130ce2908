//! Opaque scan vector tokens.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque point-in-time consistency token sent as `scan_vector`.
///
/// The builder never inspects the payload; whatever JSON it wraps is emitted
/// verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanVector(Value);

impl ScanVector {
    pub fn new(token: impl Into<Value>) -> Self {
        Self(token.into())
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for ScanVector {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
