//! Prepared query plans.

use crate::error::RequestResult;
use serde::{Deserialize, Serialize};

/// A named, pre-compiled query plan produced by an upstream `PREPARE`.
///
/// The builder only reads `name` and `encoded_plan`; `text` is kept for
/// diagnostics. Decoding a `PREPARE` result row ignores any other keys
/// (`operator`, `signature`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPlan {
    name: String,
    encoded_plan: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl QueryPlan {
    pub fn new(name: impl Into<String>, encoded_plan: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            encoded_plan: encoded_plan.into(),
            text: None,
        }
    }

    /// Record the statement text the plan was prepared from.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Decode a plan from a `PREPARE` result row.
    pub fn from_json(json: &str) -> RequestResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn encoded_plan(&self) -> &str {
        &self.encoded_plan
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}
