use anyhow::Context;
use n1ql_request::{QueryPlan, QueryRequest, RequestConfig, ScanVector};
use serde::Deserialize;
use std::path::Path;

/// A query request described in TOML.
///
/// ```toml
/// statement = "SELECT * FROM `travel-sample` WHERE city = $city LIMIT $1"
/// positional = [10]
///
/// [options]
/// timeout_ms = 5000
/// scan_consistency = "request_plus"
///
/// [named]
/// city = "Paris"
///
/// [[credentials]]
/// user = "travel-sample"
/// password = "secret"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestFile {
    pub statement: Option<String>,
    pub prepared: Option<QueryPlan>,
    #[serde(default)]
    pub options: RequestConfig,
    #[serde(default)]
    pub named: toml::Table,
    #[serde(default)]
    pub positional: Vec<toml::Value>,
    pub scan_vector: Option<toml::Value>,
    #[serde(default)]
    pub credentials: Vec<CredentialEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialEntry {
    pub user: String,
    pub password: String,
    #[serde(default)]
    pub admin: bool,
}

impl RequestFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read request file {}: {e}", path.display()))?;
        Self::parse(&raw)
            .map_err(|e| anyhow::anyhow!("failed to parse request file {}: {e}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Build the request: project defaults first, then this file's options,
    /// statement or plan, parameters and credentials.
    pub fn build(self, defaults: &RequestConfig) -> anyhow::Result<QueryRequest> {
        let mut request = QueryRequest::from_config(defaults).context("invalid [defaults]")?;
        self.options
            .apply(&mut request)
            .context("invalid [options]")?;

        match (self.statement, self.prepared) {
            (Some(_), Some(_)) => {
                anyhow::bail!("request file sets both `statement` and `[prepared]`")
            }
            (Some(statement), None) => {
                request.statement(statement)?;
            }
            (None, Some(plan)) => {
                request.prepared(plan)?;
            }
            (None, None) => anyhow::bail!("request file needs `statement` or `[prepared]`"),
        }

        for (name, value) in self.named {
            request.add_named_parameter(name, to_json(value))?;
        }
        for value in self.positional {
            request.add_positional_parameter(to_json(value));
        }
        if let Some(token) = self.scan_vector {
            request.scan_vector(ScanVector::new(to_json(token)));
        }
        for cred in self.credentials {
            request.add_credentials(cred.user, cred.password, cred.admin)?;
        }

        Ok(request)
    }
}

/// Convert a TOML value to the JSON value sent on the wire.
///
/// Datetimes become their RFC 3339 text. Non-finite floats become `null`.
fn to_json(value: toml::Value) -> serde_json::Value {
    use serde_json::Value;

    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, to_json(v)))
                .collect(),
        ),
    }
}
