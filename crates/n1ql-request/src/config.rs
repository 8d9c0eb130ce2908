//! Per-deployment request defaults.

use crate::error::RequestResult;
use crate::options::{Compression, Encoding, Format, ScanConsistency};
use crate::request::QueryRequest;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Per-deployment defaults applied to new query requests.
///
/// Every field is optional; unset fields leave the request's own defaults in
/// place. Values are applied through the regular setters, so a config cannot
/// carry anything a caller could not set directly.
///
/// # Example
/// ```
/// use n1ql_request::{QueryRequest, RequestConfig, ScanConsistency};
/// use std::time::Duration;
///
/// let config = RequestConfig::new()
///     .timeout(Duration::from_secs(75))
///     .scan_consistency(ScanConsistency::RequestPlus);
///
/// let mut request = QueryRequest::from_config(&config)?;
/// request.statement("SELECT 1")?;
/// # Ok::<(), n1ql_request::RequestError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestConfig {
    /// Query service endpoint.
    pub base_uri: Option<Url>,
    /// Server-side timeout in milliseconds. `0` disables it.
    pub timeout_ms: Option<u64>,
    /// Index catch-up wait in milliseconds.
    pub scan_wait_ms: Option<u64>,
    pub scan_consistency: Option<ScanConsistency>,
    pub read_only: Option<bool>,
    pub metrics: Option<bool>,
    pub signature: Option<bool>,
    pub pretty: Option<bool>,
    pub ad_hoc: Option<bool>,
    pub format: Option<Format>,
    pub encoding: Option<Encoding>,
    pub compression: Option<Compression>,
    pub client_context_id: Option<String>,
}

impl RequestConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_uri(mut self, uri: Url) -> Self {
        self.base_uri = Some(uri);
        self
    }

    /// Set the server-side timeout (truncated to whole milliseconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(millis(timeout));
        self
    }

    pub fn scan_wait(mut self, scan_wait: Duration) -> Self {
        self.scan_wait_ms = Some(millis(scan_wait));
        self
    }

    pub fn scan_consistency(mut self, level: ScanConsistency) -> Self {
        self.scan_consistency = Some(level);
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    pub fn metrics(mut self, metrics: bool) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn signature(mut self, signature: bool) -> Self {
        self.signature = Some(signature);
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = Some(pretty);
        self
    }

    pub fn ad_hoc(mut self, ad_hoc: bool) -> Self {
        self.ad_hoc = Some(ad_hoc);
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn client_context_id(mut self, id: impl Into<String>) -> Self {
        self.client_context_id = Some(id.into());
        self
    }

    /// Apply these defaults to `request`.
    ///
    /// Fails if a value is rejected by the corresponding setter, e.g. an
    /// unsupported scan consistency.
    pub fn apply(&self, request: &mut QueryRequest) -> RequestResult<()> {
        if let Some(uri) = &self.base_uri {
            request.base_uri(uri.clone());
        }
        if let Some(ms) = self.timeout_ms {
            request.timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.scan_wait_ms {
            request.scan_wait(Duration::from_millis(ms));
        }
        if let Some(level) = self.scan_consistency {
            request.scan_consistency(level)?;
        }
        if let Some(read_only) = self.read_only {
            request.read_only(read_only);
        }
        if let Some(metrics) = self.metrics {
            request.metrics(metrics);
        }
        if let Some(signature) = self.signature {
            request.signature(signature);
        }
        if let Some(pretty) = self.pretty {
            request.pretty(pretty);
        }
        if let Some(ad_hoc) = self.ad_hoc {
            request.ad_hoc(ad_hoc);
        }
        if let Some(format) = self.format {
            request.format(format);
        }
        if let Some(encoding) = self.encoding {
            request.encoding(encoding);
        }
        if let Some(compression) = self.compression {
            request.compression(compression);
        }
        if let Some(id) = &self.client_context_id {
            request.client_context_id(id.clone());
        }
        Ok(())
    }
}

impl QueryRequest {
    /// Create an empty request with `config` applied.
    pub fn from_config(config: &RequestConfig) -> RequestResult<Self> {
        let mut request = Self::new();
        config.apply(&mut request)?;
        Ok(request)
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn applies_defaults_to_request() {
        let config = RequestConfig::new()
            .timeout(Duration::from_millis(1500))
            .scan_wait(Duration::from_millis(20))
            .read_only(true)
            .format(Format::Json);

        let mut request = QueryRequest::from_config(&config).unwrap();
        request.statement("SELECT 1").unwrap();
        let values = request.form_values().unwrap();

        assert_eq!(values.get("timeout"), Some(&json!("1500ms")));
        assert_eq!(values.get("scan_wait"), Some(&json!("20")));
        assert_eq!(values.get("readonly"), Some(&json!(true)));
        assert_eq!(values.get("format"), Some(&json!("JSON")));
    }

    #[test]
    fn unsupported_consistency_in_config_is_rejected() {
        let config = RequestConfig::new().scan_consistency(ScanConsistency::AtPlus);
        let err = QueryRequest::from_config(&config).unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn deserializes_from_json_with_wire_names() {
        let config: RequestConfig = serde_json::from_value(json!({
            "base_uri": "http://localhost:8093/query/service",
            "timeout_ms": 75000,
            "scan_consistency": "request_plus",
            "compression": "NONE"
        }))
        .unwrap();

        assert_eq!(
            config.base_uri.as_ref().map(Url::as_str),
            Some("http://localhost:8093/query/service")
        );
        assert_eq!(config.timeout_ms, Some(75000));
        assert_eq!(config.scan_consistency, Some(ScanConsistency::RequestPlus));
        assert_eq!(config.compression, Some(Compression::None));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = serde_json::from_value::<RequestConfig>(json!({ "timeout": 5 }));
        assert!(result.is_err());
    }
}
