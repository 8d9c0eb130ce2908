//! The query request builder.

use crate::error::{RequestError, RequestResult};
use crate::form::FormValues;
use crate::options::{Compression, Encoding, Format, ScanConsistency};
use crate::plan::QueryPlan;
use crate::scan_vector::ScanVector;
use crate::trace;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::{Value, json};
use std::fmt;
use std::time::Duration;
use url::Url;


/// Prefix the service expects on named parameter keys.
pub const PARAMETER_SIGIL: char = '$';

const ADMIN_NAMESPACE: &str = "admin:";
const LOCAL_NAMESPACE: &str = "local:";

/// A single N1QL query request: either a raw statement or a prepared plan,
/// plus bind parameters and per-request service options.
///
/// Setters validate eagerly and return `&mut Self` so calls can be chained.
/// The request is turned into wire parameters with [`form_values`](Self::form_values)
/// (or [`form_values_as_json`](Self::form_values_as_json)), which can be called
/// any number of times without changing the request.
///
/// # Example
/// ```
/// use n1ql_request::{QueryRequest, ScanConsistency};
/// use std::time::Duration;
///
/// let mut request = QueryRequest::with_statement("SELECT * FROM `travel-sample` WHERE city = $city")?;
/// request
///     .add_named_parameter("city", "Paris")?
///     .scan_consistency(ScanConsistency::RequestPlus)?
///     .timeout(Duration::from_secs(5));
///
/// let values = request.form_values()?;
/// assert_eq!(values.get("$city"), Some(&serde_json::json!("Paris")));
/// assert_eq!(values.get("timeout"), Some(&serde_json::json!("5000ms")));
/// # Ok::<(), n1ql_request::RequestError>(())
/// ```
#[derive(Clone)]
#[must_use]
pub struct QueryRequest {
    statement: Option<String>,
    plan: Option<QueryPlan>,
    ad_hoc: bool,
    timeout: Duration,
    read_only: Option<bool>,
    include_metrics: Option<bool>,
    named_parameters: IndexMap<String, Value>,
    positional_parameters: Vec<Value>,
    format: Option<Format>,
    encoding: Option<Encoding>,
    compression: Option<Compression>,
    include_signature: Option<bool>,
    scan_consistency: Option<ScanConsistency>,
    scan_vector: Option<ScanVector>,
    scan_wait: Option<Duration>,
    pretty: bool,
    credentials: IndexMap<String, String>,
    client_context_id: Option<String>,
    base_uri: Option<Url>,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            statement: None,
            plan: None,
            ad_hoc: true,
            timeout: Duration::ZERO,
            read_only: None,
            include_metrics: None,
            named_parameters: IndexMap::new(),
            positional_parameters: Vec::new(),
            format: None,
            encoding: None,
            compression: None,
            include_signature: None,
            scan_consistency: None,
            scan_vector: None,
            scan_wait: None,
            pretty: false,
            credentials: IndexMap::new(),
            client_context_id: None,
            base_uri: None,
        }
    }
}

impl QueryRequest {
    /// Create an empty request. A statement or plan must be set before
    /// materializing it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a request for a raw statement.
    pub fn with_statement(statement: impl Into<String>) -> RequestResult<Self> {
        let mut request = Self::new();
        request.statement(statement)?;
        Ok(request)
    }

    /// Create a request that executes a prepared plan.
    pub fn with_plan(plan: QueryPlan) -> RequestResult<Self> {
        let mut request = Self::new();
        request.prepared(plan)?;
        Ok(request)
    }

    // ==================== Statement / plan ====================

    /// Set the raw statement text, replacing any prepared plan.
    pub fn statement(&mut self, statement: impl Into<String>) -> RequestResult<&mut Self> {
        let statement = statement.into();
        if statement.trim().is_empty() {
            return Err(trace::rejected(
                "statement",
                RequestError::invalid_argument("statement cannot be empty or blank"),
            ));
        }
        self.statement = Some(statement);
        self.plan = None;
        Ok(self)
    }

    /// Execute a prepared plan instead of a statement, replacing any statement.
    pub fn prepared(&mut self, plan: QueryPlan) -> RequestResult<&mut Self> {
        if plan.encoded_plan().trim().is_empty() {
            return Err(trace::rejected(
                "prepared",
                RequestError::invalid_argument(format!(
                    "plan {:?} has no encoded plan",
                    plan.name()
                )),
            ));
        }
        self.plan = Some(plan);
        self.statement = None;
        Ok(self)
    }

    /// Whether the service may transparently substitute a prepared plan.
    ///
    /// Advisory only; it is not sent as a wire parameter.
    pub fn ad_hoc(&mut self, ad_hoc: bool) -> &mut Self {
        self.ad_hoc = ad_hoc;
        self
    }

    // ==================== Service options ====================

    /// Server-side execution timeout. `Duration::ZERO` (the default) means
    /// the service applies no timeout and the parameter is not sent.
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    pub fn read_only(&mut self, read_only: bool) -> &mut Self {
        self.read_only = Some(read_only);
        self
    }

    /// Ask the service to include execution metrics in the response.
    pub fn metrics(&mut self, include_metrics: bool) -> &mut Self {
        self.include_metrics = Some(include_metrics);
        self
    }

    pub fn format(&mut self, format: Format) -> &mut Self {
        self.format = Some(format);
        self
    }

    pub fn encoding(&mut self, encoding: Encoding) -> &mut Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn compression(&mut self, compression: Compression) -> &mut Self {
        self.compression = Some(compression);
        self
    }

    /// Ask the service to include the result signature in the response.
    pub fn signature(&mut self, include_signature: bool) -> &mut Self {
        self.include_signature = Some(include_signature);
        self
    }

    /// Set the index scan consistency.
    ///
    /// `AtPlus` and `StatementPlus` are rejected with
    /// [`RequestError::Unsupported`].
    pub fn scan_consistency(&mut self, level: ScanConsistency) -> RequestResult<&mut Self> {
        if !level.is_supported() {
            return Err(trace::rejected(
                "scan_consistency",
                RequestError::unsupported(format!(
                    "scan consistency {level} is not supported"
                )),
            ));
        }
        self.scan_consistency = Some(level);
        Ok(self)
    }

    /// Attach an opaque scan vector. The token is sent as-is.
    pub fn scan_vector(&mut self, scan_vector: impl Into<ScanVector>) -> &mut Self {
        self.scan_vector = Some(scan_vector.into());
        self
    }

    /// Maximum time the index may take to catch up before the scan.
    pub fn scan_wait(&mut self, scan_wait: Duration) -> &mut Self {
        self.scan_wait = Some(scan_wait);
        self
    }

    /// Ask the service to pretty-print its response.
    pub fn pretty(&mut self, pretty: bool) -> &mut Self {
        self.pretty = pretty;
        self
    }

    /// Caller-supplied correlation id echoed back by the service.
    pub fn client_context_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.client_context_id = Some(id.into());
        self
    }

    /// Endpoint the transport should send this request to.
    pub fn base_uri(&mut self, uri: Url) -> &mut Self {
        self.base_uri = Some(uri);
        self
    }

    // ==================== Parameters ====================

    /// Bind a named parameter. The `$` sigil is added when missing, and
    /// `"foo"` and `"$foo"` name the same parameter.
    pub fn add_named_parameter(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> RequestResult<&mut Self> {
        let key = parameter_key(name.into());
        match self.named_parameters.entry(key) {
            Entry::Occupied(e) => Err(trace::rejected(
                "add_named_parameter",
                RequestError::duplicate_key(e.key().clone()),
            )),
            Entry::Vacant(e) => {
                e.insert(value.into());
                Ok(self)
            }
        }
    }

    /// Bind several named parameters.
    ///
    /// Either all parameters are added or, if any name is already bound (or
    /// repeated within `params`), none are.
    pub fn add_named_parameters<K, V>(
        &mut self,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> RequestResult<&mut Self>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut staged: IndexMap<String, Value> = IndexMap::new();
        for (name, value) in params {
            let key = parameter_key(name.into());
            if self.named_parameters.contains_key(&key) || staged.contains_key(&key) {
                return Err(trace::rejected(
                    "add_named_parameters",
                    RequestError::duplicate_key(key),
                ));
            }
            staged.insert(key, value.into());
        }
        self.named_parameters.extend(staged);
        Ok(self)
    }

    /// Append a positional parameter (`$1`, `$2`, ... in the statement).
    pub fn add_positional_parameter(&mut self, value: impl Into<Value>) -> &mut Self {
        self.positional_parameters.push(value.into());
        self
    }

    /// Append several positional parameters in order.
    pub fn add_positional_parameters<V: Into<Value>>(
        &mut self,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.positional_parameters
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Add credentials for a bucket (`local:`) or an administrator (`admin:`).
    ///
    /// Usernames that already carry either namespace are used unchanged.
    pub fn add_credentials(
        &mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        is_admin: bool,
    ) -> RequestResult<&mut Self> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(trace::rejected(
                "add_credentials",
                RequestError::invalid_argument("username cannot be empty or blank"),
            ));
        }
        let key = credential_key(username, is_admin);
        match self.credentials.entry(key) {
            Entry::Occupied(e) => Err(trace::rejected(
                "add_credentials",
                RequestError::duplicate_key(e.key().clone()),
            )),
            Entry::Vacant(e) => {
                e.insert(password.into());
                Ok(self)
            }
        }
    }

    // ==================== Accessors ====================

    /// `true` when the request executes a prepared plan.
    pub fn is_prepared(&self) -> bool {
        self.plan.is_some()
    }

    pub fn is_ad_hoc(&self) -> bool {
        self.ad_hoc
    }

    pub fn get_statement(&self) -> Option<&str> {
        self.statement.as_deref()
    }

    pub fn plan(&self) -> Option<&QueryPlan> {
        self.plan.as_ref()
    }

    /// Statement text for diagnostics: the raw statement, or the text the
    /// plan was prepared from when it recorded one.
    pub fn original_statement(&self) -> Option<&str> {
        match &self.plan {
            Some(plan) => plan.text(),
            None => self.statement.as_deref(),
        }
    }

    pub fn get_timeout(&self) -> Duration {
        self.timeout
    }

    pub fn get_scan_consistency(&self) -> Option<ScanConsistency> {
        self.scan_consistency
    }

    pub fn get_client_context_id(&self) -> Option<&str> {
        self.client_context_id.as_deref()
    }

    pub fn get_base_uri(&self) -> Option<&Url> {
        self.base_uri.as_ref()
    }

    /// Named parameters keyed by their `$`-prefixed names, in insertion order.
    pub fn named_parameters(&self) -> &IndexMap<String, Value> {
        &self.named_parameters
    }

    pub fn positional_parameters(&self) -> &[Value] {
        &self.positional_parameters
    }

    /// Namespaced usernames of the attached credentials, in insertion order.
    pub fn credential_users(&self) -> impl Iterator<Item = &str> {
        self.credentials.keys().map(String::as_str)
    }

    // ==================== Materialization ====================

    /// Materialize the wire parameters for this request.
    ///
    /// Fails with [`RequestError::InvalidState`] when neither a statement nor
    /// a plan is set; every other field is optional and emitted only when set.
    pub fn form_values(&self) -> RequestResult<FormValues> {
        let mut values = FormValues::new();

        match (&self.plan, &self.statement) {
            (Some(plan), _) => {
                values.insert("prepared", plan.name());
                values.insert("encoded_plan", plan.encoded_plan());
            }
            (None, Some(statement)) => values.insert("statement", statement.as_str()),
            (None, None) => {
                return Err(RequestError::invalid_state(
                    "a statement or prepared plan must be set",
                ));
            }
        }

        if !self.timeout.is_zero() {
            values.insert("timeout", format!("{}ms", self.timeout.as_millis()));
        }
        if let Some(read_only) = self.read_only {
            values.insert("readonly", read_only);
        }
        if let Some(metrics) = self.include_metrics {
            values.insert("metrics", metrics);
        }
        for (name, value) in &self.named_parameters {
            values.insert(name.as_str(), value.clone());
        }
        if !self.positional_parameters.is_empty() {
            values.insert("args", self.positional_parameters.clone());
        }
        if let Some(format) = self.format {
            values.insert("format", format.as_str());
        }
        if let Some(encoding) = self.encoding {
            values.insert("encoding", encoding.as_str());
        }
        if let Some(compression) = self.compression {
            values.insert("compression", compression.as_str());
        }
        if let Some(signature) = self.include_signature {
            values.insert("signature", signature);
        }
        if let Some(level) = self.scan_consistency {
            values.insert("scan_consistency", level.as_str());
        }
        if let Some(scan_vector) = &self.scan_vector {
            values.insert("scan_vector", scan_vector.as_value().clone());
        }
        if let Some(scan_wait) = self.scan_wait {
            values.insert("scan_wait", scan_wait.as_millis().to_string());
        }
        if self.pretty {
            values.insert("pretty", true);
        }
        if !self.credentials.is_empty() {
            let creds: Vec<Value> = self
                .credentials
                .iter()
                .map(|(user, pass)| json!({ "user": user, "pass": pass }))
                .collect();
            values.insert("creds", creds);
        }
        if let Some(id) = self.client_context_id.as_deref().filter(|id| !id.is_empty()) {
            values.insert("client_context_id", id);
        }

        trace::materialized(
            self.is_prepared(),
            self.named_parameters.len() + self.positional_parameters.len(),
            self.credentials.len(),
            values.len(),
        );
        Ok(values)
    }

    /// The materialized parameters as a JSON object, the request body the
    /// transport should send.
    pub fn form_values_as_json(&self) -> RequestResult<String> {
        self.form_values()?.to_json()
    }

    /// The materialized parameters as a legacy `application/x-www-form-urlencoded`
    /// query string.
    #[deprecated(note = "send the JSON payload from `form_values_as_json` instead")]
    #[allow(deprecated)]
    pub fn query_parameters_as_form_urlencoded(&self) -> RequestResult<String> {
        let values = self.form_values()?;
        trace::legacy_encoding();
        Ok(values.to_form_urlencoded())
    }
}

/// Diagnostic rendering: the base URI followed by the JSON payload.
///
/// Renders nothing when the request cannot be materialized; do not parse
/// this output.
impl fmt::Display for QueryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(json) = self.form_values_as_json() else {
            return Ok(());
        };
        if let Some(uri) = &self.base_uri {
            f.write_str(uri.as_str())?;
        }
        f.write_str(&json)
    }
}

impl fmt::Debug for QueryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let credentials: IndexMap<&str, &str> = self
            .credentials
            .keys()
            .map(|user| (user.as_str(), "<redacted>"))
            .collect();
        f.debug_struct("QueryRequest")
            .field("statement", &self.statement)
            .field("plan", &self.plan)
            .field("ad_hoc", &self.ad_hoc)
            .field("timeout", &self.timeout)
            .field("read_only", &self.read_only)
            .field("include_metrics", &self.include_metrics)
            .field("named_parameters", &self.named_parameters)
            .field("positional_parameters", &self.positional_parameters)
            .field("format", &self.format)
            .field("encoding", &self.encoding)
            .field("compression", &self.compression)
            .field("include_signature", &self.include_signature)
            .field("scan_consistency", &self.scan_consistency)
            .field("scan_vector", &self.scan_vector)
            .field("scan_wait", &self.scan_wait)
            .field("pretty", &self.pretty)
            .field("credentials", &credentials)
            .field("client_context_id", &self.client_context_id)
            .field("base_uri", &self.base_uri.as_ref().map(Url::as_str))
            .finish()
    }
}

fn parameter_key(name: String) -> String {
    if name.starts_with(PARAMETER_SIGIL) {
        name
    } else {
        format!("{PARAMETER_SIGIL}{name}")
    }
}

fn credential_key(username: String, is_admin: bool) -> String {
    if username.starts_with(ADMIN_NAMESPACE) || username.starts_with(LOCAL_NAMESPACE) {
        return username;
    }
    let namespace = if is_admin {
        ADMIN_NAMESPACE
    } else {
        LOCAL_NAMESPACE
    };
    format!("{namespace}{username}")
}
