//! `tracing` events emitted while building requests.
//!
//! Compiled to no-ops without the `tracing` feature. Bind values and
//! passwords are never logged.

use crate::error::RequestError;

#[cfg(feature = "tracing")]
const TARGET: &str = "n1ql.request";

/// Log a setter rejecting its input and hand the error back.
#[cfg(feature = "tracing")]
pub(crate) fn rejected(setter: &'static str, err: RequestError) -> RequestError {
    tracing::debug!(target: TARGET, setter, kind = err.kind(), error = %err, "rejected request option");
    err
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn rejected(_setter: &'static str, err: RequestError) -> RequestError {
    err
}

#[cfg(feature = "tracing")]
pub(crate) fn materialized(
    prepared: bool,
    param_count: usize,
    credential_count: usize,
    key_count: usize,
) {
    tracing::debug!(
        target: TARGET,
        prepared,
        param_count,
        credential_count,
        key_count,
        "materialized query request"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn materialized(
    _prepared: bool,
    _param_count: usize,
    _credential_count: usize,
    _key_count: usize,
) {
}

#[cfg(feature = "tracing")]
pub(crate) fn legacy_encoding() {
    tracing::warn!(
        target: TARGET,
        "form-urlencoded query parameters are deprecated; send the JSON payload"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn legacy_encoding() {}
