//! # n1ql-request
//!
//! Builds the request payload for the N1QL query service.
//!
//! A [`QueryRequest`] collects a statement (or a prepared [`QueryPlan`]), bind
//! parameters and per-request service options, validating each value as it is
//! set. [`QueryRequest::form_values`] turns it into the ordered set of wire
//! parameters the service expects; [`QueryRequest::form_values_as_json`] gives
//! the JSON body to hand to an HTTP transport.
//!
//! Sending the request, authenticating against the cluster and decoding the
//! response are left to the caller.
//!
//! ```
//! use n1ql_request::{query, ScanConsistency};
//!
//! let mut request = query("SELECT name FROM `beer-sample` WHERE abv > $1")?;
//! request
//!     .add_positional_parameter(5.5)
//!     .scan_consistency(ScanConsistency::RequestPlus)?
//!     .client_context_id("req-42");
//!
//! let body = request.form_values_as_json()?;
//! assert!(body.starts_with(r#"{"statement":"#));
//! # Ok::<(), n1ql_request::RequestError>(())
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): emit `debug` events with target `n1ql.request` when
//!   options are rejected and when a request is materialized.

pub mod config;
pub mod error;
pub mod form;
pub mod options;
pub mod plan;
pub mod request;
pub mod scan_vector;

mod trace;

pub use config::RequestConfig;
pub use error::{RequestError, RequestResult};
pub use form::FormValues;
pub use options::{Compression, Encoding, Format, SCAN_CONSISTENCY_WIRE, ScanConsistency};
pub use plan::QueryPlan;
pub use request::{PARAMETER_SIGIL, QueryRequest};
pub use scan_vector::ScanVector;

/// Create a request for a raw statement.
///
/// Shorthand for [`QueryRequest::with_statement`].
pub fn query(statement: impl Into<String>) -> RequestResult<QueryRequest> {
    QueryRequest::with_statement(statement)
}

/// Create a request that executes a prepared plan.
///
/// Shorthand for [`QueryRequest::with_plan`].
pub fn prepared(plan: QueryPlan) -> RequestResult<QueryRequest> {
    QueryRequest::with_plan(plan)
}
