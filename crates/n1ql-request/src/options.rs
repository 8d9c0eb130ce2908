//! Enumerated request options and their wire labels.
//!
//! Every option here is sent to the query service as a plain string. The
//! labels are case-sensitive and must match what the service expects.

use crate::error::{RequestError, RequestResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result format requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    #[serde(rename = "JSON", alias = "json")]
    Json,
    #[serde(rename = "XML", alias = "xml")]
    Xml,
    #[serde(rename = "CSV", alias = "csv")]
    Csv,
    #[serde(rename = "TSV", alias = "tsv")]
    Tsv,
}

impl Format {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Xml => "XML",
            Self::Csv => "CSV",
            Self::Tsv => "TSV",
        }
    }
}

/// Character encoding of the request and response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    #[serde(rename = "UTF8", alias = "utf8", alias = "UTF-8")]
    Utf8,
}

impl Encoding {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF8",
        }
    }
}

/// Compression applied to the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compression {
    #[serde(rename = "ZIP", alias = "zip")]
    Zip,
    #[serde(rename = "RLE", alias = "rle")]
    Rle,
    #[serde(rename = "LZMA", alias = "lzma")]
    Lzma,
    #[serde(rename = "LZO", alias = "lzo")]
    Lzo,
    #[serde(rename = "NONE", alias = "none")]
    None,
}

impl Compression {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zip => "ZIP",
            Self::Rle => "RLE",
            Self::Lzma => "LZMA",
            Self::Lzo => "LZO",
            Self::None => "NONE",
        }
    }
}

/// Staleness guarantee for the index data a query reads.
///
/// Only [`NotBounded`](ScanConsistency::NotBounded) and
/// [`RequestPlus`](ScanConsistency::RequestPlus) can be set on a request;
/// the other variants exist so the wire table is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanConsistency {
    /// No consistency constraint; fastest.
    NotBounded,
    /// Index must be caught up with all mutations made before the request.
    RequestPlus,
    /// Index must be caught up to a supplied scan vector.
    AtPlus,
    /// Index must be caught up with mutations made before each statement.
    StatementPlus,
}

/// Wire values for [`ScanConsistency`], in declaration order.
pub const SCAN_CONSISTENCY_WIRE: [(ScanConsistency, &str); 4] = [
    (ScanConsistency::NotBounded, "not_bounded"),
    (ScanConsistency::RequestPlus, "request_plus"),
    (ScanConsistency::AtPlus, "at_plus"),
    (ScanConsistency::StatementPlus, "statement_plus"),
];

impl ScanConsistency {
    /// Wire string sent as `scan_consistency`.
    pub const fn as_str(self) -> &'static str {
        SCAN_CONSISTENCY_WIRE[self as usize].1
    }

    /// Whether a request may carry this level.
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::NotBounded | Self::RequestPlus)
    }
}

impl FromStr for ScanConsistency {
    type Err = RequestError;

    fn from_str(s: &str) -> RequestResult<Self> {
        SCAN_CONSISTENCY_WIRE
            .iter()
            .find(|(_, wire)| *wire == s)
            .map(|(level, _)| *level)
            .ok_or_else(|| {
                RequestError::invalid_argument(format!("unknown scan consistency: {s:?}"))
            })
    }
}

macro_rules! impl_display_as_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

impl_display_as_str!(Format, Encoding, Compression, ScanConsistency);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_consistency_table_matches_variants() {
        for (level, wire) in SCAN_CONSISTENCY_WIRE {
            assert_eq!(level.as_str(), wire);
            assert_eq!(wire.parse::<ScanConsistency>().unwrap(), level);
        }
    }

    #[test]
    fn scan_consistency_parse_rejects_unknown() {
        let err = "eventual".parse::<ScanConsistency>().unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn only_unbounded_levels_are_supported() {
        assert!(ScanConsistency::NotBounded.is_supported());
        assert!(ScanConsistency::RequestPlus.is_supported());
        assert!(!ScanConsistency::AtPlus.is_supported());
        assert!(!ScanConsistency::StatementPlus.is_supported());
    }

    #[test]
    fn labels_are_upper_case() {
        assert_eq!(Format::Csv.to_string(), "CSV");
        assert_eq!(Encoding::Utf8.to_string(), "UTF8");
        assert_eq!(Compression::None.to_string(), "NONE");
        assert_eq!(Compression::Lzma.as_str(), "LZMA");
    }

    #[test]
    fn serde_uses_wire_labels() {
        let level: ScanConsistency = serde_json::from_str("\"request_plus\"").unwrap();
        assert_eq!(level, ScanConsistency::RequestPlus);
        let format: Format = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, Format::Json);
        assert_eq!(serde_json::to_string(&Compression::Zip).unwrap(), "\"ZIP\"");
    }
}
