//! Version helpers.
//!
//! Topology documents carry a `json_version` string. Only the exact literal
//! supported by this build is accepted; there is no migration path between
//! document versions.

use crate::errors::{PgEdgeError, PgEdgeResult};

/// Known topology document versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentVersion {
    V1_1,
}

impl DocumentVersion {
    /// The version written by this build.
    pub const CURRENT: Self = Self::V1_1;

    /// Parse a document version string. Matching is exact: no trimming and
    /// no numeric comparison, so `"1.10"` and `" 1.1"` are rejected.
    pub fn parse(s: &str) -> PgEdgeResult<Self> {
        match s {
            crate::JSON_VERSION => Ok(Self::V1_1),
            _ => Err(PgEdgeError::version_mismatch(Self::CURRENT.as_str(), s)),
        }
    }

    /// Return the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1_1 => crate::JSON_VERSION,
        }
    }
}
