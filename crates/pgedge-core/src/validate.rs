//! Validation of topology documents.
//!
//! Each invariant is a separate public check so callers and tests can run
//! them independently. [`validate_document`] runs all of them in a fixed
//! order and returns the first failure. Nothing here mutates the document.
//!
//! [`lint_document`] reports conditions that existing files are allowed to
//! contain but operators usually want to hear about. Findings never fail a
//! command.

use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{PgEdgeError, PgEdgeResult};
use crate::model::{DatabaseCredential, TopologyDocument};
use crate::version::DocumentVersion;

/// Validate all document invariants.
pub fn validate_document(doc: &TopologyDocument) -> PgEdgeResult<()> {
    check_schema_version(doc)?;
    check_cluster_name(doc)?;
    check_engine_version(doc)?;
    check_credentials(&doc.database.credentials)?;
    Ok(())
}

/// `json_version` must be exactly the supported literal.
pub fn check_schema_version(doc: &TopologyDocument) -> PgEdgeResult<()> {
    DocumentVersion::parse(&doc.schema_version).map(|_| ())
}

pub fn check_cluster_name(doc: &TopologyDocument) -> PgEdgeResult<()> {
    if doc.cluster_name.is_empty() {
        return Err(PgEdgeError::MissingRequiredField("cluster_name"));
    }
    Ok(())
}

pub fn check_engine_version(doc: &TopologyDocument) -> PgEdgeResult<()> {
    if doc.database.engine_version.is_empty() {
        return Err(PgEdgeError::MissingRequiredField("pgedge.pg_version"));
    }
    Ok(())
}

/// Every credential needs a name, user and password.
pub fn check_credentials(credentials: &[DatabaseCredential]) -> PgEdgeResult<()> {
    for (index, c) in credentials.iter().enumerate() {
        let field = if c.name.is_empty() {
            "db_name"
        } else if c.user.is_empty() {
            "db_user"
        } else if c.password.is_empty() {
            "db_password"
        } else {
            continue;
        };
        return Err(PgEdgeError::InvalidDatabaseCredential { index, field });
    }
    Ok(())
}

/// A non-fatal observation about a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintFinding {
    /// The same node name is used by more than one entry (primaries and
    /// replicas share one namespace).
    DuplicateNodeName { name: String, count: usize },
    /// `pgedge.databases` is empty.
    NoDatabases,
}

impl fmt::Display for LintFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNodeName { name, count } => {
                write!(f, "node name {name:?} is used by {count} nodes")
            }
            Self::NoDatabases => f.write_str("no databases configured"),
        }
    }
}

/// Collect non-fatal findings in deterministic order.
pub fn lint_document(doc: &TopologyDocument) -> Vec<LintFinding> {
    let mut findings = Vec::new();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for endpoint in doc.endpoints() {
        *counts.entry(endpoint.name.as_str()).or_default() += 1;
    }
    for (name, count) in counts {
        if count > 1 {
            findings.push(LintFinding::DuplicateNodeName {
                name: name.to_string(),
                count,
            });
        }
    }

    if doc.database.credentials.is_empty() {
        findings.push(LintFinding::NoDatabases);
    }
    findings
}
