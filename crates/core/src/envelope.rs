// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Robot envelope: the uniform machine-readable response wrapper for every
//! externally invoked operation (spec 4.H).
//!
//! Stability is a hard guarantee: arrays are never null, timestamps are
//! always RFC3339 UTC, and `version` always follows semver.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::NtmError;

/// Crate version, reused verbatim as the envelope's `version` field so CLI
/// and library stay in lockstep.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pagination metadata for list operations that accept `limit`/`offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: usize,
    pub offset: usize,
    pub count: usize,
    pub total: usize,
    pub has_more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<usize>,
}

impl Pagination {
    /// Build pagination metadata for a page of `count` items starting at
    /// `offset` out of `total`. `next_cursor = offset + count` when
    /// `has_more` (spec 4.H).
    pub fn new(limit: usize, offset: usize, count: usize, total: usize) -> Self {
        let has_more = offset + count < total;
        let next_cursor = has_more.then_some(offset + count);
        Self { limit, offset, count, total, has_more, next_cursor }
    }
}

/// Uniform machine-readable response wrapper for every externally invoked
/// operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotEnvelope {
    pub success: bool,
    pub timestamp: String,
    pub version: String,
    pub output_format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Opaque per spec 9 Open Questions: clients must tolerate unknown keys.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub agent_hints: Map<String, Value>,
    /// Operation-specific payload fields, flattened into the top-level
    /// object at serialization time.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RobotEnvelope {
    fn base(now_rfc3339: &str) -> Self {
        Self {
            success: true,
            timestamp: now_rfc3339.to_string(),
            version: VERSION.to_string(),
            output_format: "json".to_string(),
            session: None,
            error_code: None,
            error: None,
            hint: None,
            pagination: None,
            agent_hints: Map::new(),
            fields: Map::new(),
        }
    }

    /// Build a success envelope.
    pub fn success(now_rfc3339: &str) -> Self {
        Self::base(now_rfc3339)
    }

    /// Build a failure envelope from an [`NtmError`], filling `error_code`
    /// and `hint` from the closed error-kind mapping (spec 7).
    pub fn failure(now_rfc3339: &str, err: &NtmError) -> Self {
        let mut env = Self::base(now_rfc3339);
        env.success = false;
        env.error_code = Some(err.robot_code().to_string());
        env.error = Some(err.to_string());
        env.hint = Some(err.hint());
        env
    }

    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Insert an operation-specific field. Arrays must be passed as
    /// `Value::Array` (never omitted) so the "arrays never null" guarantee
    /// holds at every call site, not just by convention.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Convenience for the common case of attaching a list field, making
    /// the "never null" guarantee a type-level fact at the call site.
    pub fn with_list(self, key: impl Into<String>, items: Vec<Value>) -> Self {
        self.with_field(key, Value::Array(items))
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
