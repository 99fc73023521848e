//! Per-request identifiers for namespacing generated artifacts

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Unique identifier assigned to a single conversion request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RequestId(Uuid);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Generator for request identifiers
///
/// Injected into the handler state so artifact naming never depends on
/// ambient global counters.
#[derive(Debug, Clone, Default)]
pub struct RequestIdGenerator;

impl RequestIdGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Produce a fresh identifier
    pub fn next_id(&self) -> RequestId {
        RequestId(Uuid::new_v4())
    }
}
