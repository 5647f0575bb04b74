//! Address set differ.
//!
//! Compares the readiness recorded on the endpoint resource with a fresh
//! probe batch and emits the moves needed to bring the two in line.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use thiserror::Error;

use crate::health::ProbeResult;

/// Snapshot of which addresses are currently ready, keyed by ip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification(BTreeMap<String, bool>);

impl Classification {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Some(true)` if ready, `Some(false)` if not-ready, `None` if unknown.
    pub fn is_ready(&self, ip: &str) -> Option<bool> {
        self.0.get(ip).copied()
    }

    /// Every known address, in ip order.
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<BTreeMap<String, bool>> for Classification {
    fn from(current: BTreeMap<String, bool>) -> Self {
        Self(current)
    }
}

/// One address changing pools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// ready → not-ready
    Disable(String),
    /// not-ready → ready
    Enable(String),
}

impl Mutation {
    pub fn ip(&self) -> &str {
        match self {
            Mutation::Disable(ip) | Mutation::Enable(ip) => ip,
        }
    }

    /// Metric / log label for the direction of the move.
    pub fn direction(&self) -> &'static str {
        match self {
            Mutation::Disable(_) => "disable",
            Mutation::Enable(_) => "enable",
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.direction(), self.ip())
    }
}

/// Mutations computed for one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    pub mutations: Vec<Mutation>,
}

impl Diff {
    /// True iff at least one address has to move.
    pub fn changed(&self) -> bool {
        !self.mutations.is_empty()
    }
}

/// A probe batch that does not line up with the snapshot it was taken for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    #[error("expected {expected} probe results, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("probe result for {0}, which is not part of the current snapshot")]
    UnknownAddress(String),

    #[error("more than one probe result for {0}")]
    DuplicateResult(String),
}

/// Compute the moves implied by `results` against `current`.
///
/// The batch must hold exactly one result for every address in `current`;
/// anything else is rejected instead of defaulting the missing outcomes.
/// Mutations come out in ip order.
pub fn diff(current: &Classification, results: &[ProbeResult]) -> Result<Diff, DiffError> {
    if results.len() != current.len() {
        return Err(DiffError::SizeMismatch {
            expected: current.len(),
            actual: results.len(),
        });
    }

    let mut outcomes: HashMap<&str, bool> = HashMap::with_capacity(results.len());
    for result in results {
        if current.is_ready(&result.ip).is_none() {
            return Err(DiffError::UnknownAddress(result.ip.clone()));
        }
        if outcomes.insert(result.ip.as_str(), result.reachable).is_some() {
            return Err(DiffError::DuplicateResult(result.ip.clone()));
        }
    }

    let mutations = current
        .0
        .iter()
        .filter_map(|(ip, &ready)| match (ready, outcomes[ip.as_str()]) {
            (true, false) => Some(Mutation::Disable(ip.clone())),
            (false, true) => Some(Mutation::Enable(ip.clone())),
            _ => None,
        })
        .collect();

    Ok(Diff { mutations })
}
