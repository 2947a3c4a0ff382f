// crates/descheduler-policy-api/src/extension.rs
// ============================================================================
// Module: Extension Points
// Description: The fixed set of stages at which plugins run.
// Purpose: Name extension points uniformly across document versions.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Both document models carry one plugin set per extension point. The set is
//! closed; [`ExtensionPoint::ALL`] lists it in invocation order.

use std::fmt;

use serde::Serialize;

/// Stage of a descheduling cycle at which plugins may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtensionPoint {
    /// Orders pods before sorting.
    PreSort,
    /// Sorts eviction candidates.
    Sort,
    /// Evicts pods that violate per-pod rules.
    Deschedule,
    /// Evicts pods to rebalance the cluster.
    Balance,
    /// Filters eviction candidates.
    Filter,
    /// Filters candidates right before eviction.
    PreEvictionFilter,
}

impl ExtensionPoint {
    /// Every extension point in invocation order.
    pub const ALL: [Self; 6] = [
        Self::PreSort,
        Self::Sort,
        Self::Deschedule,
        Self::Balance,
        Self::Filter,
        Self::PreEvictionFilter,
    ];

    /// Returns the wire field name of this extension point.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreSort => "preSort",
            Self::Sort => "sort",
            Self::Deschedule => "deschedule",
            Self::Balance => "balance",
            Self::Filter => "filter",
            Self::PreEvictionFilter => "preEvictionFilter",
        }
    }
}

impl fmt::Display for ExtensionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
