//! Additive aggregation of named contributions.
//!
//! Many independent systems feed the same derived number: a resource's net
//! revenue per tick, its capacity ceiling, the recruitment period multiplier,
//! the happiness total. Each owner registers its term under a stable
//! [`ContributorId`] and re-sets it whenever its inputs change; the map keeps
//! a running total so dependent systems always read a sum that is consistent
//! with the latest `set` per contributor.

use std::collections::HashMap;
use std::fmt;

/// Hierarchical identifier for a single additive term: a namespace (the
/// owning system) plus a leaf (the specific source), e.g. `citizens.farmer`
/// or `buildings.town_hall`.
///
/// Ids are built from `&'static str` pairs so every contributor key in the
/// codebase is a visible constant rather than a free-form runtime string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContributorId {
    pub group: &'static str,
    pub name: &'static str,
}

impl ContributorId {
    pub const fn new(group: &'static str, name: &'static str) -> Self {
        Self { group, name }
    }

    /// The seed entry every map is created with.
    pub const BASE: ContributorId = ContributorId::new("base", "value");
}

impl fmt::Display for ContributorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}

/// A set of named additive terms with a cached total.
///
/// `set` replaces, never accumulates: calling it twice with the same id and
/// value leaves the total unchanged. The total is updated inside `set`
/// itself, so any read that happens after the write in the same logical step
/// already sees the new sum. Entries are never removed; a stale contributor
/// simply re-sets its term (typically every tick) or leaves a zero behind.
#[derive(Debug, Clone, Default)]
pub struct ContributionMap {
    entries: HashMap<ContributorId, f64>,
    total: f64,
}

impl ContributionMap {
    /// Create a map seeded with a single `base.value` entry.
    pub fn with_base(value: f64) -> Self {
        let mut map = Self::default();
        map.set(ContributorId::BASE, value);
        map
    }

    /// Upsert the contribution for `id`. Any finite value is accepted,
    /// including zero and negatives.
    ///
    /// The cached total is recomputed from the entries rather than adjusted
    /// incrementally: an add-then-subtract running sum drifts under
    /// floating-point cancellation, and maps stay small enough that the full
    /// sum is effectively free.
    pub fn set(&mut self, id: ContributorId, value: f64) {
        self.entries.insert(id, value);
        self.total = self.entries.values().sum();
    }

    /// Sum of the latest value per distinct contributor.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Latest value for `id`, or 0.0 if it never contributed.
    pub fn get(&self, id: ContributorId) -> f64 {
        self.entries.get(&id).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
