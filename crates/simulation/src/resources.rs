//! Resource ledger: per-resource stock, capacity ceiling, and revenue rate.
//!
//! Capacity and revenue are each a [`ContributionMap`] assembled from named
//! contributors (the town hall, each citizen job, idle foraging, upkeep), so
//! every additive term stays traceable to its owner and is idempotently
//! replaceable. The tick system advances every stock once per `FixedUpdate`
//! and clamps it into `[0, capacity]`; because clamping is centralized here,
//! downstream systems can treat "at capacity" and "depleted" as stable
//! derived booleans.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::contribution::{ContributionMap, ContributorId};
use crate::simulation_sets::SimulationSet;

// ---------------------------------------------------------------------------
// Resource kinds
// ---------------------------------------------------------------------------

/// The fixed set of tracked resource types.
///
/// `ALL` is the per-tick processing order. Food goes first: citizen
/// starvation depends on the food tick outcome, and every other resource is
/// order-independent within one step.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Food,
    Gold,
    Wood,
    Iron,
    Labour,
}

impl ResourceKind {
    pub const COUNT: usize = 5;

    pub const ALL: [ResourceKind; Self::COUNT] = [
        ResourceKind::Food,
        ResourceKind::Gold,
        ResourceKind::Wood,
        ResourceKind::Iron,
        ResourceKind::Labour,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn key(self) -> &'static str {
        match self {
            ResourceKind::Food => "food",
            ResourceKind::Gold => "gold",
            ResourceKind::Wood => "wood",
            ResourceKind::Iron => "iron",
            ResourceKind::Labour => "labour",
        }
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// One tracked resource: current stock plus the capacity and revenue
/// aggregates it is advanced against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceAccount {
    pub stock: f64,
    /// Capacity ceiling = sum of named capacity contributions.
    /// Rebuilt by its owners (level sync) rather than persisted.
    #[serde(skip)]
    pub capacity: ContributionMap,
    /// Net rate per tick = sum of named revenue contributions; may be
    /// negative. Re-set every tick by its owners, so not persisted either.
    #[serde(skip)]
    pub revenue: ContributionMap,
}

/// Outcome of one resource's tick, delivered to listeners after the clamp.
///
/// This is the tick-listener registration hook: a listener is a system with
/// an `EventReader<ResourceTicked>` ordered `.after(tick_resources)`, so it
/// runs synchronously within the same simulation step, after the stock
/// update, in system-registration order.
#[derive(Event, Debug, Clone, Copy)]
pub struct ResourceTicked {
    pub kind: ResourceKind,
    /// Stock after revenue was applied but before the clamp. The only place
    /// a negative reading is observable; the starvation check uses it.
    pub unclamped: f64,
    /// Stock after the clamp, guaranteed in `[0, capacity]`.
    pub stock: f64,
}

/// Process-lifetime ledger holding one account per [`ResourceKind`].
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLedger {
    accounts: [ResourceAccount; ResourceKind::COUNT],
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self {
            accounts: std::array::from_fn(|_| ResourceAccount {
                stock: 0.0,
                capacity: ContributionMap::with_base(0.0),
                revenue: ContributionMap::with_base(0.0),
            }),
        }
    }
}

impl ResourceLedger {
    /// Upsert `contributor`'s term of `kind`'s capacity ceiling.
    pub fn set_capacity(&mut self, kind: ResourceKind, contributor: ContributorId, value: f64) {
        self.accounts[kind.index()].capacity.set(contributor, value);
    }

    /// Upsert `contributor`'s term of `kind`'s per-tick revenue rate.
    pub fn set_revenue(&mut self, kind: ResourceKind, contributor: ContributorId, value: f64) {
        self.accounts[kind.index()].revenue.set(contributor, value);
    }

    pub fn stock(&self, kind: ResourceKind) -> f64 {
        self.accounts[kind.index()].stock
    }

    /// Direct stock write for external spenders (e.g. the upgrade cost).
    pub fn set_stock(&mut self, kind: ResourceKind, value: f64) {
        self.accounts[kind.index()].stock = value;
    }

    /// Deduct `amount` from `kind`'s stock. The result may go negative; the
    /// next tick clamps it back into range.
    pub fn spend(&mut self, kind: ResourceKind, amount: f64) {
        self.accounts[kind.index()].stock -= amount;
    }

    /// One contributor's current capacity term (0.0 if never set). Keeps
    /// ownership of each additive term inspectable.
    pub fn capacity_contribution(&self, kind: ResourceKind, contributor: ContributorId) -> f64 {
        self.accounts[kind.index()].capacity.get(contributor)
    }

    /// One contributor's current revenue term (0.0 if never set).
    pub fn revenue_contribution(&self, kind: ResourceKind, contributor: ContributorId) -> f64 {
        self.accounts[kind.index()].revenue.get(contributor)
    }

    pub fn capacity_total(&self, kind: ResourceKind) -> f64 {
        self.accounts[kind.index()].capacity.total()
    }

    pub fn revenue_total(&self, kind: ResourceKind) -> f64 {
        self.accounts[kind.index()].revenue.total()
    }

    /// Whether `kind`'s stock sits exactly at its capacity ceiling. The tick
    /// clamp assigns the capacity total verbatim when revenue overshoots, so
    /// float equality is well-defined here.
    pub fn is_full(&self, kind: ResourceKind) -> bool {
        let account = &self.accounts[kind.index()];
        account.stock == account.capacity.total()
    }

    /// Advance one resource by one tick: apply revenue, clamp, report.
    pub fn advance(&mut self, kind: ResourceKind) -> ResourceTicked {
        let account = &mut self.accounts[kind.index()];
        let unclamped = account.stock + account.revenue.total();
        let ceiling = account.capacity.total().max(0.0);
        account.stock = unclamped.clamp(0.0, ceiling);
        ResourceTicked {
            kind,
            unclamped,
            stock: account.stock,
        }
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Advance every resource by one tick, in `ResourceKind::ALL` order, and
/// publish the per-resource outcomes for listeners.
pub fn tick_resources(mut ledger: ResMut<ResourceLedger>, mut ticked: EventWriter<ResourceTicked>) {
    for kind in ResourceKind::ALL {
        ticked.send(ledger.advance(kind));
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct ResourceLedgerPlugin;

impl Plugin for ResourceLedgerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ResourceLedger>();
        app.add_event::<ResourceTicked>();
        app.add_systems(
            FixedUpdate,
            tick_resources.in_set(SimulationSet::Tick),
        );
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
