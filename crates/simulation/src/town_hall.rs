//! Town hall progression: a discrete level driving resource capacities and
//! revenues from an external level table, upgrade gating on full stocks, and
//! the citizen threshold that gates recruitment.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::contribution::ContributorId;
use crate::resources::{ResourceKind, ResourceLedger};
use crate::simulation_sets::SimulationSet;

/// The ledger contributor owned by this controller.
pub const TOWN_HALL: ContributorId = ContributorId::new("buildings", "town_hall");

/// Resources that must sit exactly at capacity before an upgrade.
pub const GATING: [ResourceKind; 2] = [ResourceKind::Food, ResourceKind::Gold];

/// The resource zeroed as the upgrade cost.
pub const SPEND: ResourceKind = ResourceKind::Gold;

// ---------------------------------------------------------------------------
// Level table
// ---------------------------------------------------------------------------

/// One level's targets. Resources absent from a mapping contribute 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelSpec {
    pub capacities: BTreeMap<ResourceKind, f64>,
    pub revenue: BTreeMap<ResourceKind, f64>,
    /// Recruitment stays eligible while the population is below this count.
    pub citizens: u32,
}

impl LevelSpec {
    fn from_rows(
        capacities: [f64; ResourceKind::COUNT],
        revenue: [f64; ResourceKind::COUNT],
        citizens: u32,
    ) -> Self {
        Self {
            capacities: ResourceKind::ALL.iter().copied().zip(capacities).collect(),
            revenue: ResourceKind::ALL.iter().copied().zip(revenue).collect(),
            citizens,
        }
    }
}

/// External read-only config: row `i` holds the targets for level `i + 1`.
/// Loading from disk is the frontend's job; the default ships a small
/// built-in table so the core runs standalone.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct LevelTable {
    pub levels: Vec<LevelSpec>,
}

impl Default for LevelTable {
    fn default() -> Self {
        // Columns follow ResourceKind::ALL: food, gold, wood, iron, labour.
        Self {
            levels: vec![
                LevelSpec::from_rows(
                    [100.0, 50.0, 80.0, 40.0, 25.0],
                    [0.2, 0.05, 0.0, 0.0, 0.02],
                    5,
                ),
                LevelSpec::from_rows(
                    [250.0, 120.0, 180.0, 90.0, 60.0],
                    [0.4, 0.1, 0.05, 0.0, 0.04],
                    10,
                ),
                LevelSpec::from_rows(
                    [600.0, 300.0, 400.0, 220.0, 140.0],
                    [0.8, 0.2, 0.1, 0.05, 0.08],
                    20,
                ),
                LevelSpec::from_rows(
                    [1500.0, 800.0, 1000.0, 550.0, 350.0],
                    [1.5, 0.4, 0.2, 0.1, 0.15],
                    40,
                ),
            ],
        }
    }
}

impl LevelTable {
    /// Targets for `level` (1-based). A level past the last defined row
    /// degrades to the last row with a warning; the table is expected to
    /// define every reachable level. Returns `None` only for an empty table.
    pub fn row(&self, level: u32) -> Option<&LevelSpec> {
        let index = level.max(1) as usize - 1;
        if index >= self.levels.len() {
            warn!(
                "level table has {} rows but level {} was requested; using the last row",
                self.levels.len(),
                level
            );
            return self.levels.last();
        }
        self.levels.get(index)
    }

    /// The citizen threshold for `level`, or 0 for an empty table.
    pub fn citizen_cap(&self, level: u32) -> u32 {
        self.row(level).map_or(0, |spec| spec.citizens)
    }
}

// ---------------------------------------------------------------------------
// Town hall
// ---------------------------------------------------------------------------

/// Progression state: a monotonically non-decreasing level, advanced only by
/// an explicit upgrade. `synced_level` tracks which row the ledger last
/// received, so the sync system re-runs on every level change including the
/// initial assignment.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct TownHall {
    level: u32,
    synced_level: Option<u32>,
}

impl Default for TownHall {
    fn default() -> Self {
        Self {
            level: 1,
            synced_level: None,
        }
    }
}

impl TownHall {
    pub fn level(&self) -> u32 {
        self.level
    }

    /// True iff every gating resource's stock equals its capacity exactly.
    /// The ledger clamp assigns the capacity total verbatim, so exact
    /// equality is the steady state of a saturated resource.
    pub fn upgradeable(&self, ledger: &ResourceLedger) -> bool {
        GATING.iter().all(|&kind| ledger.is_full(kind))
    }

    /// Advance to the next level, spending the gold stock. A silent no-op
    /// when not upgradeable; returns whether the upgrade happened.
    pub fn upgrade(&mut self, ledger: &mut ResourceLedger) -> bool {
        if !self.upgradeable(ledger) {
            return false;
        }
        ledger.set_stock(SPEND, 0.0);
        self.level += 1;
        true
    }

    /// Whether recruitment is currently allowed: the level's citizen
    /// threshold must strictly exceed the present population.
    pub fn recruit_eligible(&self, table: &LevelTable, population: u32) -> bool {
        table.citizen_cap(self.level) > population
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Push the current level's capacity and revenue targets into the ledger
/// under the `buildings.town_hall` contributor. Runs whenever the level
/// differs from the last synced one, including the very first tick.
pub fn sync_level_rates(
    mut hall: ResMut<TownHall>,
    table: Res<LevelTable>,
    mut ledger: ResMut<ResourceLedger>,
) {
    if hall.synced_level == Some(hall.level) {
        return;
    }
    let Some(spec) = table.row(hall.level) else {
        warn!("level table is empty; town hall level {} not synced", hall.level);
        return;
    };
    for kind in ResourceKind::ALL {
        let capacity = spec.capacities.get(&kind).copied().unwrap_or(0.0);
        let revenue = spec.revenue.get(&kind).copied().unwrap_or(0.0);
        ledger.set_capacity(kind, TOWN_HALL, capacity);
        ledger.set_revenue(kind, TOWN_HALL, revenue);
    }
    hall.synced_level = Some(hall.level);
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct TownHallPlugin;

impl Plugin for TownHallPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelTable>();
        app.init_resource::<TownHall>();
        app.add_systems(FixedUpdate, sync_level_rates.in_set(SimulationSet::Feed));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contribution::ContributorId;

    const TEST: ContributorId = ContributorId::new("test", "source");

    fn full_ledger() -> ResourceLedger {
        let mut ledger = ResourceLedger::default();
        for kind in GATING {
            ledger.set_capacity(kind, TEST, 10.0);
            ledger.set_stock(kind, 10.0);
        }
        ledger
    }

    #[test]
    fn test_default_table_covers_levels_in_order() {
        let table = LevelTable::default();
        assert!(!table.levels.is_empty());
        let mut last_citizens = 0;
        for (i, spec) in table.levels.iter().enumerate() {
            assert!(spec.citizens > last_citizens, "row {i} threshold must grow");
            last_citizens = spec.citizens;
        }
    }

    #[test]
    fn test_row_clamps_past_the_end() {
        let table = LevelTable::default();
        let last = table.levels.len() as u32;
        let overflow = table.row(last + 10).expect("non-empty table");
        assert_eq!(overflow.citizens, table.citizen_cap(last));
    }

    #[test]
    fn test_empty_table_has_no_rows() {
        let table = LevelTable { levels: Vec::new() };
        assert!(table.row(1).is_none());
        assert_eq!(table.citizen_cap(1), 0);
    }

    #[test]
    fn test_upgrade_requires_all_gating_resources_full() {
        let mut hall = TownHall::default();
        let mut ledger = full_ledger();
        ledger.set_stock(ResourceKind::Food, 9.5);

        assert!(!hall.upgradeable(&ledger));
        assert!(!hall.upgrade(&mut ledger));
        assert_eq!(hall.level(), 1);
        // The failed attempt must not spend anything.
        assert_eq!(ledger.stock(SPEND), 10.0);
    }

    #[test]
    fn test_upgrade_spends_gold_and_bumps_level_once() {
        let mut hall = TownHall::default();
        let mut ledger = full_ledger();

        assert!(hall.upgrade(&mut ledger));
        assert_eq!(hall.level(), 2);
        assert_eq!(ledger.stock(SPEND), 0.0);

        // Gold is empty now, so a second upgrade is gated again.
        assert!(!hall.upgrade(&mut ledger));
        assert_eq!(hall.level(), 2);
    }

    #[test]
    fn test_recruit_eligibility_threshold_is_strict() {
        let hall = TownHall::default();
        let table = LevelTable::default();
        let threshold = table.citizen_cap(1);
        assert!(hall.recruit_eligible(&table, threshold - 1));
        assert!(!hall.recruit_eligible(&table, threshold));
        assert!(!hall.recruit_eligible(&table, threshold + 1));
    }
}
