//! Read-only snapshot of the town for external consumers (UI, advisors).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::citizens::Citizens;
use crate::happiness::Happiness;
use crate::resources::{ResourceKind, ResourceLedger};
use crate::simulation_sets::SimulationSet;
use crate::town_hall::TownHall;

#[derive(Resource, Default, Debug, Clone, Serialize, Deserialize)]
pub struct TownStats {
    pub population: u32,
    pub idle: u32,
    pub happiness: f64,
    pub level: u32,
    pub food: f64,
    pub gold: f64,
}

pub fn update_stats(
    citizens: Res<Citizens>,
    happiness: Res<Happiness>,
    hall: Res<TownHall>,
    ledger: Res<ResourceLedger>,
    mut stats: ResMut<TownStats>,
) {
    stats.population = citizens.population();
    stats.idle = citizens.idle();
    stats.happiness = happiness.value();
    stats.level = hall.level();
    stats.food = ledger.stock(ResourceKind::Food);
    stats.gold = ledger.stock(ResourceKind::Gold);
}

pub struct StatsPlugin;

impl Plugin for StatsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TownStats>();
        app.add_systems(
            FixedUpdate,
            update_stats
                .in_set(SimulationSet::React)
                .after(crate::recruitment::tick_recruitment),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = TownStats::default();
        assert_eq!(stats.population, 0);
        assert_eq!(stats.level, 0);
        assert_eq!(stats.food, 0.0);
    }
}
