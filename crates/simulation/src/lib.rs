//! Headless economy core for an incremental town-management game.
//!
//! Three coupled subsystems drive the simulation: a multi-source resource
//! ledger (stocks, capacity ceilings, and revenue rates assembled from named
//! contributions), a citizen/job allocation system with automatic demotion
//! when the population shrinks, and a town-hall progression controller whose
//! happiness-driven timer recruits new citizens. Everything advances through
//! a fixed 100 ms `FixedUpdate` tick; see [`simulation_sets`] for the
//! ordering contract within one step.

use std::time::Duration;

use bevy::prelude::*;

pub mod citizens;
pub mod config;
pub mod contribution;
pub mod happiness;
pub mod recruitment;
pub mod resources;
pub mod simulation_sets;
pub mod stats;
pub mod town_hall;

#[cfg(test)]
mod test_harness;

use simulation_sets::SimulationSet;

/// Global tick counter incremented once per `FixedUpdate`.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

pub fn advance_tick_counter(mut tick: ResMut<TickCounter>) {
    tick.0 = tick.0.wrapping_add(1);
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // One FixedUpdate = one 100 ms simulated tick.
        app.insert_resource(Time::<Fixed>::from_duration(Duration::from_millis(
            config::TICK_MS as u64,
        )));

        app.init_resource::<TickCounter>();
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Feed,
                SimulationSet::Tick,
                SimulationSet::React,
            )
                .chain(),
        );
        app.add_systems(
            FixedUpdate,
            advance_tick_counter.in_set(SimulationSet::Feed),
        );

        app.add_plugins((
            happiness::HappinessPlugin,
            resources::ResourceLedgerPlugin,
            citizens::CitizensPlugin,
            town_hall::TownHallPlugin,
            recruitment::RecruitmentPlugin,
            stats::StatsPlugin,
        ));
    }
}
