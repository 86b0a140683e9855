//! # TestTown - headless integration test harness
//!
//! A fluent builder wrapping `bevy::app::App` + `SimulationPlugin` so
//! scenario tests can set up town state, advance the simulation tick by
//! tick, and assert on the resulting resources without a window or renderer.

use bevy::app::App;
use bevy::prelude::*;

use crate::citizens::{Citizens, Job};
use crate::contribution::ContributorId;
use crate::happiness::Happiness;
use crate::recruitment::Recruitment;
use crate::resources::{ResourceKind, ResourceLedger};
use crate::stats::TownStats;
use crate::town_hall::{LevelTable, TownHall};
use crate::SimulationPlugin;

pub struct TestTown {
    app: App,
}

impl TestTown {
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SimulationPlugin);
        // Run Startup once; FixedUpdate does not fire here (zero delta), so
        // builder methods below still act on a pre-first-tick world.
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    /// Replace the level table before the first tick syncs it.
    pub fn with_level_table(mut self, table: LevelTable) -> Self {
        self.app.insert_resource(table);
        self
    }

    pub fn with_population(mut self, count: u32) -> Self {
        self.app
            .world_mut()
            .resource_mut::<Citizens>()
            .grow(count);
        self
    }

    pub fn with_assigned(mut self, job: Job, count: u32) -> Self {
        self.app
            .world_mut()
            .resource_mut::<Citizens>()
            .assign(job, count);
        self
    }

    pub fn with_stock(mut self, kind: ResourceKind, value: f64) -> Self {
        self.app
            .world_mut()
            .resource_mut::<ResourceLedger>()
            .set_stock(kind, value);
        self
    }

    /// Override the happiness base seed.
    pub fn with_base_happiness(mut self, value: f64) -> Self {
        self.app
            .world_mut()
            .resource_mut::<Happiness>()
            .set_impact(ContributorId::BASE, value);
        self
    }

    // -----------------------------------------------------------------------
    // Driving and querying
    // -----------------------------------------------------------------------

    /// Advance the simulation by `n` ticks.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn stock(&self, kind: ResourceKind) -> f64 {
        self.app.world().resource::<ResourceLedger>().stock(kind)
    }

    pub fn capacity(&self, kind: ResourceKind) -> f64 {
        self.app
            .world()
            .resource::<ResourceLedger>()
            .capacity_total(kind)
    }

    pub fn population(&self) -> u32 {
        self.app.world().resource::<Citizens>().population()
    }

    pub fn assigned(&self, job: Job) -> u32 {
        self.app.world().resource::<Citizens>().assigned(job)
    }

    pub fn happiness(&self) -> f64 {
        self.app.world().resource::<Happiness>().value()
    }

    pub fn level(&self) -> u32 {
        self.app.world().resource::<TownHall>().level()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.app.world().resource::<Recruitment>().elapsed_ms
    }

    pub fn stats(&self) -> TownStats {
        self.app.world().resource::<TownStats>().clone()
    }
}
