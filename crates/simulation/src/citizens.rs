//! Citizen population and job allocation.
//!
//! Owns the total citizen count and the per-job assignment table. Jobs map
//! 1:1 onto the resource they produce; each tick the assignment table is
//! turned into `citizens.*` revenue contributions on the ledger, plus the
//! idle-foraging, food-upkeep, and happiness-impact terms. A listener on the
//! food tick shrinks the population while food runs negative, and any
//! population loss immediately demotes workers until the assignment table
//! fits the new total again.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::contribution::{ContributionMap, ContributorId};
use crate::happiness::Happiness;
use crate::resources::{ResourceKind, ResourceLedger, ResourceTicked};
use crate::simulation_sets::SimulationSet;

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

/// The fixed set of citizen jobs. `ALL` is the discovery order used to break
/// ties during demotion: among equally-staffed jobs the earliest one listed
/// here loses a worker first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Job {
    Farmer,
    Woodcutter,
    Miner,
    Blacksmith,
    Labourer,
}

impl Job {
    pub const COUNT: usize = 5;

    pub const ALL: [Job; Self::COUNT] = [
        Job::Farmer,
        Job::Woodcutter,
        Job::Miner,
        Job::Blacksmith,
        Job::Labourer,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn key(self) -> &'static str {
        match self {
            Job::Farmer => "farmer",
            Job::Woodcutter => "woodcutter",
            Job::Miner => "miner",
            Job::Blacksmith => "blacksmith",
            Job::Labourer => "labourer",
        }
    }

    /// The one resource this job produces revenue for.
    pub const fn produces(self) -> ResourceKind {
        match self {
            Job::Farmer => ResourceKind::Food,
            Job::Woodcutter => ResourceKind::Wood,
            Job::Miner => ResourceKind::Gold,
            Job::Blacksmith => ResourceKind::Iron,
            Job::Labourer => ResourceKind::Labour,
        }
    }

    /// Output per assigned citizen per tick before boosts.
    pub const fn base_rate(self) -> f64 {
        match self {
            Job::Farmer => 0.2,
            Job::Woodcutter => 0.15,
            Job::Miner => 0.1,
            Job::Blacksmith => 0.05,
            Job::Labourer => 0.1,
        }
    }
}

// ---------------------------------------------------------------------------
// Contributor ids owned by this module
// ---------------------------------------------------------------------------

/// Food revenue from idle citizens foraging.
pub const IDLE: ContributorId = ContributorId::new("citizens", "idle");
/// Food revenue (negative) from per-citizen consumption.
pub const UPKEEP: ContributorId = ContributorId::new("citizens", "upkeep");
/// Happiness impact of the population size.
pub const POPULATION: ContributorId = ContributorId::new("citizens", "population");

/// Revenue contributor id for one job's assigned workers.
pub fn job_contributor(job: Job) -> ContributorId {
    ContributorId::new("citizens", job.key())
}

// ---------------------------------------------------------------------------
// Citizens resource
// ---------------------------------------------------------------------------

fn default_rates() -> [ContributionMap; Job::COUNT] {
    std::array::from_fn(|i| ContributionMap::with_base(Job::ALL[i].base_rate()))
}

fn default_idle_rate() -> ContributionMap {
    ContributionMap::with_base(config::IDLE_FOOD_RATE)
}

fn default_food_upkeep() -> ContributionMap {
    ContributionMap::with_base(config::FOOD_UPKEEP_PER_CITIZEN)
}

fn default_happiness_upkeep() -> ContributionMap {
    ContributionMap::with_base(config::HAPPINESS_UPKEEP_PER_CITIZEN)
}

/// Population and job allocation state.
///
/// The invariant `sum(assigned) <= total` is restorable at all times: population
/// mutations go through [`Citizens::grow`] / [`Citizens::shrink`], and
/// `shrink` runs the demotion pass before returning, so no downstream
/// revenue computation ever observes an over-assigned table.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Citizens {
    total: u32,
    assigned: [u32; Job::COUNT],
    /// Revenue per assigned citizen, per job. Each is a contribution map so
    /// several independent sources can boost one job's output. Rebuilt from
    /// base rates on load; boosts are re-registered by their owners.
    #[serde(skip, default = "default_rates")]
    rates: [ContributionMap; Job::COUNT],
    #[serde(skip, default = "default_idle_rate")]
    pub idle_rate: ContributionMap,
    #[serde(skip, default = "default_food_upkeep")]
    pub food_upkeep: ContributionMap,
    #[serde(skip, default = "default_happiness_upkeep")]
    pub happiness_upkeep: ContributionMap,
}

impl Default for Citizens {
    fn default() -> Self {
        Self {
            total: 0,
            assigned: [0; Job::COUNT],
            rates: default_rates(),
            idle_rate: default_idle_rate(),
            food_upkeep: default_food_upkeep(),
            happiness_upkeep: default_happiness_upkeep(),
        }
    }
}

impl Citizens {
    pub fn population(&self) -> u32 {
        self.total
    }

    pub fn assigned(&self, job: Job) -> u32 {
        self.assigned[job.index()]
    }

    pub fn assigned_total(&self) -> u32 {
        self.assigned.iter().sum()
    }

    /// Citizens not currently assigned to any job.
    pub fn idle(&self) -> u32 {
        self.total.saturating_sub(self.assigned_total())
    }

    pub fn rate(&self, job: Job) -> &ContributionMap {
        &self.rates[job.index()]
    }

    /// Mutable access for boost owners registering their term on a job's
    /// per-citizen output.
    pub fn rate_mut(&mut self, job: Job) -> &mut ContributionMap {
        &mut self.rates[job.index()]
    }

    /// Set `job`'s assignment to `count`, clamped to
    /// `[0, current + idle]`: a job can only grow by consuming idle citizens
    /// and can always shrink toward zero. Out-of-range input is silently
    /// clamped, never an error. Sole assignment mutator under normal
    /// operation.
    pub fn assign(&mut self, job: Job, count: u32) {
        let ceiling = self.assigned[job.index()] + self.idle();
        self.assigned[job.index()] = count.min(ceiling);
    }

    /// Adjust `job`'s assignment by `by` (negative input shrinks; a result
    /// outside `u32` clamps to the nearest bound before the usual
    /// assignment clamp).
    pub fn increment(&mut self, job: Job, by: i32) {
        let target = i64::from(self.assigned[job.index()]) + i64::from(by);
        self.assign(job, u32::try_from(target.max(0)).unwrap_or(u32::MAX));
    }

    pub fn grow(&mut self, count: u32) {
        self.total += count;
    }

    /// Shrink the population and restore `sum(assigned) <= total` in the same
    /// logical step.
    pub fn shrink(&mut self, count: u32) {
        self.total = self.total.saturating_sub(count);
        self.demote_overflow();
    }

    /// While more citizens are assigned than exist, take one worker from the
    /// job with the strictly largest assignment (ties broken by `Job::ALL`
    /// order). Bounded by "every assignment is zero", not only by the
    /// required decrement count, so it terminates even if the whole table
    /// empties first.
    fn demote_overflow(&mut self) {
        loop {
            let assigned_total = self.assigned_total();
            if assigned_total <= self.total {
                return;
            }
            let mut largest = 0;
            for i in 1..Job::COUNT {
                if self.assigned[i] > self.assigned[largest] {
                    largest = i;
                }
            }
            // assigned_total > total >= 0, so the largest entry is non-zero.
            self.assigned[largest] -= 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Feed the assignment table into the ledger and the happiness aggregator.
/// Runs every tick before the ledger advance, so the totals it writes are
/// the ones this step's tick consumes.
pub fn feed_revenue(
    citizens: Res<Citizens>,
    mut ledger: ResMut<ResourceLedger>,
    mut happiness: ResMut<Happiness>,
) {
    for job in Job::ALL {
        let rate = f64::from(citizens.assigned(job)) * citizens.rate(job).total();
        ledger.set_revenue(job.produces(), job_contributor(job), rate);
    }

    let population = f64::from(citizens.population());
    ledger.set_revenue(
        ResourceKind::Food,
        IDLE,
        f64::from(citizens.idle()) * citizens.idle_rate.total(),
    );
    ledger.set_revenue(
        ResourceKind::Food,
        UPKEEP,
        population * citizens.food_upkeep.total(),
    );
    happiness.set_impact(POPULATION, population * citizens.happiness_upkeep.total());
}

/// Food-tick listener: while the food stock runs strictly negative before
/// the clamp, one citizen starves per tick. The post-clamp stock can never
/// be negative, so the check reads the pre-clamp value carried on the event.
pub fn starvation(mut ticks: EventReader<ResourceTicked>, mut citizens: ResMut<Citizens>) {
    for tick in ticks.read() {
        if tick.kind == ResourceKind::Food && tick.unclamped < 0.0 && citizens.population() > 0 {
            citizens.shrink(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct CitizensPlugin;

impl Plugin for CitizensPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Citizens>();
        app.add_systems(
            FixedUpdate,
            (
                feed_revenue.in_set(SimulationSet::Feed),
                starvation
                    .in_set(SimulationSet::Tick)
                    .after(crate::resources::tick_resources),
            ),
        );
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
