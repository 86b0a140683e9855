//! Variable-period recruitment timer.
//!
//! While the town hall's citizen threshold exceeds the population, simulated
//! time accumulates in fixed tick-sized steps; once the accumulated time
//! reaches the current period, one citizen is recruited and the accumulator
//! resets. The period is a function of happiness and an external multiplier
//! and is re-read at every check rather than captured, so a happiness swing
//! mid-period takes effect immediately (no hysteresis). Eligibility toggling
//! in either direction stops the timer and zeroes the accumulator, so a
//! stale partial period never leaks into a later eligible phase.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::citizens::Citizens;
use crate::config;
use crate::contribution::ContributionMap;
use crate::happiness::Happiness;
use crate::simulation_sets::SimulationSet;
use crate::town_hall::{LevelTable, TownHall};

/// Recruitment period in milliseconds for a given happiness value and
/// external multiplier.
///
/// The base interval is scaled by `(190 - happiness) / 100`, truncated down
/// to a whole second, then multiplied. The result is floored to one tick:
/// happiness beyond 190 or a non-positive multiplier would otherwise drive
/// the period to zero or below and recruit without bound.
pub fn period_ms(happiness: f64, multiplier: f64) -> f64 {
    let scaled = config::BASE_RECRUIT_INTERVAL_MS * (190.0 - happiness) / 100.0;
    let whole_seconds = (scaled / 1000.0).floor() * 1000.0;
    (whole_seconds * multiplier).max(config::TICK_MS)
}

/// Timer state. `elapsed_ms` only advances while `active`, and both reset
/// together on any eligibility toggle.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Recruitment {
    pub elapsed_ms: f64,
    pub active: bool,
    /// External period multiplier (events, decorations, …), seeded at 1.
    #[serde(skip, default = "default_multiplier")]
    pub multiplier: ContributionMap,
}

fn default_multiplier() -> ContributionMap {
    ContributionMap::with_base(1.0)
}

impl Default for Recruitment {
    fn default() -> Self {
        Self {
            elapsed_ms: 0.0,
            active: false,
            multiplier: default_multiplier(),
        }
    }
}

/// Advance the recruitment timer by one tick.
pub fn tick_recruitment(
    table: Res<LevelTable>,
    hall: Res<TownHall>,
    happiness: Res<Happiness>,
    mut recruitment: ResMut<Recruitment>,
    mut citizens: ResMut<Citizens>,
) {
    let eligible = hall.recruit_eligible(&table, citizens.population());
    if eligible != recruitment.active {
        // Stop or (re)start; either way the partial period is discarded.
        recruitment.active = eligible;
        recruitment.elapsed_ms = 0.0;
    }
    if !recruitment.active {
        return;
    }

    recruitment.elapsed_ms += config::TICK_MS;
    let period = period_ms(happiness.value(), recruitment.multiplier.total());
    if recruitment.elapsed_ms >= period {
        citizens.grow(1);
        recruitment.elapsed_ms = 0.0;
    }
}

pub struct RecruitmentPlugin;

impl Plugin for RecruitmentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Recruitment>();
        app.add_systems(FixedUpdate, tick_recruitment.in_set(SimulationSet::React));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_at_happiness_90_is_one_minute() {
        assert_eq!(period_ms(90.0, 1.0), 60_000.0);
    }

    #[test]
    fn test_period_truncates_to_whole_seconds() {
        // 60000 x (190 - 93.4) / 100 = 57960, truncated to 57000.
        assert_eq!(period_ms(93.4, 1.0), 57_000.0);
    }

    #[test]
    fn test_multiplier_applies_after_truncation() {
        assert_eq!(period_ms(90.0, 0.5), 30_000.0);
        assert_eq!(period_ms(93.4, 0.5), 28_500.0);
    }

    #[test]
    fn test_period_floored_to_one_tick() {
        // Happiness past 190 would give a negative period.
        assert_eq!(period_ms(250.0, 1.0), config::TICK_MS);
        // A zero multiplier would give a zero period.
        assert_eq!(period_ms(90.0, 0.0), config::TICK_MS);
        // Sub-second positive periods truncate to zero, then floor.
        assert_eq!(period_ms(189.5, 1.0), config::TICK_MS);
    }

    #[test]
    fn test_low_happiness_slows_recruitment() {
        assert!(period_ms(10.0, 1.0) > period_ms(90.0, 1.0));
        assert_eq!(period_ms(10.0, 1.0), 108_000.0);
    }
}
