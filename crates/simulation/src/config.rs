/// Length of one simulated tick in milliseconds. One `FixedUpdate` run
/// advances the whole economy by exactly this much.
pub const TICK_MS: f64 = 100.0;

/// Base recruitment interval before the happiness scaling is applied.
pub const BASE_RECRUIT_INTERVAL_MS: f64 = 60_000.0;

/// Seed value of the happiness aggregator before any impact is registered.
pub const BASE_HAPPINESS: f64 = 100.0;

/// Food produced per idle citizen per tick (foraging).
pub const IDLE_FOOD_RATE: f64 = 0.01;

/// Food consumed per citizen per tick, independent of job or idleness.
pub const FOOD_UPKEEP_PER_CITIZEN: f64 = -0.05;

/// Happiness cost per citizen (crowding upkeep).
pub const HAPPINESS_UPKEEP_PER_CITIZEN: f64 = -1.0;
