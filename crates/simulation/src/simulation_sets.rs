//! Deterministic ordering for the economy tick via `SystemSet` phases.
//!
//! One `FixedUpdate` run is one logical simulation step. The phases are
//! chained so every derived aggregate is consistent with its inputs before
//! any dependent system reads it within the same step:
//!
//! ```text
//! Feed  →  Tick  →  React
//! ```
//!
//! * **Feed** – contribution writers: town-hall level sync, citizen job
//!   revenue, idle/upkeep terms, the population happiness impact. After this
//!   phase every `ContributionMap` total the ledger reads is up to date.
//! * **Tick** – the resource ledger advance (stock + revenue, clamp) followed
//!   by its listeners (`ResourceTicked` readers such as starvation), ordered
//!   `.after(tick_resources)` within the phase.
//! * **React** – time-gated reactions to the tick outcome: the recruitment
//!   timer and the stats snapshot. These read post-starvation population and
//!   the live happiness value.
//!
//! All state is mutated by this single chained sequence; there is no
//! parallel mutation of shared resources.

use bevy::prelude::*;

/// Ordered phases for systems running in the `FixedUpdate` schedule.
///
/// Configured as a chain: `Feed` → `Tick` → `React`. Plugins use
/// `.in_set(SimulationSet::X)` when registering systems, plus fine-grained
/// `.after()` constraints within a phase where ordering matters.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Contribution feeds: level-table sync, job revenue, upkeep, happiness.
    Feed,
    /// Ledger advance and its tick listeners.
    Tick,
    /// Reactions: recruitment timer, stats.
    React,
}
