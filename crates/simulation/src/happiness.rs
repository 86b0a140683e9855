//! Consumed surface of the happiness aggregator.
//!
//! The full aggregation model (services, events, decorations, …) lives
//! outside this core; the economy only writes named impacts into it and
//! reads back one scalar, which drives the recruitment period. This resource
//! is that contract: a contribution map seeded at the base happiness value.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::contribution::{ContributionMap, ContributorId};

fn default_impacts() -> ContributionMap {
    ContributionMap::with_base(config::BASE_HAPPINESS)
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Happiness {
    #[serde(skip, default = "default_impacts")]
    impacts: ContributionMap,
}

impl Default for Happiness {
    fn default() -> Self {
        Self {
            impacts: default_impacts(),
        }
    }
}

impl Happiness {
    /// Register or replace one source's happiness impact.
    pub fn set_impact(&mut self, id: ContributorId, value: f64) {
        self.impacts.set(id, value);
    }

    /// The single derived happiness value consumers read.
    pub fn value(&self) -> f64 {
        self.impacts.total()
    }
}

pub struct HappinessPlugin;

impl Plugin for HappinessPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Happiness>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_base() {
        assert_eq!(Happiness::default().value(), config::BASE_HAPPINESS);
    }

    #[test]
    fn test_impacts_are_additive_and_replaceable() {
        let mut happiness = Happiness::default();
        let crowding = ContributorId::new("citizens", "population");
        happiness.set_impact(crowding, -10.0);
        assert_eq!(happiness.value(), config::BASE_HAPPINESS - 10.0);
        happiness.set_impact(crowding, -4.0);
        assert_eq!(happiness.value(), config::BASE_HAPPINESS - 4.0);
    }
}
