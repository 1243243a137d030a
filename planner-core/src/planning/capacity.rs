// Outpost-capacity accounting across draft assignments and saved plans
//
// Capacity is a shared, mutable, global resource. Every function here takes
// the live registry and plan collections as arguments and recomputes from
// scratch; nothing is cached on individual plans.

use std::collections::HashSet;

use crate::outposts::OutpostRegistry;
use crate::planning::assignment::ResourcePlanetAssignment;
use crate::planning::plan::ManufacturePlan;

pub const BASE_OUTPOST_CAP: u32 = 8;
pub const CAP_PER_HABITATION_LEVEL: u32 = 4;
pub const MAX_HABITATION_LEVEL: u8 = 4;

/// Outpost cap derived from the Planetary Habitation skill level,
/// clamped to [0, 4]: cap = 8 + 4 × level, so cap ∈ [8, 24].
pub fn habitation_cap(level: u8) -> u32 {
    BASE_OUTPOST_CAP + CAP_PER_HABITATION_LEVEL * u32::from(level.min(MAX_HABITATION_LEVEL))
}

/// How many NEW outposts a candidate assignment set would require: the
/// number of distinct planet ids among the selected planets whose specific
/// resource is not already covered by an outpost.
///
/// Granularity is per planet, not per (planet, resource) pair: two uncovered
/// resources sourced from one planet count once. `committed_outposts` uses
/// the identical rule.
pub fn outposts_required(
    assignments: &[ResourcePlanetAssignment],
    registry: &OutpostRegistry,
) -> usize {
    let mut planets_needing: HashSet<&str> = HashSet::new();
    for assignment in assignments {
        let Some(planet_id) = assignment.selected_planet_id.as_deref() else {
            continue;
        };
        if !registry.covers(planet_id, &assignment.resource_id) {
            planets_needing.insert(planet_id);
        }
    }
    planets_needing.len()
}

/// Outposts committed by all saved plans but not yet built: the union,
/// across every step of every plan, of planet ids where at least one of the
/// step's required resources lacks a covering outpost. De-duplicated across
/// all plans, so a planet three plans need counts once.
pub fn committed_outposts(plans: &[ManufacturePlan], registry: &OutpostRegistry) -> usize {
    let mut committed: HashSet<&str> = HashSet::new();
    for plan in plans {
        for step in &plan.steps {
            let uncovered = step
                .required_resources
                .iter()
                .any(|r| !registry.covers(&step.planet_id, &r.resource_id));
            if uncovered {
                committed.insert(&step.planet_id);
            }
        }
    }
    committed.len()
}

/// Slots left under the cap. May go negative when the user is over-committed;
/// callers display the deficit rather than clamping it away.
pub fn remaining_capacity(cap: u32, registry: &OutpostRegistry, committed: usize) -> i64 {
    i64::from(cap) - (registry.len() + committed) as i64
}

pub fn can_finalize(candidate_required: usize, remaining: i64) -> bool {
    candidate_required as i64 <= remaining
}

/// True iff every step's every required resource has a covering outpost on
/// that step's planet. A plan with zero steps is never fully built.
pub fn is_plan_fully_built(plan: &ManufacturePlan, registry: &OutpostRegistry) -> bool {
    if plan.steps.is_empty() {
        return false;
    }
    plan.steps.iter().all(|step| {
        step.required_resources
            .iter()
            .all(|r| registry.covers(&step.planet_id, &r.resource_id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_habitation_cap_clamps_level() {
        assert_eq!(habitation_cap(0), 8);
        assert_eq!(habitation_cap(2), 16);
        assert_eq!(habitation_cap(4), 24);
        // levels past the skill maximum do not extend the cap
        assert_eq!(habitation_cap(9), 24);
    }

    #[test]
    fn test_remaining_capacity_can_go_negative() {
        let registry = OutpostRegistry::new();
        assert_eq!(remaining_capacity(8, &registry, 10), -2);
        assert!(!can_finalize(1, -2));
        assert!(can_finalize(0, 0));
    }
}
