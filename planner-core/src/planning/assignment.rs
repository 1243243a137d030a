// Resolving a target item's ingredients to candidate planets

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::PlanError;
use crate::outposts::OutpostRegistry;
use crate::types::{PlanetId, ResourceId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetChoice {
    pub id: PlanetId,
    pub name: String,
    pub system: String,
}

/// One row of the plan-being-built state: a required resource, how much of
/// it the recipe needs, and where the user has decided to source it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePlanetAssignment {
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub qty: u32,
    pub selected_planet_id: Option<PlanetId>,
    pub selected_planet_name: Option<String>,
    /// All planets whose resource set contains this resource, catalog order.
    pub available_planets: Vec<PlanetChoice>,
}

impl ResourcePlanetAssignment {
    /// A row with zero candidate planets can never be completed; it is kept
    /// in the list and surfaced, never silently dropped.
    pub fn is_unresolvable(&self) -> bool {
        self.available_planets.is_empty()
    }
}

/// Build one assignment row per distinct ingredient resource of an item.
/// Quantities accumulate when a recipe repeats a resource.
pub fn initialize_assignments(
    catalog: &Catalog,
    item_id: &str,
) -> Result<Vec<ResourcePlanetAssignment>, PlanError> {
    let item = catalog
        .item(item_id)
        .ok_or_else(|| PlanError::UnknownItem(item_id.to_string()))?;

    let mut assignments: Vec<ResourcePlanetAssignment> = Vec::new();
    for ingredient in &item.ingredients {
        if let Some(existing) = assignments
            .iter_mut()
            .find(|a| a.resource_id == ingredient.resource)
        {
            existing.qty += ingredient.qty;
            continue;
        }

        assignments.push(ResourcePlanetAssignment {
            resource_id: ingredient.resource.clone(),
            resource_name: catalog.resource_name(&ingredient.resource),
            qty: ingredient.qty,
            selected_planet_id: None,
            selected_planet_name: None,
            available_planets: catalog
                .planets_with_resource(&ingredient.resource)
                .into_iter()
                .map(|p| PlanetChoice {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    system: p.system.clone(),
                })
                .collect(),
        });
    }

    Ok(assignments)
}

/// Set the selection on the matching row only. Idempotent; re-assigning a
/// different planet simply overwrites the previous selection.
pub fn assign_planet(
    assignments: &mut [ResourcePlanetAssignment],
    resource_id: &str,
    planet_id: &str,
    planet_name: &str,
) -> bool {
    let Some(assignment) = assignments
        .iter_mut()
        .find(|a| a.resource_id == resource_id)
    else {
        return false;
    };
    assignment.selected_planet_id = Some(planet_id.to_string());
    assignment.selected_planet_name = Some(planet_name.to_string());
    true
}

/// Clear every selection; candidate lists are unchanged.
pub fn reset_assignments(assignments: &mut [ResourcePlanetAssignment]) {
    for assignment in assignments {
        assignment.selected_planet_id = None;
        assignment.selected_planet_name = None;
    }
}

/// True iff the set is non-empty and every row has a selection. An item with
/// zero ingredients is never complete.
pub fn is_complete(assignments: &[ResourcePlanetAssignment]) -> bool {
    !assignments.is_empty()
        && assignments
            .iter()
            .all(|a| a.selected_planet_id.is_some())
}

/// Rows that no known planet can supply.
pub fn unresolvable_resources(
    assignments: &[ResourcePlanetAssignment],
) -> Vec<&ResourcePlanetAssignment> {
    assignments
        .iter()
        .filter(|a| a.is_unresolvable())
        .collect()
}

/// Computed on read, never stored: does an outpost on the selected planet
/// already extract this row's resource?
pub fn has_existing_outpost(
    assignment: &ResourcePlanetAssignment,
    registry: &OutpostRegistry,
) -> bool {
    assignment
        .selected_planet_id
        .as_deref()
        .is_some_and(|planet| registry.covers(planet, &assignment.resource_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Ingredient, Item, Planet, Resource};

    fn catalog() -> Catalog {
        Catalog {
            resources: vec![
                Resource {
                    id: "iron".into(),
                    name: "Iron".into(),
                    rarity: "Common".into(),
                    value: 4,
                    category: String::new(),
                },
                Resource {
                    id: "neodymium".into(),
                    name: "Neodymium".into(),
                    rarity: "Rare".into(),
                    value: 18,
                    category: String::new(),
                },
                Resource {
                    id: "veryl".into(),
                    name: "Veryl".into(),
                    rarity: "Exotic".into(),
                    value: 42,
                    category: String::new(),
                },
            ],
            items: vec![
                Item {
                    id: "mag_rail".into(),
                    name: "Mag Rail".into(),
                    rarity: "Rare".into(),
                    value: 150,
                    time: 120,
                    profit: 100,
                    ingredients: vec![
                        Ingredient {
                            resource: "iron".into(),
                            qty: 2,
                        },
                        Ingredient {
                            resource: "neodymium".into(),
                            qty: 1,
                        },
                        // repeated resource entries must accumulate
                        Ingredient {
                            resource: "iron".into(),
                            qty: 3,
                        },
                    ],
                },
                Item {
                    id: "veryl_cell".into(),
                    name: "Veryl Cell".into(),
                    rarity: "Exotic".into(),
                    value: 300,
                    time: 60,
                    profit: 250,
                    ingredients: vec![Ingredient {
                        resource: "veryl".into(),
                        qty: 1,
                    }],
                },
                Item {
                    id: "empty".into(),
                    name: "Empty".into(),
                    rarity: "Common".into(),
                    value: 1,
                    time: 1,
                    profit: 0,
                    ingredients: vec![],
                },
            ],
            planets: vec![
                Planet {
                    id: "jemison".into(),
                    name: "Jemison".into(),
                    system: "Alpha Centauri".into(),
                    level: 1,
                    resources: vec!["iron".into()],
                },
                Planet {
                    id: "titan".into(),
                    name: "Titan".into(),
                    system: "Sol".into(),
                    level: 10,
                    resources: vec!["iron".into(), "neodymium".into()],
                },
            ],
            rarity_tiers: vec![],
        }
    }

    #[test]
    fn test_initialize_accumulates_repeated_resources() {
        let catalog = catalog();
        let assignments = initialize_assignments(&catalog, "mag_rail").unwrap();

        assert_eq!(assignments.len(), 2, "one row per distinct resource");
        let iron = &assignments[0];
        assert_eq!(iron.resource_id, "iron");
        assert_eq!(iron.qty, 5, "2 + 3 accumulated, not overwritten");
        assert_eq!(iron.available_planets.len(), 2);
        assert_eq!(iron.available_planets[0].id, "jemison");

        let neodymium = &assignments[1];
        assert_eq!(neodymium.qty, 1);
        assert_eq!(neodymium.available_planets.len(), 1);
    }

    #[test]
    fn test_initialize_unknown_item() {
        let catalog = catalog();
        assert_eq!(
            initialize_assignments(&catalog, "warp_drive"),
            Err(PlanError::UnknownItem("warp_drive".into()))
        );
    }

    #[test]
    fn test_unresolvable_resource_retained_with_empty_candidates() {
        let catalog = catalog();
        let assignments = initialize_assignments(&catalog, "veryl_cell").unwrap();
        assert_eq!(assignments.len(), 1);
        assert!(assignments[0].is_unresolvable());
        assert_eq!(unresolvable_resources(&assignments).len(), 1);
    }

    #[test]
    fn test_assign_is_idempotent_and_overwrites() {
        let catalog = catalog();
        let mut assignments = initialize_assignments(&catalog, "mag_rail").unwrap();

        assert!(assign_planet(&mut assignments, "iron", "jemison", "Jemison"));
        let once = assignments.clone();
        assert!(assign_planet(&mut assignments, "iron", "jemison", "Jemison"));
        assert_eq!(
            assignments[0].selected_planet_id,
            once[0].selected_planet_id
        );

        // a different planet overwrites, no history kept
        assert!(assign_planet(&mut assignments, "iron", "titan", "Titan"));
        assert_eq!(assignments[0].selected_planet_id.as_deref(), Some("titan"));

        // only the matching row is touched
        assert!(assignments[1].selected_planet_id.is_none());
        assert!(!assign_planet(&mut assignments, "veryl", "titan", "Titan"));
    }

    #[test]
    fn test_is_complete() {
        let catalog = catalog();
        let mut assignments = initialize_assignments(&catalog, "mag_rail").unwrap();
        assert!(!is_complete(&assignments));

        assign_planet(&mut assignments, "iron", "jemison", "Jemison");
        assert!(!is_complete(&assignments));

        assign_planet(&mut assignments, "neodymium", "titan", "Titan");
        assert!(is_complete(&assignments));

        // zero ingredients can never produce a finalizable plan
        let empty = initialize_assignments(&catalog, "empty").unwrap();
        assert!(empty.is_empty());
        assert!(!is_complete(&empty));
    }

    #[test]
    fn test_reset_clears_selections_keeps_candidates() {
        let catalog = catalog();
        let mut assignments = initialize_assignments(&catalog, "mag_rail").unwrap();
        assign_planet(&mut assignments, "iron", "titan", "Titan");
        assign_planet(&mut assignments, "neodymium", "titan", "Titan");

        reset_assignments(&mut assignments);
        assert!(assignments.iter().all(|a| a.selected_planet_id.is_none()));
        assert_eq!(assignments[0].available_planets.len(), 2);
    }
}
