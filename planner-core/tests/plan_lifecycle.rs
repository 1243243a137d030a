// Resolver and store lifecycle: initialize, assign, save, reload, persist

use std::collections::BTreeMap;

use planner_core::{
    assign_planet, habitation_cap, initialize_assignments, is_complete, plans_from_json,
    plans_to_json, unresolvable_resources, Catalog, Ingredient, Item, OutpostRegistry, Planet,
    PlanDraft, PlanError, PlanStore, Resource, ResourcePlanetAssignment,
};

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
                id: "nickel".into(),
                name: "Nickel".into(),
                rarity: "Common".into(),
                value: 6,
                category: String::new(),
            },
            Resource {
                id: "cobalt".into(),
                name: "Cobalt".into(),
                rarity: "Uncommon".into(),
                value: 12,
                category: String::new(),
            },
            Resource {
                id: "veryl".into(),
                name: "Veryl".into(),
                rarity: "Exotic".into(),
                value: 40,
                category: String::new(),
            },
        ],
        items: vec![
            Item {
                id: "adaptive_frame".into(),
                name: "Adaptive Frame".into(),
                rarity: "Common".into(),
                value: 68,
                time: 60,
                profit: 54,
                ingredients: vec![
                    Ingredient {
                        resource: "iron".into(),
                        qty: 2,
                    },
                    Ingredient {
                        resource: "nickel".into(),
                        qty: 1,
                    },
                    Ingredient {
                        resource: "cobalt".into(),
                        qty: 1,
                    },
                    // repeated entry, must accumulate into the iron row
                    Ingredient {
                        resource: "iron".into(),
                        qty: 1,
                    },
                ],
            },
            Item {
                id: "veryl_engine".into(),
                name: "Veryl Engine".into(),
                rarity: "Exotic".into(),
                value: 900,
                time: 300,
                profit: 700,
                ingredients: vec![
                    Ingredient {
                        resource: "veryl".into(),
                        qty: 4,
                    },
                    Ingredient {
                        resource: "iron".into(),
                        qty: 2,
                    },
                ],
            },
        ],
        planets: vec![
            Planet {
                id: "vectera".into(),
                name: "Vectera".into(),
                system: "Narion".into(),
                level: 5,
                resources: vec!["iron".into(), "nickel".into()],
            },
            Planet {
                id: "bessel3b".into(),
                name: "Bessel III-b".into(),
                system: "Bessel".into(),
                level: 10,
                resources: vec!["cobalt".into(), "iron".into()],
            },
        ],
        rarity_tiers: vec![],
    }
}

fn assigned_draft(catalog: &Catalog) -> PlanDraft {
    let mut assignments = initialize_assignments(catalog, "adaptive_frame").unwrap();
    assign_planet(&mut assignments, "iron", "vectera", "Vectera");
    assign_planet(&mut assignments, "nickel", "vectera", "Vectera");
    assign_planet(&mut assignments, "cobalt", "bessel3b", "Bessel III-b");
    PlanDraft {
        plan_id: None,
        name: "Frame Line".into(),
        target_item_id: "adaptive_frame".into(),
        output_selector: None,
        dependencies: vec![],
        assignments,
    }
}

/// (resource, planet, qty) triples, order-independent.
fn triples(assignments: &[ResourcePlanetAssignment]) -> BTreeMap<String, (Option<String>, u32)> {
    assignments
        .iter()
        .map(|a| {
            (
                a.resource_id.clone(),
                (a.selected_planet_id.clone(), a.qty),
            )
        })
        .collect()
}

#[test]
fn initialize_returns_one_row_per_distinct_resource() {
    let catalog = catalog();
    let assignments = initialize_assignments(&catalog, "adaptive_frame").unwrap();

    assert_eq!(assignments.len(), 3);
    let iron = assignments
        .iter()
        .find(|a| a.resource_id == "iron")
        .unwrap();
    assert_eq!(iron.qty, 3, "2 + 1 across the repeated ingredient entries");
    assert_eq!(iron.available_planets.len(), 2);
    assert!(!is_complete(&assignments));
}

#[test]
fn assign_twice_equals_assign_once() {
    let catalog = catalog();
    let mut once = initialize_assignments(&catalog, "adaptive_frame").unwrap();
    assign_planet(&mut once, "iron", "vectera", "Vectera");

    let mut twice = initialize_assignments(&catalog, "adaptive_frame").unwrap();
    assign_planet(&mut twice, "iron", "vectera", "Vectera");
    assign_planet(&mut twice, "iron", "vectera", "Vectera");

    assert_eq!(triples(&once), triples(&twice));
}

#[test]
fn save_then_load_round_trips_the_assignment_triples() {
    let catalog = catalog();
    let registry = OutpostRegistry::new();
    let mut store = PlanStore::new();

    let draft = assigned_draft(&catalog);
    let original = triples(&draft.assignments);

    let plan_id = store
        .save(&draft, &catalog, &registry, habitation_cap(0), "1/1/2024")
        .unwrap();
    let reloaded = store.load(plan_id, &catalog).unwrap();

    assert_eq!(triples(&reloaded), original);
    // candidate lists come back from the catalog, not the stored steps
    let iron = reloaded.iter().find(|a| a.resource_id == "iron").unwrap();
    assert_eq!(iron.available_planets.len(), 2);
}

#[test]
fn unresolvable_ingredient_blocks_finalize_with_named_resource() {
    let catalog = catalog();
    let registry = OutpostRegistry::new();
    let mut store = PlanStore::new();

    let mut assignments = initialize_assignments(&catalog, "veryl_engine").unwrap();
    let veryl = assignments
        .iter()
        .find(|a| a.resource_id == "veryl")
        .unwrap();
    assert!(veryl.available_planets.is_empty(), "no planet yields veryl");
    assert_eq!(unresolvable_resources(&assignments).len(), 1);

    // even with the other row assigned the plan can never complete
    assign_planet(&mut assignments, "iron", "vectera", "Vectera");
    assert!(!is_complete(&assignments));

    let draft = PlanDraft {
        plan_id: None,
        name: String::new(),
        target_item_id: "veryl_engine".into(),
        output_selector: None,
        dependencies: vec![],
        assignments,
    };
    let err = store
        .save(&draft, &catalog, &registry, habitation_cap(0), "1/1/2024")
        .unwrap_err();
    assert_eq!(
        err,
        PlanError::UnresolvableResource {
            resource_id: "veryl".into(),
            resource_name: "Veryl".into(),
        }
    );
}

#[test]
fn incomplete_assignment_rejected_without_partial_save() {
    let catalog = catalog();
    let registry = OutpostRegistry::new();
    let mut store = PlanStore::new();

    let mut draft = assigned_draft(&catalog);
    draft.assignments[2].selected_planet_id = None;
    draft.assignments[2].selected_planet_name = None;

    let err = store
        .save(&draft, &catalog, &registry, habitation_cap(0), "1/1/2024")
        .unwrap_err();
    assert_eq!(err, PlanError::IncompleteAssignment);
    assert!(store.plans().is_empty());
}

#[test]
fn deleting_a_plan_releases_its_commitment() {
    let catalog = catalog();
    let registry = OutpostRegistry::new();
    let mut store = PlanStore::new();

    let plan_id = store
        .save(
            &assigned_draft(&catalog),
            &catalog,
            &registry,
            habitation_cap(0),
            "1/1/2024",
        )
        .unwrap();
    assert_eq!(planner_core::committed_outposts(store.plans(), &registry), 2);

    store.delete(plan_id).unwrap();
    assert_eq!(planner_core::committed_outposts(store.plans(), &registry), 0);
    assert_eq!(
        store.delete(plan_id),
        Err(PlanError::UnknownPlan(plan_id)),
        "double delete reports the missing plan"
    );
}

#[test]
fn persisted_plans_survive_reload_and_keep_ids_unique() {
    let catalog = catalog();
    let registry = OutpostRegistry::new();
    let mut store = PlanStore::new();

    let first = store
        .save(
            &assigned_draft(&catalog),
            &catalog,
            &registry,
            habitation_cap(0),
            "1/1/2024",
        )
        .unwrap();

    let json = plans_to_json(store.plans());
    let mut reloaded = plans_from_json(&json);
    assert_eq!(reloaded.plans().len(), 1);
    assert_eq!(reloaded.plans()[0].id, first);
    assert_eq!(reloaded.plans()[0].name, "Frame Line");
    assert_eq!(reloaded.plans()[0].steps.len(), 2);

    // a save into the reloaded store must not reuse the old plan id
    let second = reloaded
        .save(
            &assigned_draft(&catalog),
            &catalog,
            &registry,
            habitation_cap(0),
            "2/2/2024",
        )
        .unwrap();
    assert_ne!(first, second);
}

#[test]
fn editing_a_loaded_plan_replaces_it_in_place() {
    let catalog = catalog();
    let registry = OutpostRegistry::new();
    let mut store = PlanStore::new();

    let plan_id = store
        .save(
            &assigned_draft(&catalog),
            &catalog,
            &registry,
            habitation_cap(0),
            "1/1/2024",
        )
        .unwrap();

    // move iron sourcing to Bessel III-b and re-save under the same id
    let mut assignments = store.load(plan_id, &catalog).unwrap();
    assign_planet(&mut assignments, "iron", "bessel3b", "Bessel III-b");
    let edited = PlanDraft {
        plan_id: Some(plan_id),
        name: "Frame Line v2".into(),
        target_item_id: "adaptive_frame".into(),
        output_selector: None,
        dependencies: vec![],
        assignments,
    };
    let same_id = store
        .save(&edited, &catalog, &registry, habitation_cap(0), "9/9/2024")
        .unwrap();

    assert_eq!(same_id, plan_id);
    assert_eq!(store.plans().len(), 1);
    let plan = store.get(plan_id).unwrap();
    assert_eq!(plan.name, "Frame Line v2");
    assert_eq!(plan.date_created, "1/1/2024", "creation date preserved");

    // iron and cobalt now group onto one Bessel step
    let bessel_step = plan
        .steps
        .iter()
        .find(|s| s.planet_id == "bessel3b")
        .unwrap();
    let mut resources: Vec<&str> = bessel_step
        .required_resources
        .iter()
        .map(|r| r.resource_id.as_str())
        .collect();
    resources.sort();
    assert_eq!(resources, vec!["cobalt", "iron"]);
}
