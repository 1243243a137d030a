// Saved-plan collection: step synthesis, capacity-checked saves, dependencies

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::catalog::{Catalog, Item};
use crate::error::PlanError;
use crate::outposts::OutpostRegistry;
use crate::planning::assignment::{
    self, PlanetChoice, ResourcePlanetAssignment,
};
use crate::planning::capacity;
use crate::planning::plan::{
    link_dependency, ManufacturePlan, ManufacturingStep, PlanDependency, RequiredResource,
};
use crate::types::{ItemId, OutpostId, PlanId, StepId};

/// Everything the user has chosen for a plan before it is finalized.
#[derive(Debug, Clone, Default)]
pub struct PlanDraft {
    /// Present when editing an existing plan.
    pub plan_id: Option<PlanId>,
    pub name: String,
    pub target_item_id: ItemId,
    /// Raw output selector: a planet id, or `outpost-<id>` for an existing
    /// outpost. `None`/empty means "auto" (first manufacturing planet).
    pub output_selector: Option<String>,
    pub dependencies: Vec<PlanDependency>,
    pub assignments: Vec<ResourcePlanetAssignment>,
}

/// Flattened cart line handed to the external shopping-list aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub resource_id: String,
    pub resource_name: String,
    pub qty: u32,
}

// === STORE ===

/// Owns the saved `ManufacturePlan` collection.
#[derive(Debug, Clone, Default)]
pub struct PlanStore {
    plans: Vec<ManufacturePlan>,
    next_plan_id: u32,
    next_step_id: u32,
}

impl PlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted plans; id counters resume past the
    /// highest loaded ids.
    pub fn from_plans(plans: Vec<ManufacturePlan>) -> Self {
        let next_plan_id = plans.iter().map(|p| p.id.0 + 1).max().unwrap_or(0);
        let next_step_id = plans
            .iter()
            .flat_map(|p| &p.steps)
            .map(|s| s.id.0 + 1)
            .max()
            .unwrap_or(0);
        Self {
            plans,
            next_plan_id,
            next_step_id,
        }
    }

    pub fn plans(&self) -> &[ManufacturePlan] {
        &self.plans
    }

    pub fn get(&self, plan_id: PlanId) -> Option<&ManufacturePlan> {
        self.plans.iter().find(|p| p.id == plan_id)
    }

    fn get_mut(&mut self, plan_id: PlanId) -> Option<&mut ManufacturePlan> {
        self.plans.iter_mut().find(|p| p.id == plan_id)
    }

    /// Group completed assignments by selected planet, one step per planet,
    /// in the order planets are first encountered. `required_items` stays
    /// empty; `step_order` is the 1-based group index.
    pub fn synthesize_steps(
        &mut self,
        assignments: &[ResourcePlanetAssignment],
        item: &Item,
    ) -> Result<Vec<ManufacturingStep>, PlanError> {
        if !assignment::is_complete(assignments) {
            return Err(PlanError::IncompleteAssignment);
        }

        let mut steps: Vec<ManufacturingStep> = Vec::new();
        for row in assignments {
            let (Some(planet_id), Some(planet_name)) = (
                row.selected_planet_id.as_deref(),
                row.selected_planet_name.as_deref(),
            ) else {
                continue;
            };

            let index = match steps.iter().position(|s| s.planet_id == planet_id) {
                Some(index) => index,
                None => {
                    let id = StepId::new(self.next_step_id);
                    self.next_step_id += 1;
                    steps.push(ManufacturingStep {
                        id,
                        item_id: item.id.clone(),
                        item_name: item.name.clone(),
                        planet_id: planet_id.to_string(),
                        planet_name: planet_name.to_string(),
                        required_resources: Vec::new(),
                        required_items: Vec::new(),
                        step_order: steps.len() as u32 + 1,
                    });
                    steps.len() - 1
                }
            };
            let step = &mut steps[index];

            // assignment rows are unique per resource; accumulate anyway so a
            // duplicate can never produce two entries in one step
            match step
                .required_resources
                .iter_mut()
                .find(|r| r.resource_id == row.resource_id)
            {
                Some(existing) => existing.qty += row.qty,
                None => step.required_resources.push(RequiredResource {
                    resource_id: row.resource_id.clone(),
                    resource_name: row.resource_name.clone(),
                    qty: row.qty,
                }),
            }
        }

        Ok(steps)
    }

    /// Finalize a draft into a saved plan.
    ///
    /// Capacity is re-validated against the live registry and plan set
    /// immediately before persisting; a violation rejects the save with the
    /// numeric deficit, never a truncated plan. A draft carrying the id of
    /// an existing plan replaces it in place, keeping its creation date.
    pub fn save(
        &mut self,
        draft: &PlanDraft,
        catalog: &Catalog,
        registry: &OutpostRegistry,
        cap: u32,
        date_created: &str,
    ) -> Result<PlanId, PlanError> {
        let item = catalog
            .item(&draft.target_item_id)
            .ok_or_else(|| PlanError::UnknownItem(draft.target_item_id.clone()))?
            .clone();

        if let Some(blocked) = assignment::unresolvable_resources(&draft.assignments).first() {
            return Err(PlanError::UnresolvableResource {
                resource_id: blocked.resource_id.clone(),
                resource_name: blocked.resource_name.clone(),
            });
        }

        let steps = self.synthesize_steps(&draft.assignments, &item)?;

        let required = capacity::outposts_required(&draft.assignments, registry);
        let committed = capacity::committed_outposts(&self.plans, registry);
        let remaining = capacity::remaining_capacity(cap, registry, committed);
        if !capacity::can_finalize(required, remaining) {
            #[cfg(feature = "instrument")]
            tracing::info!(
                target: "plan_rejected",
                item_id = %item.id,
                required = required as u64,
                available = remaining,
                committed = committed as u64,
            );
            return Err(PlanError::CapacityExceeded {
                required,
                available: remaining,
                committed,
            });
        }

        let (output_planet_id, output_planet_name) = resolve_output_location(
            draft.output_selector.as_deref(),
            &steps,
            catalog,
            registry,
        );

        let name = if draft.name.trim().is_empty() {
            format!("{} Plan", item.name)
        } else {
            draft.name.clone()
        };
        let dependencies = draft.dependencies.clone();
        let is_chained_plan = !dependencies.is_empty();

        let existing = draft.plan_id.and_then(|id| {
            self.plans
                .iter()
                .position(|p| p.id == id)
                .map(|index| (id, index))
        });

        let (id, date_created, slot) = match existing {
            Some((id, index)) => {
                let original_date = self.plans[index].date_created.clone();
                (id, original_date, Some(index))
            }
            None => {
                let id = PlanId::new(self.next_plan_id);
                self.next_plan_id += 1;
                (id, date_created.to_string(), None)
            }
        };

        let plan = ManufacturePlan {
            id,
            name,
            target_item_id: item.id.clone(),
            target_item_name: item.name.clone(),
            output_planet_id,
            output_planet_name,
            steps,
            dependencies,
            total_value: item.value,
            total_time: item.time,
            date_created,
            is_chained_plan,
        };

        #[cfg(feature = "instrument")]
        tracing::info!(
            target: "plan_saved",
            plan_id = id.0,
            item_id = %item.id,
            steps = plan.steps.len() as u64,
            required = required as u64,
            committed = committed as u64,
        );

        match slot {
            Some(index) => self.plans[index] = plan,
            None => self.plans.push(plan),
        }
        Ok(id)
    }

    /// Remove a plan. Any advisory "not yet fully built" confirmation is the
    /// caller's concern, not a store precondition.
    pub fn delete(&mut self, plan_id: PlanId) -> Result<(), PlanError> {
        let before = self.plans.len();
        self.plans.retain(|p| p.id != plan_id);
        if self.plans.len() == before {
            return Err(PlanError::UnknownPlan(plan_id));
        }

        #[cfg(feature = "instrument")]
        tracing::info!(target: "plan_deleted", plan_id = plan_id.0);

        Ok(())
    }

    /// Link a saved plan to another saved plan. Duplicate targets and
    /// self-dependencies are rejected as silent no-ops.
    pub fn add_dependency(
        &mut self,
        plan_id: PlanId,
        target_plan_id: PlanId,
        required_qty: u32,
    ) -> bool {
        let Some(target) = self.get(target_plan_id).cloned() else {
            return false;
        };
        let Some(plan) = self.get_mut(plan_id) else {
            return false;
        };
        let linked = link_dependency(
            &mut plan.dependencies,
            Some(plan_id),
            &target,
            required_qty,
        );
        if linked {
            plan.is_chained_plan = !plan.dependencies.is_empty();
        }
        linked
    }

    pub fn remove_dependency(&mut self, plan_id: PlanId, target_plan_id: PlanId) -> bool {
        let Some(plan) = self.get_mut(plan_id) else {
            return false;
        };
        let before = plan.dependencies.len();
        plan.dependencies.retain(|d| d.plan_id != target_plan_id);
        let removed = plan.dependencies.len() != before;
        if removed {
            plan.is_chained_plan = !plan.dependencies.is_empty();
        }
        removed
    }

    /// User-editable dependency quantity, clamped to at least 1.
    pub fn set_dependency_qty(
        &mut self,
        plan_id: PlanId,
        target_plan_id: PlanId,
        required_qty: u32,
    ) -> bool {
        let Some(plan) = self.get_mut(plan_id) else {
            return false;
        };
        let Some(dep) = plan
            .dependencies
            .iter_mut()
            .find(|d| d.plan_id == target_plan_id)
        else {
            return false;
        };
        dep.required_qty = required_qty.max(1);
        true
    }

    /// Inverse of `synthesize_steps`: reconstruct assignment rows from a
    /// plan's steps for editing. Quantities for a resource appearing in
    /// multiple steps are summed defensively; the first-seen planet wins.
    pub fn load(
        &self,
        plan_id: PlanId,
        catalog: &Catalog,
    ) -> Result<Vec<ResourcePlanetAssignment>, PlanError> {
        let plan = self.get(plan_id).ok_or(PlanError::UnknownPlan(plan_id))?;

        let mut assignments: Vec<ResourcePlanetAssignment> = Vec::new();
        for step in &plan.steps {
            for resource in &step.required_resources {
                if let Some(existing) = assignments
                    .iter_mut()
                    .find(|a| a.resource_id == resource.resource_id)
                {
                    existing.qty += resource.qty;
                    continue;
                }
                assignments.push(ResourcePlanetAssignment {
                    resource_id: resource.resource_id.clone(),
                    resource_name: resource.resource_name.clone(),
                    qty: resource.qty,
                    selected_planet_id: Some(step.planet_id.clone()),
                    selected_planet_name: Some(step.planet_name.clone()),
                    available_planets: catalog
                        .planets_with_resource(&resource.resource_id)
                        .into_iter()
                        .map(|p| PlanetChoice {
                            id: p.id.clone(),
                            name: p.name.clone(),
                            system: p.system.clone(),
                        })
                        .collect(),
                });
            }
        }
        Ok(assignments)
    }

    /// Flattened (resource, name, qty) triples over every step of a plan,
    /// handed to the external shopping-list aggregator as-is.
    pub fn cart_items(&self, plan_id: PlanId) -> Result<Vec<CartEntry>, PlanError> {
        let plan = self.get(plan_id).ok_or(PlanError::UnknownPlan(plan_id))?;
        Ok(plan
            .steps
            .iter()
            .flat_map(|step| &step.required_resources)
            .map(|r| CartEntry {
                resource_id: r.resource_id.clone(),
                resource_name: r.resource_name.clone(),
                qty: r.qty,
            })
            .collect())
    }
}

/// Resolve the user's output selector into (id, display name).
///
/// Unset means "auto": the first step's planet. An `outpost-<id>` selector
/// keeps its raw id and gets an outpost-qualified display name.
fn resolve_output_location(
    selector: Option<&str>,
    steps: &[ManufacturingStep],
    catalog: &Catalog,
    registry: &OutpostRegistry,
) -> (Option<String>, Option<String>) {
    let Some(selector) = selector.filter(|s| !s.is_empty()) else {
        return (
            steps.first().map(|s| s.planet_id.clone()),
            steps.first().map(|s| s.planet_name.clone()),
        );
    };

    let name = match selector.strip_prefix("outpost-") {
        Some(raw_id) => raw_id
            .parse::<u32>()
            .ok()
            .and_then(|id| registry.get(OutpostId::new(id)))
            .map(|o| format!("{} ({})", o.name, o.planet_name))
            .unwrap_or_else(|| "Unknown Outpost".to_string()),
        None => catalog
            .planet(selector)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "Unknown Planet".to_string()),
    };

    (Some(selector.to_string()), Some(name))
}
