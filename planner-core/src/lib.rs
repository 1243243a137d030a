use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

mod catalog;
mod error;
mod outposts;
mod persistence;
mod planning;
mod types;

pub use catalog::*;
pub use error::*;
pub use outposts::*;
pub use persistence::*;
pub use planning::*;
pub use types::*;

// ============================================================================
// WASM API - Planner
// ============================================================================

/// Hourly extraction multiplied up when sending outpost output to the
/// shopping list.
const CART_HOURS_OF_OUTPUT: u32 = 10;

#[wasm_bindgen]
pub struct Planner {
    catalog: Catalog,
    outposts: OutpostRegistry,
    plans: PlanStore,
    habitation_level: u8,
    draft: Option<PlanDraft>, // plan currently being built or edited
}

#[wasm_bindgen]
impl Planner {
    #[wasm_bindgen(constructor)]
    pub fn new(catalog_json: &str) -> Result<Planner, String> {
        // Better panic messages in browser console
        console_error_panic_hook::set_once();

        let catalog = Catalog::from_json(catalog_json).map_err(|e| e.to_string())?;
        Ok(Self {
            catalog,
            outposts: OutpostRegistry::new(),
            plans: PlanStore::new(),
            habitation_level: 0,
            draft: None,
        })
    }

    /// Planetary Habitation skill level; values outside [0, 4] are clamped.
    #[wasm_bindgen]
    pub fn set_habitation_level(&mut self, level: i32) {
        self.habitation_level = level.clamp(0, i32::from(MAX_HABITATION_LEVEL)) as u8;
    }

    #[wasm_bindgen]
    pub fn max_outposts(&self) -> u32 {
        habitation_cap(self.habitation_level)
    }

    // === Outposts ===

    #[wasm_bindgen]
    pub fn add_outpost(&mut self, planet_id: &str, name: &str) -> Result<u32, String> {
        let date = today();
        self.outposts
            .add_outpost(&self.catalog, planet_id, name, &date)
            .map(|id| id.0)
            .map_err(|e| e.to_string())
    }

    #[wasm_bindgen]
    pub fn add_outpost_resource(&mut self, outpost_id: u32, resource_id: &str, rate: u32) -> bool {
        self.outposts
            .add_resource(&self.catalog, OutpostId::new(outpost_id), resource_id, rate)
    }

    #[wasm_bindgen]
    pub fn remove_outpost_resource(&mut self, outpost_id: u32, resource_id: &str) -> bool {
        self.outposts
            .remove_resource(OutpostId::new(outpost_id), resource_id)
    }

    #[wasm_bindgen]
    pub fn delete_outpost(&mut self, outpost_id: u32) -> bool {
        self.outposts.delete(OutpostId::new(outpost_id))
    }

    /// Shopping-list lines for everything an outpost extracts, sized to ten
    /// hours of output.
    #[wasm_bindgen]
    pub fn outpost_cart_items(&self, outpost_id: u32) -> Result<JsValue, String> {
        let outpost = self
            .outposts
            .get(OutpostId::new(outpost_id))
            .ok_or_else(|| PlanError::UnknownOutpost(OutpostId::new(outpost_id)).to_string())?;
        let entries: Vec<CartEntry> = outpost
            .extracted_resources
            .iter()
            .map(|r| CartEntry {
                resource_id: r.resource_id.clone(),
                resource_name: r.resource_name.clone(),
                qty: r.rate * CART_HOURS_OF_OUTPUT,
            })
            .collect();
        serde_wasm_bindgen::to_value(&entries).map_err(|e| e.to_string())
    }

    // === Plan draft lifecycle ===

    /// Start a fresh plan for a target item, resolving its ingredient list
    /// into unassigned rows.
    #[wasm_bindgen]
    pub fn begin_plan(&mut self, item_id: &str) -> Result<(), String> {
        let assignments =
            initialize_assignments(&self.catalog, item_id).map_err(|e| e.to_string())?;
        let item_name = self
            .catalog
            .item(item_id)
            .map(|i| i.name.clone())
            .unwrap_or_default();
        self.draft = Some(PlanDraft {
            plan_id: None,
            name: format!("{item_name} Manufacturing Plan"),
            target_item_id: item_id.to_string(),
            output_selector: None,
            dependencies: Vec::new(),
            assignments,
        });
        Ok(())
    }

    /// Reopen a saved plan for editing, reconstructing its assignment rows
    /// from the persisted steps.
    #[wasm_bindgen]
    pub fn edit_plan(&mut self, plan_id: u32) -> Result<(), String> {
        let id = PlanId::new(plan_id);
        let assignments = self
            .plans
            .load(id, &self.catalog)
            .map_err(|e| e.to_string())?;
        let Some(plan) = self.plans.get(id) else {
            return Err(PlanError::UnknownPlan(id).to_string());
        };
        self.draft = Some(PlanDraft {
            plan_id: Some(id),
            name: plan.name.clone(),
            target_item_id: plan.target_item_id.clone(),
            output_selector: plan.output_planet_id.clone(),
            dependencies: plan.dependencies.clone(),
            assignments,
        });
        Ok(())
    }

    #[wasm_bindgen]
    pub fn cancel_plan(&mut self) {
        self.draft = None;
    }

    #[wasm_bindgen]
    pub fn set_plan_name(&mut self, name: &str) {
        if let Some(draft) = self.draft.as_mut() {
            draft.name = name.to_string();
        }
    }

    /// Output selector: a planet id, `outpost-<id>`, or empty for "auto".
    #[wasm_bindgen]
    pub fn set_output_selector(&mut self, selector: &str) {
        if let Some(draft) = self.draft.as_mut() {
            draft.output_selector = if selector.is_empty() {
                None
            } else {
                Some(selector.to_string())
            };
        }
    }

    #[wasm_bindgen]
    pub fn assign_planet(&mut self, resource_id: &str, planet_id: &str) -> bool {
        let Some(planet) = self.catalog.planet(planet_id) else {
            return false;
        };
        let planet_name = planet.name.clone();
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        assign_planet(&mut draft.assignments, resource_id, planet_id, &planet_name)
    }

    #[wasm_bindgen]
    pub fn reset_assignments(&mut self) {
        if let Some(draft) = self.draft.as_mut() {
            reset_assignments(&mut draft.assignments);
        }
    }

    #[wasm_bindgen]
    pub fn add_plan_dependency(&mut self, target_plan_id: u32, required_qty: u32) -> bool {
        let Some(target) = self.plans.get(PlanId::new(target_plan_id)).cloned() else {
            return false;
        };
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        link_dependency(&mut draft.dependencies, draft.plan_id, &target, required_qty)
    }

    #[wasm_bindgen]
    pub fn remove_plan_dependency(&mut self, target_plan_id: u32) -> bool {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        let before = draft.dependencies.len();
        draft
            .dependencies
            .retain(|d| d.plan_id.0 != target_plan_id);
        draft.dependencies.len() != before
    }

    #[wasm_bindgen]
    pub fn set_plan_dependency_qty(&mut self, target_plan_id: u32, required_qty: u32) -> bool {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        let Some(dep) = draft
            .dependencies
            .iter_mut()
            .find(|d| d.plan_id.0 == target_plan_id)
        else {
            return false;
        };
        dep.required_qty = required_qty.max(1);
        true
    }

    /// Validate the draft against live capacity and persist it. On success
    /// the draft is cleared and the new plan id returned; on rejection the
    /// draft stays open and the error carries the numeric deficit.
    #[wasm_bindgen]
    pub fn finalize_plan(&mut self) -> Result<u32, String> {
        let Some(draft) = self.draft.as_ref() else {
            return Err("no plan in progress".to_string());
        };
        let cap = habitation_cap(self.habitation_level);
        let date = today();
        let id = self
            .plans
            .save(draft, &self.catalog, &self.outposts, cap, &date)
            .map_err(|e| e.to_string())?;
        self.draft = None;
        Ok(id.0)
    }

    // === Saved plans ===

    #[wasm_bindgen]
    pub fn delete_plan(&mut self, plan_id: u32) -> Result<(), String> {
        self.plans
            .delete(PlanId::new(plan_id))
            .map_err(|e| e.to_string())
    }

    /// Advisory: deleting this plan deserves a confirmation because some of
    /// its steps are not yet covered by a real outpost.
    #[wasm_bindgen]
    pub fn plan_needs_confirmation(&self, plan_id: u32) -> bool {
        self.plans
            .get(PlanId::new(plan_id))
            .is_some_and(|plan| !is_plan_fully_built(plan, &self.outposts))
    }

    /// Flattened (resource, name, qty) lines for all of a plan's steps.
    #[wasm_bindgen]
    pub fn plan_cart_items(&self, plan_id: u32) -> Result<JsValue, String> {
        let entries = self
            .plans
            .cart_items(PlanId::new(plan_id))
            .map_err(|e| e.to_string())?;
        serde_wasm_bindgen::to_value(&entries).map_err(|e| e.to_string())
    }

    // === Persistence ===

    #[wasm_bindgen]
    pub fn export_plans(&self) -> String {
        plans_to_json(self.plans.plans())
    }

    #[wasm_bindgen]
    pub fn import_plans(&mut self, json: &str) {
        self.plans = plans_from_json(json);
    }

    #[wasm_bindgen]
    pub fn export_outposts(&self) -> String {
        outposts_to_json(self.outposts.outposts())
    }

    #[wasm_bindgen]
    pub fn import_outposts(&mut self, json: &str) {
        self.outposts = outposts_from_json(json);
    }

    // === Snapshot ===

    /// Get a snapshot of the current state for rendering. Everything derived
    /// from outpost coverage is recomputed here, on read.
    #[wasm_bindgen]
    pub fn snapshot(&self) -> PlannerSnapshot {
        let cap = habitation_cap(self.habitation_level);
        let committed = committed_outposts(self.plans.plans(), &self.outposts);
        let built = self.outposts.len();
        let remaining = remaining_capacity(cap, &self.outposts, committed);

        PlannerSnapshot {
            habitation_level: self.habitation_level,
            capacity: CapacitySnapshot {
                max_outposts: cap,
                built: built as u32,
                committed: committed as u32,
                total_commitment: (built + committed) as u32,
                remaining,
            },
            outposts: self
                .outposts
                .outposts()
                .iter()
                .map(|o| OutpostSnapshot {
                    id: o.id.0,
                    planet_id: o.planet_id.clone(),
                    planet_name: o.planet_name.clone(),
                    name: o.name.clone(),
                    date_created: o.date_created.clone(),
                    total_rate: o.extracted_resources.iter().map(|r| r.rate).sum(),
                    extracted_resources: o
                        .extracted_resources
                        .iter()
                        .map(|r| ExtractedResourceSnapshot {
                            resource_id: r.resource_id.clone(),
                            resource_name: r.resource_name.clone(),
                            rate: r.rate,
                        })
                        .collect(),
                })
                .collect(),
            plans: self
                .plans
                .plans()
                .iter()
                .map(|plan| PlanSnapshot {
                    id: plan.id.0,
                    name: plan.name.clone(),
                    target_item_id: plan.target_item_id.clone(),
                    target_item_name: plan.target_item_name.clone(),
                    output_planet_id: plan.output_planet_id.clone(),
                    output_planet_name: plan.output_planet_name.clone(),
                    total_value: plan.total_value,
                    total_time: plan.total_time,
                    date_created: plan.date_created.clone(),
                    is_chained_plan: plan.is_chained_plan,
                    is_fully_built: is_plan_fully_built(plan, &self.outposts),
                    dependencies: plan
                        .dependencies
                        .iter()
                        .map(|d| DependencySnapshot {
                            plan_id: d.plan_id.0,
                            plan_name: d.plan_name.clone(),
                            output_item: d.output_item.clone(),
                            output_planet: d.output_planet.clone(),
                            required_qty: d.required_qty,
                        })
                        .collect(),
                    steps: plan
                        .steps
                        .iter()
                        .map(|step| StepSnapshot {
                            id: step.id.0,
                            step_order: step.step_order,
                            planet_id: step.planet_id.clone(),
                            planet_name: step.planet_name.clone(),
                            outposts_ready: step.required_resources.iter().all(|r| {
                                self.outposts.covers(&step.planet_id, &r.resource_id)
                            }),
                            required_resources: step
                                .required_resources
                                .iter()
                                .map(|r| RequiredResourceSnapshot {
                                    resource_id: r.resource_id.clone(),
                                    resource_name: r.resource_name.clone(),
                                    qty: r.qty,
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
            draft: self.draft.as_ref().map(|draft| self.draft_snapshot(draft)),
        }
    }
}

impl Planner {
    fn draft_snapshot(&self, draft: &PlanDraft) -> DraftSnapshot {
        let cap = habitation_cap(self.habitation_level);
        let committed = committed_outposts(self.plans.plans(), &self.outposts);
        let remaining = remaining_capacity(cap, &self.outposts, committed);
        let required = outposts_required(&draft.assignments, &self.outposts);
        let complete = is_complete(&draft.assignments);

        DraftSnapshot {
            editing_plan_id: draft.plan_id.map(|id| id.0),
            name: draft.name.clone(),
            target_item_id: draft.target_item_id.clone(),
            output_selector: draft.output_selector.clone(),
            assigned_count: draft
                .assignments
                .iter()
                .filter(|a| a.selected_planet_id.is_some())
                .count() as u32,
            total_count: draft.assignments.len() as u32,
            is_complete: complete,
            new_outposts_required: required as u32,
            can_finalize: complete && can_finalize(required, remaining),
            dependencies: draft
                .dependencies
                .iter()
                .map(|d| DependencySnapshot {
                    plan_id: d.plan_id.0,
                    plan_name: d.plan_name.clone(),
                    output_item: d.output_item.clone(),
                    output_planet: d.output_planet.clone(),
                    required_qty: d.required_qty,
                })
                .collect(),
            assignments: draft
                .assignments
                .iter()
                .map(|a| AssignmentSnapshot {
                    resource_id: a.resource_id.clone(),
                    resource_name: a.resource_name.clone(),
                    qty: a.qty,
                    selected_planet_id: a.selected_planet_id.clone(),
                    selected_planet_name: a.selected_planet_name.clone(),
                    has_existing_outpost: has_existing_outpost(a, &self.outposts),
                    unresolvable: a.is_unresolvable(),
                    available_planets: a
                        .available_planets
                        .iter()
                        .map(|p| PlanetChoiceSnapshot {
                            id: p.id.clone(),
                            name: p.name.clone(),
                            system: p.system.clone(),
                            has_outpost_for_resource: self
                                .outposts
                                .covers(&p.id, &a.resource_id),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Wall-clock date for creation stamps, formatted by the host environment.
/// The core never reads a clock; native builds (tests) stamp nothing.
fn today() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::new_0()
            .to_locale_date_string("en-US", &JsValue::UNDEFINED)
            .into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        String::new()
    }
}

// ============================================================================
// Serializable State Snapshots for JS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct PlannerSnapshot {
    pub habitation_level: u8,
    pub capacity: CapacitySnapshot,
    pub outposts: Vec<OutpostSnapshot>,
    pub plans: Vec<PlanSnapshot>,
    pub draft: Option<DraftSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct CapacitySnapshot {
    pub max_outposts: u32,
    /// Outposts actually built
    pub built: u32,
    /// Planets saved plans still need outposts on
    pub committed: u32,
    pub total_commitment: u32,
    /// May be negative when over-committed; displayed, not clamped
    pub remaining: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedResourceSnapshot {
    pub resource_id: String,
    pub resource_name: String,
    pub rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct OutpostSnapshot {
    pub id: u32,
    pub planet_id: String,
    pub planet_name: String,
    pub name: String,
    pub date_created: String,
    pub extracted_resources: Vec<ExtractedResourceSnapshot>,
    pub total_rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct RequiredResourceSnapshot {
    pub resource_id: String,
    pub resource_name: String,
    pub qty: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct StepSnapshot {
    pub id: u32,
    pub step_order: u32,
    pub planet_id: String,
    pub planet_name: String,
    /// Whether every resource this step needs is covered by a built outpost
    pub outposts_ready: bool,
    pub required_resources: Vec<RequiredResourceSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct DependencySnapshot {
    pub plan_id: u32,
    pub plan_name: String,
    pub output_item: String,
    pub output_planet: String,
    pub required_qty: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct PlanSnapshot {
    pub id: u32,
    pub name: String,
    pub target_item_id: String,
    pub target_item_name: String,
    pub output_planet_id: Option<String>,
    pub output_planet_name: Option<String>,
    pub total_value: u32,
    pub total_time: u32,
    pub date_created: String,
    pub is_chained_plan: bool,
    pub is_fully_built: bool,
    pub dependencies: Vec<DependencySnapshot>,
    pub steps: Vec<StepSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct PlanetChoiceSnapshot {
    pub id: String,
    pub name: String,
    pub system: String,
    pub has_outpost_for_resource: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSnapshot {
    pub resource_id: String,
    pub resource_name: String,
    pub qty: u32,
    pub selected_planet_id: Option<String>,
    pub selected_planet_name: Option<String>,
    pub has_existing_outpost: bool,
    /// No known planet yields this resource; the plan cannot be finalized
    pub unresolvable: bool,
    pub available_planets: Vec<PlanetChoiceSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot {
    pub editing_plan_id: Option<u32>,
    pub name: String,
    pub target_item_id: String,
    pub output_selector: Option<String>,
    pub assigned_count: u32,
    pub total_count: u32,
    pub is_complete: bool,
    pub new_outposts_required: u32,
    pub can_finalize: bool,
    pub dependencies: Vec<DependencySnapshot>,
    pub assignments: Vec<AssignmentSnapshot>,
}

// ============================================================================
// Tests
// ============================================================================
