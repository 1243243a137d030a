// Persisted manufacture plans, their steps and dependency links

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, PlanId, PlanetId, ResourceId, StepId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredResource {
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub qty: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredItem {
    pub item_id: ItemId,
    pub item_name: String,
    pub qty: u32,
}

/// The portion of a plan's resource needs assignable to a single planet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturingStep {
    pub id: StepId,
    pub item_id: ItemId,
    pub item_name: String,
    pub planet_id: PlanetId,
    pub planet_name: String,
    #[serde(default)]
    pub required_resources: Vec<RequiredResource>,
    /// Sub-item dependencies are not resolved; the field stays on the wire
    /// format for compatibility and is always empty.
    #[serde(default)]
    pub required_items: Vec<RequiredItem>,
    /// 1-based, stable display order from step synthesis.
    pub step_order: u32,
}

/// Informational link to another plan; has no effect on capacity math.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDependency {
    pub plan_id: PlanId,
    pub plan_name: String,
    pub output_item: String,
    pub output_planet: String,
    pub required_qty: u32,
}

/// A saved manufacturing intent for one target item.
///
/// `total_value`/`total_time` are copied from the item at save time, not
/// recomputed later. Anything derived from outpost state ("fully built",
/// "has existing outpost") is deliberately absent here and computed on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturePlan {
    pub id: PlanId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target_item_id: ItemId,
    #[serde(default)]
    pub target_item_name: String,
    #[serde(default)]
    pub output_planet_id: Option<String>,
    #[serde(default)]
    pub output_planet_name: Option<String>,
    #[serde(default)]
    pub steps: Vec<ManufacturingStep>,
    #[serde(default)]
    pub dependencies: Vec<PlanDependency>,
    #[serde(default)]
    pub total_value: u32,
    #[serde(default)]
    pub total_time: u32,
    #[serde(default)]
    pub date_created: String,
    #[serde(default)]
    pub is_chained_plan: bool,
}

/// Draft-side dependency linking, sharing one rule set with the store:
/// no duplicate target, no self-dependency, quantity at least 1.
pub fn link_dependency(
    dependencies: &mut Vec<PlanDependency>,
    editing: Option<PlanId>,
    target: &ManufacturePlan,
    required_qty: u32,
) -> bool {
    if editing == Some(target.id) {
        return false;
    }
    if dependencies.iter().any(|d| d.plan_id == target.id) {
        return false;
    }
    dependencies.push(PlanDependency {
        plan_id: target.id,
        plan_name: target.name.clone(),
        output_item: target.target_item_name.clone(),
        output_planet: target
            .output_planet_name
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        required_qty: required_qty.max(1),
    });
    true
}
