// Tolerant load/save of the persisted plan and outpost collections
//
// Normalization happens here, once, at load time: every record comes out
// fully typed with missing fields defaulted, so business logic never sees a
// partially-shaped value.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::outposts::{Outpost, OutpostRegistry};
use crate::planning::plan::ManufacturePlan;
use crate::planning::store::PlanStore;

fn collection_to_json<T: Serialize>(records: &[T]) -> String {
    serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a persisted JSON array record-by-record. A record that cannot be
/// normalized is skipped; the rest still load. A blob that fails to parse at
/// all yields an empty collection rather than an error.
fn collection_from_json<T: DeserializeOwned>(json: &str) -> Vec<T> {
    let Ok(raw) = serde_json::from_str::<Vec<Value>>(json) else {
        return Vec::new();
    };
    raw.into_iter()
        .filter_map(|record| serde_json::from_value(record).ok())
        .collect()
}

pub fn plans_to_json(plans: &[ManufacturePlan]) -> String {
    collection_to_json(plans)
}

pub fn plans_from_json(json: &str) -> PlanStore {
    PlanStore::from_plans(collection_from_json(json))
}

pub fn outposts_to_json(outposts: &[Outpost]) -> String {
    collection_to_json(outposts)
}

pub fn outposts_from_json(json: &str) -> OutpostRegistry {
    OutpostRegistry::from_outposts(collection_from_json(json))
}
