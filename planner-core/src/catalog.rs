// Static reference catalog: resources, craftable items, planets, rarity tiers

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, PlanetId, ResourceId};

// === CATALOG ENTITIES ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    pub rarity: String,
    pub value: u32,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub resource: ResourceId,
    pub qty: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub rarity: String,
    pub value: u32,
    /// Craft time in seconds
    pub time: u32,
    /// Sale value minus total ingredient cost, precomputed in the feed
    #[serde(default)]
    pub profit: i32,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

impl Item {
    /// Credits earned per minute of craft time
    pub fn profit_rate(&self) -> f64 {
        self.profit as f64 / (self.time as f64 / 60.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    pub id: PlanetId,
    pub name: String,
    pub system: String,
    #[serde(default)]
    pub level: u32,
    /// Resource ids this planet can yield
    #[serde(default)]
    pub resources: Vec<ResourceId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RarityTier {
    pub name: String,
    pub color: String,
}

// === CATALOG ===

/// Read-only reference data, deserialized once from the JSON feed and never
/// mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub planets: Vec<Planet>,
    #[serde(default, rename = "rarityLevels")]
    pub rarity_tiers: Vec<RarityTier>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn planet(&self, id: &str) -> Option<&Planet> {
        self.planets.iter().find(|p| p.id == id)
    }

    /// Falls back to the raw id for resources missing from the feed.
    pub fn resource_name(&self, id: &str) -> String {
        self.resource(id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// All planets able to yield a resource, in catalog order (not sorted).
    pub fn planets_with_resource(&self, resource_id: &str) -> Vec<&Planet> {
        self.planets
            .iter()
            .filter(|p| p.resources.iter().any(|r| r == resource_id))
            .collect()
    }

    /// Resource ids present on a planet; empty for unknown planets.
    pub fn planet_resources(&self, planet_id: &str) -> &[ResourceId] {
        self.planet(planet_id)
            .map(|p| p.resources.as_slice())
            .unwrap_or_default()
    }

    pub fn rarity_color(&self, rarity: &str) -> &str {
        self.rarity_tiers
            .iter()
            .find(|t| t.name == rarity)
            .map(|t| t.color.as_str())
            .unwrap_or("#ffffff")
    }
}
