// User-built extraction outposts and the registry that owns them

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::PlanError;
use crate::types::{OutpostId, PlanetId, ResourceId};

/// One resource an outpost pulls out of the ground, at a fixed hourly rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedResource {
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub rate: u32,
}

/// An extraction site bound to exactly one planet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outpost {
    pub id: OutpostId,
    pub planet_id: PlanetId,
    pub planet_name: String,
    pub name: String,
    #[serde(default)]
    pub extracted_resources: Vec<ExtractedResource>,
    #[serde(default)]
    pub date_created: String,
}

// === REGISTRY ===

/// The set of outposts the user has built. The planning engine only ever
/// reads this; all mutation comes from direct user actions.
#[derive(Debug, Clone, Default)]
pub struct OutpostRegistry {
    outposts: Vec<Outpost>,
    next_outpost_id: u32,
}

impl OutpostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from persisted outposts. The id counter resumes
    /// past the highest loaded id so new outposts never collide.
    pub fn from_outposts(outposts: Vec<Outpost>) -> Self {
        let next_outpost_id = outposts.iter().map(|o| o.id.0 + 1).max().unwrap_or(0);
        Self {
            outposts,
            next_outpost_id,
        }
    }

    pub fn add_outpost(
        &mut self,
        catalog: &Catalog,
        planet_id: &str,
        name: &str,
        date_created: &str,
    ) -> Result<OutpostId, PlanError> {
        let planet = catalog
            .planet(planet_id)
            .ok_or_else(|| PlanError::UnknownPlanet(planet_id.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(PlanError::EmptyOutpostName);
        }

        let id = OutpostId::new(self.next_outpost_id);
        self.next_outpost_id += 1;

        self.outposts.push(Outpost {
            id,
            planet_id: planet.id.clone(),
            planet_name: planet.name.clone(),
            name: name.to_string(),
            extracted_resources: Vec::new(),
            date_created: date_created.to_string(),
        });

        Ok(id)
    }

    /// Add an extracted resource to an outpost. Resource ids are unique per
    /// outpost; a duplicate (or a zero rate) is a silent no-op.
    pub fn add_resource(
        &mut self,
        catalog: &Catalog,
        outpost_id: OutpostId,
        resource_id: &str,
        rate: u32,
    ) -> bool {
        if rate == 0 {
            return false;
        }
        let Some(outpost) = self.outposts.iter_mut().find(|o| o.id == outpost_id) else {
            return false;
        };
        if outpost
            .extracted_resources
            .iter()
            .any(|r| r.resource_id == resource_id)
        {
            return false;
        }

        outpost.extracted_resources.push(ExtractedResource {
            resource_id: resource_id.to_string(),
            resource_name: catalog.resource_name(resource_id),
            rate,
        });
        true
    }

    pub fn remove_resource(&mut self, outpost_id: OutpostId, resource_id: &str) -> bool {
        let Some(outpost) = self.outposts.iter_mut().find(|o| o.id == outpost_id) else {
            return false;
        };
        let before = outpost.extracted_resources.len();
        outpost
            .extracted_resources
            .retain(|r| r.resource_id != resource_id);
        outpost.extracted_resources.len() != before
    }

    pub fn delete(&mut self, outpost_id: OutpostId) -> bool {
        let before = self.outposts.len();
        self.outposts.retain(|o| o.id != outpost_id);
        self.outposts.len() != before
    }

    pub fn get(&self, outpost_id: OutpostId) -> Option<&Outpost> {
        self.outposts.iter().find(|o| o.id == outpost_id)
    }

    pub fn outposts(&self) -> &[Outpost] {
        &self.outposts
    }

    pub fn len(&self) -> usize {
        self.outposts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outposts.is_empty()
    }

    /// True iff some outpost on `planet_id` already extracts `resource_id`.
    /// Every capacity computation is built on this predicate.
    pub fn covers(&self, planet_id: &str, resource_id: &str) -> bool {
        self.outposts.iter().any(|o| {
            o.planet_id == planet_id
                && o.extracted_resources
                    .iter()
                    .any(|r| r.resource_id == resource_id)
        })
    }

    /// Summed extraction rate across all outposts, units per hour.
    pub fn total_production_rate(&self) -> u32 {
        self.outposts
            .iter()
            .flat_map(|o| &o.extracted_resources)
            .map(|r| r.rate)
            .sum()
    }
}
