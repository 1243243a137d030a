// Error taxonomy for planning operations

use thiserror::Error;

use crate::types::{ItemId, OutpostId, PlanId, PlanetId, ResourceId};

/// Every failure is a deterministic function of current state; nothing here
/// is transient or retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),

    #[error("unknown planet: {0}")]
    UnknownPlanet(PlanetId),

    #[error("unknown outpost: {0}")]
    UnknownOutpost(OutpostId),

    #[error("unknown plan: {0}")]
    UnknownPlan(PlanId),

    #[error("outpost name must not be empty")]
    EmptyOutpostName,

    /// An ingredient with zero candidate planets blocks the whole plan.
    #[error("{resource_name} is not available on any known planet")]
    UnresolvableResource {
        resource_id: ResourceId,
        resource_name: String,
    },

    #[error("every resource must be assigned to a planet before finalizing")]
    IncompleteAssignment,

    /// The numeric deficit is reported, never auto-adjusted away.
    #[error(
        "plan requires {required} new outposts but only {available} slots are \
         available ({committed} already committed to other plans)"
    )]
    CapacityExceeded {
        required: usize,
        available: i64,
        committed: usize,
    },
}
