use std::collections::HashMap;
use tokio::time::Instant;

use crate::errors::ServiceError;

pub mod availability;
pub mod default_location;
pub mod fulfillability;
pub mod quantity;
pub mod rebalance;

pub use availability::{ItemAvailability, ItemAvailabilityChecker};
pub use default_location::DefaultLocationResolver;
pub use fulfillability::FulfillabilityEvaluator;
pub use rebalance::QuantityRebalancer;

/// State threaded through one fulfillability evaluation run: the
/// optional deadline and the per-run default-location cache.
///
/// The cache lives here rather than on any service instance so that
/// concurrent evaluations for different stocks never observe each
/// other's resolution.
#[derive(Debug, Default)]
pub struct EvaluationContext {
    deadline: Option<Instant>,
    default_locations: HashMap<i64, String>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            default_locations: HashMap::new(),
        }
    }

    /// Checked before every underlying read or write. An expired
    /// deadline aborts the evaluation; the verdict is never silently
    /// `Fulfillable`.
    pub fn check_deadline(&self) -> Result<(), ServiceError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(
                ServiceError::EvaluationAborted("evaluation deadline exceeded".to_string()),
            ),
            _ => Ok(()),
        }
    }

    pub(crate) fn cached_default_location(&self, stock_id: i64) -> Option<&str> {
        self.default_locations.get(&stock_id).map(String::as_str)
    }

    pub(crate) fn cache_default_location(&mut self, stock_id: i64, location_code: String) {
        self.default_locations.insert(stock_id, location_code);
    }
}
