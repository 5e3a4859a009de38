use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::instrument;

use crate::entities::inventory_record::{self, StockStatus};
use crate::errors::ServiceError;
use crate::repositories::{InventoryRepository, LocationRepository};
use crate::services::{quantity, EvaluationContext};

/// Outcome of a single (sku, location) availability check. The fetched
/// record and the location's enabled flag ride along so the caller can
/// attempt a rebalance without a second fetch.
#[derive(Debug, Clone)]
pub struct ItemAvailability {
    pub fulfillable: bool,
    pub record: Option<inventory_record::Model>,
    pub location_enabled: bool,
}

impl ItemAvailability {
    fn absent() -> Self {
        Self {
            fulfillable: false,
            record: None,
            location_enabled: false,
        }
    }
}

/// Decides whether one (sku, location) pair can satisfy a requested
/// quantity, considering declared quantity, stock status and whether
/// the owning location is enabled.
#[derive(Clone)]
pub struct ItemAvailabilityChecker {
    inventory: Arc<dyn InventoryRepository>,
    locations: Arc<dyn LocationRepository>,
}

impl ItemAvailabilityChecker {
    pub fn new(
        inventory: Arc<dyn InventoryRepository>,
        locations: Arc<dyn LocationRepository>,
    ) -> Self {
        Self {
            inventory,
            locations,
        }
    }

    #[instrument(skip(self, ctx), fields(required = %required_qty))]
    pub async fn check(
        &self,
        sku: &str,
        location_code: &str,
        required_qty: Decimal,
        ctx: &EvaluationContext,
    ) -> Result<ItemAvailability, ServiceError> {
        ctx.check_deadline()?;
        let Some(record) = self.inventory.find_record(sku, location_code).await? else {
            return Ok(ItemAvailability::absent());
        };

        ctx.check_deadline()?;
        let location = self.locations.get_location(location_code).await?;

        let fulfillable = quantity::is_sufficient(record.quantity, required_qty)
            && record.status == StockStatus::InStock
            && location.enabled;

        Ok(ItemAvailability {
            fulfillable,
            record: Some(record),
            location_enabled: location.enabled,
        })
    }
}
