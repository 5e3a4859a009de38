use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::ServiceError;

/// A single order line. Bundle parents are containers for their child
/// lines and are never evaluated directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct OrderLine {
    #[validate(length(min = 1, message = "sku cannot be empty"))]
    pub sku: String,
    pub quantity_ordered: Decimal,
    #[serde(default)]
    pub bundle_parent: bool,
}

/// Read-only view of the order under evaluation. The order itself is
/// owned by the sales subsystem; this core only inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PickupOrder {
    pub order_id: Uuid,
    #[validate(length(min = 1, message = "website code cannot be empty"))]
    pub website_code: String,
    pub pickup_location_code: Option<String>,
    #[validate]
    pub lines: Vec<OrderLine>,
}

impl PickupOrder {
    /// The designated pickup location, if the order uses in-store pickup.
    /// An empty code counts as no designation.
    pub fn pickup_location_code(&self) -> Option<&str> {
        self.pickup_location_code
            .as_deref()
            .filter(|code| !code.is_empty())
    }

    /// Rejects malformed input before any inventory mutation is attempted:
    /// empty sku or website code, negative ordered quantity.
    pub fn validate_for_evaluation(&self) -> Result<(), ServiceError> {
        self.validate()?;
        for line in &self.lines {
            if line.quantity_ordered.is_sign_negative() {
                return Err(ServiceError::ValidationError(format!(
                    "ordered quantity for sku {} cannot be negative",
                    line.sku
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order_with(lines: Vec<OrderLine>) -> PickupOrder {
        PickupOrder {
            order_id: Uuid::new_v4(),
            website_code: "base".into(),
            pickup_location_code: Some("store-1".into()),
            lines,
        }
    }

    #[test]
    fn empty_pickup_code_counts_as_absent() {
        let mut order = order_with(vec![]);
        order.pickup_location_code = Some(String::new());
        assert_eq!(order.pickup_location_code(), None);

        order.pickup_location_code = Some("store-1".into());
        assert_eq!(order.pickup_location_code(), Some("store-1"));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let order = order_with(vec![OrderLine {
            sku: "SKU-1".into(),
            quantity_ordered: dec!(-1),
            bundle_parent: false,
        }]);
        assert!(order.validate_for_evaluation().is_err());
    }

    #[test]
    fn empty_sku_is_rejected() {
        let order = order_with(vec![OrderLine {
            sku: String::new(),
            quantity_ordered: dec!(1),
            bundle_parent: false,
        }]);
        assert!(order.validate_for_evaluation().is_err());
    }
}
