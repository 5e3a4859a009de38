use dashmap::DashMap;
use lazy_static::lazy_static;
use prometheus::IntCounter;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use crate::entities::inventory_record::{self, StockStatus};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::repositories::InventoryRepository;
use crate::services::{quantity, EvaluationContext};

lazy_static! {
    static ref REBALANCE_ATTEMPTS: IntCounter = IntCounter::new(
        "inventory_rebalance_attempts_total",
        "Total number of attempted cross-location rebalances"
    )
    .expect("metric can be created");
    static ref REBALANCE_SUCCESSES: IntCounter = IntCounter::new(
        "inventory_rebalance_successes_total",
        "Total number of committed cross-location rebalances"
    )
    .expect("metric can be created");
    static ref REBALANCE_FAILURES: IntCounter = IntCounter::new(
        "inventory_rebalance_failures_total",
        "Total number of rebalances that failed with an error"
    )
    .expect("metric can be created");
}

/// Moves a shortfall from the stock's fallback location to the pickup
/// (target) location so an under-stocked item can still be fulfilled.
///
/// Rebalances for the same sku are serialized through a per-sku mutex,
/// and both mutated records are persisted through a single
/// `save_records` call, so concurrent evaluations can never over-deplete
/// the fallback below zero.
#[derive(Clone)]
pub struct QuantityRebalancer {
    inventory: Arc<dyn InventoryRepository>,
    event_sender: EventSender,
    sku_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl QuantityRebalancer {
    pub fn new(inventory: Arc<dyn InventoryRepository>, event_sender: EventSender) -> Self {
        Self {
            inventory,
            event_sender,
            sku_locks: Arc::new(DashMap::new()),
        }
    }

    fn sku_lock(&self, sku: &str) -> Arc<Mutex<()>> {
        self.sku_locks
            .entry(sku.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Attempt to cover `required_qty` at the target by transferring the
    /// shortfall from the fallback location.
    ///
    /// `Ok(false)` is the expected "not enough stock" outcome and leaves
    /// both records untouched. Errors are reserved for misuse (the target
    /// is not actually under-stocked), storage failures and aborted
    /// evaluations.
    #[instrument(
        skip(self, target, ctx),
        fields(sku = %sku, fallback = %fallback_location_code, required = %required_qty)
    )]
    pub async fn rebalance(
        &self,
        sku: &str,
        target: &inventory_record::Model,
        fallback_location_code: &str,
        required_qty: Decimal,
        ctx: &EvaluationContext,
    ) -> Result<bool, ServiceError> {
        REBALANCE_ATTEMPTS.inc();

        if sku.is_empty() || fallback_location_code.is_empty() {
            REBALANCE_FAILURES.inc();
            return Err(ServiceError::ValidationError(
                "sku and fallback location code cannot be empty".to_string(),
            ));
        }

        // Caller contract: only invoked for an under-stocked target.
        if quantity::is_sufficient(target.quantity, required_qty) {
            REBALANCE_FAILURES.inc();
            return Err(ServiceError::ValidationError(format!(
                "target {} at {} is not under-stocked (quantity {}, required {})",
                sku, target.location_code, target.quantity, required_qty
            )));
        }

        let lock = self.sku_lock(sku);
        let _guard = lock.lock().await;
        ctx.check_deadline()?;

        // Re-read the target under the lock: a concurrent rebalance for
        // this sku may have topped it up since the caller's check.
        let Some(target) = self
            .inventory
            .find_record(sku, &target.location_code)
            .await?
        else {
            warn!("target record disappeared before rebalance");
            return Ok(false);
        };
        if quantity::is_sufficient(target.quantity, required_qty) {
            return Ok(target.status == StockStatus::InStock);
        }
        let shortfall = required_qty - target.quantity;

        ctx.check_deadline()?;
        let Some(fallback) = self
            .inventory
            .find_record(sku, fallback_location_code)
            .await?
        else {
            return Ok(false);
        };

        if fallback.status != StockStatus::InStock
            || !quantity::is_sufficient(fallback.quantity, shortfall)
        {
            return Ok(false);
        }

        let remaining = fallback.quantity - shortfall;
        if remaining.is_sign_negative() {
            // The 4-digit comparison truncates, so a sub-scale remainder
            // can still be negative; such a transfer must not happen.
            return Ok(false);
        }

        let mut updated_target = target.clone();
        updated_target.quantity = target.quantity + shortfall;
        updated_target.status = StockStatus::InStock;

        let mut updated_fallback = fallback.clone();
        updated_fallback.quantity = remaining;
        if remaining.is_zero() {
            updated_fallback.status = StockStatus::OutOfStock;
        }

        ctx.check_deadline()?;
        self.inventory
            .save_records(&[updated_target, updated_fallback])
            .await
            .map_err(|e| {
                REBALANCE_FAILURES.inc();
                error!(error = %e, "Failed to persist rebalance");
                e
            })?;

        self.event_sender
            .send(Event::InventoryRebalanced {
                sku: sku.to_string(),
                from_location: fallback_location_code.to_string(),
                to_location: target.location_code.clone(),
                quantity: shortfall,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(
            shortfall = %shortfall,
            fallback_remaining = %remaining,
            "Shortfall covered from fallback location"
        );
        REBALANCE_SUCCESSES.inc();

        Ok(true)
    }
}
