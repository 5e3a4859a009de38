use lazy_static::lazy_static;
use prometheus::IntCounter;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{OrderLine, PickupOrder};
use crate::repositories::{InventoryRepository, LocationRepository};
use crate::services::{
    quantity, DefaultLocationResolver, EvaluationContext, ItemAvailabilityChecker,
    QuantityRebalancer,
};

lazy_static! {
    static ref EVALUATIONS: IntCounter = IntCounter::new(
        "fulfillability_evaluations_total",
        "Total number of pickup fulfillability evaluations"
    )
    .expect("metric can be created");
    static ref VERDICT_UPGRADES: IntCounter = IntCounter::new(
        "fulfillability_verdict_upgrades_total",
        "Evaluations that upgraded a negative upstream verdict"
    )
    .expect("metric can be created");
}

/// Decides whether an order designating an in-store pickup location is
/// fulfillable, borrowing shortfalls from the stock's default location
/// where needed.
///
/// A `true` upstream verdict passes through untouched; a `false` one is
/// re-checked against the pickup location, item by item, with a
/// best-effort rebalance before each item's final verdict.
#[derive(Clone)]
pub struct FulfillabilityEvaluator {
    locations: Arc<dyn LocationRepository>,
    resolver: DefaultLocationResolver,
    checker: ItemAvailabilityChecker,
    rebalancer: QuantityRebalancer,
    event_sender: EventSender,
}

impl FulfillabilityEvaluator {
    pub fn new(
        inventory: Arc<dyn InventoryRepository>,
        locations: Arc<dyn LocationRepository>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            resolver: DefaultLocationResolver::new(locations.clone()),
            checker: ItemAvailabilityChecker::new(inventory.clone(), locations.clone()),
            rebalancer: QuantityRebalancer::new(inventory, event_sender.clone()),
            locations,
            event_sender,
        }
    }

    /// Evaluate without a deadline.
    pub async fn evaluate(
        &self,
        order: &PickupOrder,
        upstream_verdict: bool,
    ) -> Result<bool, ServiceError> {
        let mut ctx = EvaluationContext::new();
        self.evaluate_with_context(order, upstream_verdict, &mut ctx)
            .await
    }

    /// Evaluate with a wall-clock budget; exceeding it aborts the run
    /// with `EvaluationAborted`.
    pub async fn evaluate_with_timeout(
        &self,
        order: &PickupOrder,
        upstream_verdict: bool,
        timeout: Duration,
    ) -> Result<bool, ServiceError> {
        let mut ctx = EvaluationContext::with_deadline(Instant::now() + timeout);
        self.evaluate_with_context(order, upstream_verdict, &mut ctx)
            .await
    }

    #[instrument(skip(self, order, ctx), fields(order_id = %order.order_id, upstream = upstream_verdict))]
    pub async fn evaluate_with_context(
        &self,
        order: &PickupOrder,
        upstream_verdict: bool,
        ctx: &mut EvaluationContext,
    ) -> Result<bool, ServiceError> {
        EVALUATIONS.inc();

        // An already-positive verdict is never re-litigated here.
        if upstream_verdict {
            return Ok(true);
        }

        // Without a pickup designation this core has no say.
        let Some(pickup_code) = order.pickup_location_code() else {
            return Ok(upstream_verdict);
        };

        order.validate_for_evaluation()?;

        ctx.check_deadline()?;
        let stock_id = self
            .locations
            .stock_id_for_website(&order.website_code)
            .await?;
        let fallback_code = self.resolver.resolve(stock_id, ctx).await?;

        for line in order.lines.iter().filter(|line| !line.bundle_parent) {
            let fulfillable = self
                .evaluate_line(line, pickup_code, &fallback_code, ctx)
                .await?;
            if !fulfillable {
                // First failing item decides; remaining items are not
                // evaluated.
                info!(sku = %line.sku, "Item not fulfillable at pickup location");
                self.emit_verdict(order, false).await?;
                return Ok(false);
            }
        }

        VERDICT_UPGRADES.inc();
        self.emit_verdict(order, true).await?;
        Ok(true)
    }

    /// One leaf item's verdict: the direct availability check, or a
    /// best-effort rebalance when the pickup location is enabled but
    /// genuinely under-stocked.
    async fn evaluate_line(
        &self,
        line: &OrderLine,
        pickup_code: &str,
        fallback_code: &str,
        ctx: &EvaluationContext,
    ) -> Result<bool, ServiceError> {
        let availability = self
            .checker
            .check(&line.sku, pickup_code, line.quantity_ordered, ctx)
            .await?;
        if availability.fulfillable {
            return Ok(true);
        }

        let Some(record) = availability.record else {
            return Ok(false);
        };
        if !availability.location_enabled {
            return Ok(false);
        }
        if quantity::is_sufficient(record.quantity, line.quantity_ordered) {
            // Quantity already covers the line; the check failed on
            // status alone, and there is nothing to transfer.
            return Ok(false);
        }

        self.rebalancer
            .rebalance(
                &line.sku,
                &record,
                fallback_code,
                line.quantity_ordered,
                ctx,
            )
            .await
    }

    async fn emit_verdict(
        &self,
        order: &PickupOrder,
        fulfillable: bool,
    ) -> Result<(), ServiceError> {
        self.event_sender
            .send(Event::FulfillabilityEvaluated {
                order_id: order.order_id,
                fulfillable,
            })
            .await
            .map_err(ServiceError::EventError)
    }
}
