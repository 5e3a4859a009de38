use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Events emitted by the fulfillability core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// A shortfall was covered by moving quantity between locations.
    InventoryRebalanced {
        sku: String,
        from_location: String,
        to_location: String,
        quantity: Decimal,
    },
    /// An order's fulfillability verdict was decided.
    FulfillabilityEvaluated {
        order_id: Uuid,
        fulfillable: bool,
    },
}

/// Cloneable handle for emitting events from services.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Spawn alongside the
/// evaluator; callers wanting richer routing replace this consumer.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::InventoryRebalanced {
                sku,
                from_location,
                to_location,
                quantity,
            } => {
                info!(
                    sku = %sku,
                    from_location = %from_location,
                    to_location = %to_location,
                    quantity = %quantity,
                    "Inventory rebalanced"
                );
            }
            Event::FulfillabilityEvaluated {
                order_id,
                fulfillable,
            } => {
                info!(order_id = %order_id, fulfillable = %fulfillable, "Order fulfillability evaluated");
            }
        }
    }
}
