#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};

use pickup_fulfillment::entities::inventory_record::{self, StockStatus};
use pickup_fulfillment::entities::location;
use pickup_fulfillment::errors::ServiceError;
use pickup_fulfillment::events::{Event, EventSender};
use pickup_fulfillment::repositories::{
    InventoryRepository, LocationRepository, StockLocation,
};
use pickup_fulfillment::FulfillabilityEvaluator;

/// In-memory inventory store recording every fetch and save, so tests
/// can assert on short-circuiting and no-mutation guarantees.
pub struct InMemoryInventory {
    records: RwLock<HashMap<(String, String), inventory_record::Model>>,
    next_id: AtomicI64,
    pub find_calls: AtomicUsize,
    pub save_calls: AtomicUsize,
    pub fetched_skus: Mutex<Vec<String>>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            find_calls: AtomicUsize::new(0),
            save_calls: AtomicUsize::new(0),
            fetched_skus: Mutex::new(Vec::new()),
        }
    }

    pub async fn seed(&self, sku: &str, location_code: &str, quantity: Decimal, status: StockStatus) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let model = inventory_record::Model {
            id,
            sku: sku.to_string(),
            location_code: location_code.to_string(),
            quantity,
            status,
            updated_at: Utc::now(),
        };
        self.records
            .write()
            .await
            .insert((sku.to_string(), location_code.to_string()), model);
    }

    pub async fn get(&self, sku: &str, location_code: &str) -> Option<inventory_record::Model> {
        self.records
            .read()
            .await
            .get(&(sku.to_string(), location_code.to_string()))
            .cloned()
    }

    pub fn find_count(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InventoryRepository for InMemoryInventory {
    async fn find_record(
        &self,
        sku: &str,
        location_code: &str,
    ) -> Result<Option<inventory_record::Model>, ServiceError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.fetched_skus.lock().await.push(sku.to_string());
        Ok(self.get(sku, location_code).await)
    }

    async fn save_records(
        &self,
        records: &[inventory_record::Model],
    ) -> Result<(), ServiceError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        let mut store = self.records.write().await;
        for record in records {
            store.insert(
                (record.sku.clone(), record.location_code.clone()),
                record.clone(),
            );
        }
        Ok(())
    }
}

/// In-memory location metadata with the same deterministic ordering
/// contract as the sea-orm repository.
pub struct InMemoryLocations {
    locations: RwLock<HashMap<String, location::Model>>,
    links: RwLock<Vec<(i64, String, i32)>>,
    websites: RwLock<HashMap<String, i64>>,
    pub list_calls: AtomicUsize,
}

impl InMemoryLocations {
    pub fn new() -> Self {
        Self {
            locations: RwLock::new(HashMap::new()),
            links: RwLock::new(Vec::new()),
            websites: RwLock::new(HashMap::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub async fn seed_location(&self, code: &str, enabled: bool) {
        self.locations.write().await.insert(
            code.to_string(),
            location::Model {
                code: code.to_string(),
                name: code.to_string(),
                enabled,
            },
        );
    }

    pub async fn seed_link(&self, stock_id: i64, location_code: &str, priority: i32) {
        self.links
            .write()
            .await
            .push((stock_id, location_code.to_string(), priority));
    }

    pub async fn seed_website(&self, website_code: &str, stock_id: i64) {
        self.websites
            .write()
            .await
            .insert(website_code.to_string(), stock_id);
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocations {
    async fn get_location(&self, code: &str) -> Result<location::Model, ServiceError> {
        self.locations
            .read()
            .await
            .get(code)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("Location {} not found", code)))
    }

    async fn list_enabled_for_stock(
        &self,
        stock_id: i64,
    ) -> Result<Vec<StockLocation>, ServiceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let locations = self.locations.read().await;
        let mut candidates: Vec<StockLocation> = self
            .links
            .read()
            .await
            .iter()
            .filter(|(id, code, _)| {
                *id == stock_id && locations.get(code).map(|l| l.enabled).unwrap_or(false)
            })
            .map(|(_, code, priority)| StockLocation {
                location_code: code.clone(),
                priority: *priority,
            })
            .collect();
        candidates.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.location_code.cmp(&b.location_code))
        });
        Ok(candidates)
    }

    async fn stock_id_for_website(&self, website_code: &str) -> Result<i64, ServiceError> {
        self.websites
            .read()
            .await
            .get(website_code)
            .copied()
            .ok_or_else(|| {
                ServiceError::NotFound(format!("No stock assigned to website {}", website_code))
            })
    }
}

/// Harness bundling the evaluator with its in-memory collaborators.
pub struct TestHarness {
    pub inventory: Arc<InMemoryInventory>,
    pub locations: Arc<InMemoryLocations>,
    pub evaluator: FulfillabilityEvaluator,
    pub event_sender: EventSender,
    pub events: mpsc::Receiver<Event>,
}

impl TestHarness {
    pub fn new() -> Self {
        let inventory = Arc::new(InMemoryInventory::new());
        let locations = Arc::new(InMemoryLocations::new());
        let (tx, rx) = mpsc::channel(64);
        let event_sender = EventSender::new(tx);
        let evaluator = FulfillabilityEvaluator::new(
            inventory.clone(),
            locations.clone(),
            event_sender.clone(),
        );
        Self {
            inventory,
            locations,
            evaluator,
            event_sender,
            events: rx,
        }
    }

    /// One website ("base") on stock 1, an enabled pickup store and an
    /// enabled fallback warehouse at priority 1.
    pub async fn with_standard_topology() -> Self {
        let harness = Self::new();
        harness.locations.seed_location("store-1", true).await;
        harness.locations.seed_location("warehouse-1", true).await;
        harness.locations.seed_link(1, "warehouse-1", 1).await;
        harness.locations.seed_website("base", 1).await;
        harness
    }
}
