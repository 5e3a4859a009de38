use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub mod inventory_repository;
pub mod location_repository;

pub use inventory_repository::{InventoryRepository, SeaOrmInventoryRepository};
pub use location_repository::{LocationRepository, SeaOrmLocationRepository, StockLocation};

/// Shared base for sea-orm backed repositories.
#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}
