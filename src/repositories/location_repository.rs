use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use sea_orm::JoinType;
use std::sync::Arc;

use crate::entities::{location, stock_location_link, website_stock};
use crate::errors::ServiceError;
use crate::repositories::BaseRepository;

/// A location assigned to a stock, paired with its fallback priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLocation {
    pub location_code: String,
    pub priority: i32,
}

/// Read access to location metadata and the website/stock mapping.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Fetch a location by code. A missing location is a configuration
    /// error, not an expected outcome.
    async fn get_location(&self, code: &str) -> Result<location::Model, ServiceError>;

    /// Enabled locations assigned to the stock, ordered by priority
    /// ascending with location code ascending as the deterministic
    /// tie-break among equal priorities.
    async fn list_enabled_for_stock(
        &self,
        stock_id: i64,
    ) -> Result<Vec<StockLocation>, ServiceError>;

    /// Resolve the stock an order's website draws from.
    async fn stock_id_for_website(&self, website_code: &str) -> Result<i64, ServiceError>;
}

/// Production implementation over sea-orm.
#[derive(Debug, Clone)]
pub struct SeaOrmLocationRepository {
    base: BaseRepository,
}

impl SeaOrmLocationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl LocationRepository for SeaOrmLocationRepository {
    async fn get_location(&self, code: &str) -> Result<location::Model, ServiceError> {
        location::Entity::find_by_id(code.to_string())
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Location {} not found", code)))
    }

    async fn list_enabled_for_stock(
        &self,
        stock_id: i64,
    ) -> Result<Vec<StockLocation>, ServiceError> {
        let links = stock_location_link::Entity::find()
            .filter(stock_location_link::Column::StockId.eq(stock_id))
            .join(
                JoinType::InnerJoin,
                stock_location_link::Relation::Location.def(),
            )
            .filter(location::Column::Enabled.eq(true))
            .order_by_asc(stock_location_link::Column::Priority)
            .order_by_asc(stock_location_link::Column::LocationCode)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::db_error)?;

        Ok(links
            .into_iter()
            .map(|link| StockLocation {
                location_code: link.location_code,
                priority: link.priority,
            })
            .collect())
    }

    async fn stock_id_for_website(&self, website_code: &str) -> Result<i64, ServiceError> {
        website_stock::Entity::find_by_id(website_code.to_string())
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::db_error)?
            .map(|row| row.stock_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "No stock assigned to website {}",
                    website_code
                ))
            })
    }
}
