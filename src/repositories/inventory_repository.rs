use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionError, TransactionTrait,
};
use std::sync::Arc;

use crate::entities::inventory_record::{self, Entity as InventoryRecord};
use crate::errors::ServiceError;
use crate::repositories::BaseRepository;

/// Read/write access to inventory records, abstract over the backing
/// store. The core never creates records; it only reads existing rows
/// and writes updated quantity/status back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Fetch the single record for a (sku, location) pair, if any.
    async fn find_record(
        &self,
        sku: &str,
        location_code: &str,
    ) -> Result<Option<inventory_record::Model>, ServiceError>;

    /// Persist updated quantity and status for the given records.
    ///
    /// All records are written in one logical transaction: a failure
    /// mid-way must leave none of the writes visible.
    async fn save_records(
        &self,
        records: &[inventory_record::Model],
    ) -> Result<(), ServiceError>;
}

/// Production implementation over sea-orm.
#[derive(Debug, Clone)]
pub struct SeaOrmInventoryRepository {
    base: BaseRepository,
}

impl SeaOrmInventoryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl InventoryRepository for SeaOrmInventoryRepository {
    async fn find_record(
        &self,
        sku: &str,
        location_code: &str,
    ) -> Result<Option<inventory_record::Model>, ServiceError> {
        InventoryRecord::find()
            .filter(inventory_record::Column::Sku.eq(sku))
            .filter(inventory_record::Column::LocationCode.eq(location_code))
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::db_error)
    }

    async fn save_records(
        &self,
        records: &[inventory_record::Model],
    ) -> Result<(), ServiceError> {
        let records = records.to_vec();
        self.base
            .get_db()
            .transaction::<_, (), ServiceError>(move |txn| {
                Box::pin(async move {
                    for record in records {
                        let mut active: inventory_record::ActiveModel = record.clone().into();
                        active.quantity = Set(record.quantity);
                        active.status = Set(record.status);
                        active.updated_at = Set(Utc::now());
                        active.update(txn).await.map_err(ServiceError::db_error)?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })
    }
}
