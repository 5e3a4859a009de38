use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A named inventory source. Disabled locations never fulfill and are
/// never picked as a stock's default.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub name: String,
    pub enabled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inventory_record::Entity")]
    InventoryRecords,
    #[sea_orm(has_many = "super::stock_location_link::Entity")]
    StockLinks,
}

impl Related<super::inventory_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryRecords.def()
    }
}

impl Related<super::stock_location_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
