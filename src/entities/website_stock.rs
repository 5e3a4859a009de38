use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Maps a sales website to the stock its orders draw from.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "website_stocks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub website_code: String,
    pub stock_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
