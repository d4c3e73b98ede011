use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per logical blob (`tiles`, `color_meanings`). The whole collection
/// lives in `value`; there is no per-tile row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)] // `key` is not auto-incrementing
    pub key: String,
    #[sea_orm(column_type = "Json")]
    pub value: Json, // SeaORM maps Json to serde_json::Value
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
