use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::services::asset_service::normalize_url;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// e.g. `image`
    pub kind: String,
    /// As supplied by the uploader; see `AssetDto::normalized_url`
    pub url: String,
    pub alt: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::card::Entity")]
    Cards,
}

impl Related<super::card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cards.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDto {
    pub id: i32,
    pub kind: String,
    pub url: String,
    pub normalized_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    pub created_at: String,
}

impl From<Model> for AssetDto {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            kind: model.kind,
            normalized_url: normalize_url(&model.url),
            url: model.url,
            alt: model.alt,
            created_at: model.created_at,
        }
    }
}
