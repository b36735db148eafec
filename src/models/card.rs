use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{ActionType, Slot};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub page_id: i32,
    /// 0-indexed, unique per page together with `slot_col`
    pub slot_row: i32,
    pub slot_col: i32,
    pub row_span: i32,
    pub col_span: i32,
    pub label: String,
    pub background_color: String,
    pub border_color: String,
    /// `none` or `navigation`
    pub action_type: String,
    pub image_id: Option<i32>,
    pub target_page_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::page::Entity",
        from = "Column::PageId",
        to = "super::page::Column::Id"
    )]
    Page,
    #[sea_orm(
        belongs_to = "super::page::Entity",
        from = "Column::TargetPageId",
        to = "super::page::Column::Id"
    )]
    TargetPage,
    #[sea_orm(
        belongs_to = "super::asset::Entity",
        from = "Column::ImageId",
        to = "super::asset::Column::Id"
    )]
    Image,
}

impl Related<super::page::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Page.def()
    }
}

impl Related<super::asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Image.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn slot(&self) -> Slot {
        Slot::new(self.slot_row, self.slot_col)
    }

    /// Stored action, with anything unrecognised treated as inert
    pub fn action(&self) -> ActionType {
        self.action_type.parse().unwrap_or_default()
    }

    pub fn is_navigation(&self) -> bool {
        self.action() == ActionType::Navigation
    }
}
