use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ApiJson, ApiResult};
use crate::domain::{ActionType, CardAttrs, DomainError, MoveOutcome, Slot};
use crate::models::card;
use crate::services::{book_service, page_service, placement_service};

/// Body of card create and edit requests
#[derive(Deserialize)]
pub struct CardRequest {
    pub slot_row: i32,
    pub slot_col: i32,
    pub label: String,
    #[serde(default)]
    pub row_span: Option<i32>,
    #[serde(default)]
    pub col_span: Option<i32>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub border_color: Option<String>,
    /// `none`, `navigation` or empty
    #[serde(default)]
    pub action_type: String,
    #[serde(default)]
    pub image_id: Option<i32>,
    #[serde(default)]
    pub target_page_id: Option<i32>,
}

impl CardRequest {
    fn into_parts(self) -> Result<(Slot, CardAttrs), DomainError> {
        let action_type: ActionType = self.action_type.trim().parse()?;
        let attrs = CardAttrs {
            label: self.label,
            row_span: self.row_span,
            col_span: self.col_span,
            background_color: self.background_color,
            border_color: self.border_color,
            action_type,
            image_id: self.image_id,
            target_page_id: self.target_page_id,
        };
        Ok((Slot::new(self.slot_row, self.slot_col), attrs))
    }
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub slot_row: i32,
    pub slot_col: i32,
}

pub async fn list_cards(
    State(db): State<DatabaseConnection>,
    Path((book_id, page_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Vec<card::Model>>> {
    page_service::get_page(&db, book_id, page_id).await?;
    Ok(Json(placement_service::list_cards(&db, page_id).await?))
}

pub async fn create_card(
    State(db): State<DatabaseConnection>,
    Path((book_id, page_id)): Path<(i32, i32)>,
    ApiJson(request): ApiJson<CardRequest>,
) -> ApiResult<(StatusCode, Json<card::Model>)> {
    page_service::get_page(&db, book_id, page_id).await?;

    let (slot, attrs) = request.into_parts()?;
    let card = placement_service::create_card(&db, page_id, slot, attrs).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn get_card(
    State(db): State<DatabaseConnection>,
    Path(card_id): Path<i32>,
) -> ApiResult<Json<card::Model>> {
    Ok(Json(placement_service::get_card(&db, card_id).await?))
}

pub async fn update_card(
    State(db): State<DatabaseConnection>,
    Path(card_id): Path<i32>,
    ApiJson(request): ApiJson<CardRequest>,
) -> ApiResult<Json<card::Model>> {
    let (slot, attrs) = request.into_parts()?;
    Ok(Json(
        placement_service::update_card(&db, card_id, slot, attrs).await?,
    ))
}

pub async fn move_card(
    State(db): State<DatabaseConnection>,
    Path(card_id): Path<i32>,
    ApiJson(request): ApiJson<MoveRequest>,
) -> ApiResult<Json<MoveOutcome>> {
    let slot = Slot::new(request.slot_row, request.slot_col);
    Ok(Json(placement_service::move_card(&db, card_id, slot).await?))
}

pub async fn delete_card(
    State(db): State<DatabaseConnection>,
    Path(card_id): Path<i32>,
) -> ApiResult<Json<Value>> {
    book_service::delete_card(&db, card_id).await?;
    Ok(Json(json!({ "deleted": card_id })))
}
