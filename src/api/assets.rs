use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ApiJson, ApiResult};
use crate::domain::{AssetFilter, AssetUpdate, NewAsset};
use crate::models::AssetDto;
use crate::services::asset_service;

#[derive(Deserialize)]
pub struct NormalizeQuery {
    pub url: String,
}

pub async fn list_assets(
    State(db): State<DatabaseConnection>,
    Query(filter): Query<AssetFilter>,
) -> ApiResult<Json<Vec<AssetDto>>> {
    Ok(Json(asset_service::list_assets(&db, &filter).await?))
}

pub async fn create_asset(
    State(db): State<DatabaseConnection>,
    ApiJson(input): ApiJson<NewAsset>,
) -> ApiResult<(StatusCode, Json<AssetDto>)> {
    let asset = asset_service::create_asset(&db, input).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

pub async fn get_asset(
    State(db): State<DatabaseConnection>,
    Path(asset_id): Path<i32>,
) -> ApiResult<Json<AssetDto>> {
    Ok(Json(asset_service::get_asset(&db, asset_id).await?))
}

pub async fn update_asset(
    State(db): State<DatabaseConnection>,
    Path(asset_id): Path<i32>,
    ApiJson(input): ApiJson<AssetUpdate>,
) -> ApiResult<Json<AssetDto>> {
    Ok(Json(asset_service::update_asset(&db, asset_id, input).await?))
}

pub async fn asset_usage(
    State(db): State<DatabaseConnection>,
    Path(asset_id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let cards = asset_service::asset_usage(&db, asset_id).await?;
    Ok(Json(json!({ "asset_id": asset_id, "cards": cards })))
}

pub async fn delete_asset(
    State(db): State<DatabaseConnection>,
    Path(asset_id): Path<i32>,
) -> ApiResult<Json<Value>> {
    asset_service::delete_asset(&db, asset_id).await?;
    Ok(Json(json!({ "deleted": asset_id })))
}

pub async fn normalize_asset_url(Query(query): Query<NormalizeQuery>) -> Json<Value> {
    Json(json!({ "url": asset_service::normalize_url(&query.url) }))
}
