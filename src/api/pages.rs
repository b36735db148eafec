use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::DatabaseConnection;

use super::{ApiJson, ApiResult};
use crate::domain::{NewPage, PageUpdate, Slot};
use crate::models::{book, card, page};
use crate::services::{
    DeletionReport, book_service, navigation_service, page_service, placement_service,
};

pub async fn list_pages(
    State(db): State<DatabaseConnection>,
    Path(book_id): Path<i32>,
) -> ApiResult<Json<Vec<page::Model>>> {
    Ok(Json(page_service::list_pages(&db, book_id).await?))
}

pub async fn create_page(
    State(db): State<DatabaseConnection>,
    Path(book_id): Path<i32>,
    ApiJson(input): ApiJson<NewPage>,
) -> ApiResult<(StatusCode, Json<page::Model>)> {
    let page = page_service::create_page(&db, book_id, input).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

pub async fn get_page(
    State(db): State<DatabaseConnection>,
    Path((book_id, page_id)): Path<(i32, i32)>,
) -> ApiResult<Json<page::Model>> {
    Ok(Json(page_service::get_page(&db, book_id, page_id).await?))
}

pub async fn update_page(
    State(db): State<DatabaseConnection>,
    Path((book_id, page_id)): Path<(i32, i32)>,
    ApiJson(input): ApiJson<PageUpdate>,
) -> ApiResult<Json<page::Model>> {
    page_service::get_page(&db, book_id, page_id).await?;
    Ok(Json(page_service::update_page(&db, page_id, input).await?))
}

pub async fn delete_page(
    State(db): State<DatabaseConnection>,
    Path((book_id, page_id)): Path<(i32, i32)>,
) -> ApiResult<Json<DeletionReport>> {
    page_service::get_page(&db, book_id, page_id).await?;
    Ok(Json(book_service::delete_page(&db, page_id).await?))
}

pub async fn set_home_page(
    State(db): State<DatabaseConnection>,
    Path((book_id, page_id)): Path<(i32, i32)>,
) -> ApiResult<Json<book::Model>> {
    Ok(Json(
        navigation_service::set_home_page(&db, book_id, page_id).await?,
    ))
}

pub async fn page_grid(
    State(db): State<DatabaseConnection>,
    Path((book_id, page_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Vec<Vec<Option<card::Model>>>>> {
    page_service::get_page(&db, book_id, page_id).await?;
    Ok(Json(placement_service::page_grid(&db, page_id).await?))
}

pub async fn free_slot(
    State(db): State<DatabaseConnection>,
    Path((book_id, page_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Slot>> {
    page_service::get_page(&db, book_id, page_id).await?;
    Ok(Json(placement_service::suggest_slot(&db, page_id).await?))
}
