use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ApiJson, ApiResult};
use crate::domain::{BookUpdate, NewBook};
use crate::models::{book, page};
use crate::services::{DeletionReport, book_service, navigation_service};

#[derive(Deserialize)]
pub struct BookQuery {
    pub q: Option<String>,
}

pub async fn list_books(
    State(db): State<DatabaseConnection>,
    Query(query): Query<BookQuery>,
) -> ApiResult<Json<Value>> {
    let books = book_service::list_books(&db, query.q.as_deref()).await?;

    Ok(Json(json!({
        "total": books.len(),
        "books": books,
    })))
}

pub async fn create_book(
    State(db): State<DatabaseConnection>,
    ApiJson(input): ApiJson<NewBook>,
) -> ApiResult<(StatusCode, Json<book::Model>)> {
    let book = book_service::create_book(&db, input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn get_book(
    State(db): State<DatabaseConnection>,
    Path(book_id): Path<i32>,
) -> ApiResult<Json<book::Model>> {
    Ok(Json(book_service::get_book(&db, book_id).await?))
}

pub async fn update_book(
    State(db): State<DatabaseConnection>,
    Path(book_id): Path<i32>,
    ApiJson(input): ApiJson<BookUpdate>,
) -> ApiResult<Json<book::Model>> {
    Ok(Json(book_service::update_book(&db, book_id, input).await?))
}

pub async fn delete_book(
    State(db): State<DatabaseConnection>,
    Path(book_id): Path<i32>,
) -> ApiResult<Json<DeletionReport>> {
    Ok(Json(book_service::delete_book(&db, book_id).await?))
}

pub async fn get_home_page(
    State(db): State<DatabaseConnection>,
    Path(book_id): Path<i32>,
) -> ApiResult<Json<page::Model>> {
    Ok(Json(navigation_service::home_page(&db, book_id).await?))
}
