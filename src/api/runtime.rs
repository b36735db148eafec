use axum::{
    Json,
    extract::{Path, State},
};
use sea_orm::DatabaseConnection;

use super::ApiResult;
use crate::services::{RuntimeView, navigation_service};

pub async fn open_book(
    State(db): State<DatabaseConnection>,
    Path(book_id): Path<i32>,
) -> ApiResult<Json<RuntimeView>> {
    Ok(Json(navigation_service::open_book(&db, book_id).await?))
}

pub async fn open_page(
    State(db): State<DatabaseConnection>,
    Path((book_id, page_id)): Path<(i32, i32)>,
) -> ApiResult<Json<RuntimeView>> {
    Ok(Json(
        navigation_service::open_page(&db, book_id, page_id).await?,
    ))
}
