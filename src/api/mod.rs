pub mod assets;
pub mod books;
pub mod cards;
pub mod health;
pub mod pages;
pub mod runtime;

use axum::{
    Json, Router,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::domain::DomainError;

pub fn api_router(db: DatabaseConnection) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:book_id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/books/:book_id/home", get(books::get_home_page))
        // Pages
        .route(
            "/books/:book_id/pages",
            get(pages::list_pages).post(pages::create_page),
        )
        .route(
            "/books/:book_id/pages/:page_id",
            get(pages::get_page)
                .put(pages::update_page)
                .delete(pages::delete_page),
        )
        .route(
            "/books/:book_id/pages/:page_id/home",
            post(pages::set_home_page),
        )
        .route("/books/:book_id/pages/:page_id/grid", get(pages::page_grid))
        .route(
            "/books/:book_id/pages/:page_id/free-slot",
            get(pages::free_slot),
        )
        // Cards
        .route(
            "/books/:book_id/pages/:page_id/cards",
            get(cards::list_cards).post(cards::create_card),
        )
        .route(
            "/cards/:card_id",
            get(cards::get_card)
                .put(cards::update_card)
                .delete(cards::delete_card),
        )
        .route("/cards/:card_id/move", post(cards::move_card))
        // Assets
        .route("/assets", get(assets::list_assets).post(assets::create_asset))
        .route(
            "/assets/:asset_id",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/assets/:asset_id/usage", get(assets::asset_usage))
        .route("/normalize-url", get(assets::normalize_asset_url))
        // Runtime (end-user mode)
        .route("/runtime/books/:book_id", get(runtime::open_book))
        .route(
            "/runtime/books/:book_id/pages/:page_id",
            get(runtime::open_page),
        )
        .with_state(db)
}

/// HTTP face of a `DomainError`
#[derive(Debug)]
pub struct ApiError(pub DomainError);

pub type ApiResult<T> = Result<T, ApiError>;

/// JSON body extractor whose rejections use the API error format
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        ApiError(DomainError::Validation(rejection.body_text()))
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError(e)
    }
}

pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::NotFound { .. } | DomainError::AssetNotFound(_) => StatusCode::NOT_FOUND,
        DomainError::OutOfBounds { .. }
        | DomainError::InvalidTarget(_)
        | DomainError::CrossBookReference { .. } => StatusCode::BAD_REQUEST,
        DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::PositionOccupied { .. }
        | DomainError::GridFull { .. }
        | DomainError::AssetInUse { .. } => StatusCode::CONFLICT,
        DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        (
            status,
            Json(json!({
                "error": self.0.kind(),
                "message": self.0.to_string(),
            })),
        )
            .into_response()
    }
}
