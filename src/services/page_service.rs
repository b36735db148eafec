//! Page Service - pages of a book and their grid dimensions
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::grid::{DEFAULT_DIMENSION, clamp_dimension};
use crate::domain::{DomainError, Grid, NewPage, PageUpdate, required};
use crate::models::page::{self, Entity as Page};
use crate::services::{book_service, placement_service};

/// Add a page at the end of a book
pub async fn create_page(
    db: &DatabaseConnection,
    book_id: i32,
    input: NewPage,
) -> Result<page::Model, DomainError> {
    let title = required("page title", &input.title)?;
    let txn = db.begin().await?;

    book_service::find_book(&txn, book_id).await?;
    let order = Page::find()
        .filter(page::Column::BookId.eq(book_id))
        .count(&txn)
        .await? as i32;

    let now = chrono::Utc::now().to_rfc3339();
    let new_page = page::ActiveModel {
        book_id: Set(book_id),
        title: Set(title),
        grid_cols: Set(clamp_dimension(input.grid_cols.unwrap_or(DEFAULT_DIMENSION))),
        grid_rows: Set(clamp_dimension(input.grid_rows.unwrap_or(DEFAULT_DIMENSION))),
        order: Set(order),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let saved = new_page.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        "Page {} '{}' added to book {} ({}x{}, order {})",
        saved.id,
        saved.title,
        book_id,
        saved.grid_rows,
        saved.grid_cols,
        saved.order
    );
    Ok(saved)
}

/// Get a page, checking that it belongs to `book_id`
pub async fn get_page(
    db: &DatabaseConnection,
    book_id: i32,
    page_id: i32,
) -> Result<page::Model, DomainError> {
    find_page_in_book(db, book_id, page_id).await
}

/// Pages of a book in display order
pub async fn list_pages(
    db: &DatabaseConnection,
    book_id: i32,
) -> Result<Vec<page::Model>, DomainError> {
    book_service::find_book(db, book_id).await?;
    pages_of_book(db, book_id).await
}

/// Rename, resize or reorder a page.
///
/// Dimensions are clamped to the allowed range. Shrinking is refused while a
/// card still sits outside the new grid.
pub async fn update_page(
    db: &DatabaseConnection,
    page_id: i32,
    input: PageUpdate,
) -> Result<page::Model, DomainError> {
    let title = required("page title", &input.title)?;
    let txn = db.begin().await?;

    let page = find_page(&txn, page_id).await?;
    let grid = Grid::new(
        input.grid_rows.unwrap_or(page.grid_rows),
        input.grid_cols.unwrap_or(page.grid_cols),
    );

    let cards = placement_service::cards_on_page(&txn, page_id).await?;
    if let Some(stranded) = cards.iter().find(|c| !grid.contains(c.slot())) {
        tracing::warn!(
            "Refused to resize page {} to {}x{}: card {} sits at ({}, {})",
            page_id,
            grid.rows(),
            grid.cols(),
            stranded.id,
            stranded.slot_row,
            stranded.slot_col
        );
        return Err(DomainError::out_of_bounds(
            stranded.slot(),
            grid.rows(),
            grid.cols(),
        ));
    }

    let order = input.order.unwrap_or(page.order);
    let mut active: page::ActiveModel = page.into();
    active.title = Set(title);
    active.grid_rows = Set(grid.rows());
    active.grid_cols = Set(grid.cols());
    active.order = Set(order);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!("Page {} '{}' updated", updated.id, updated.title);
    Ok(updated)
}

pub(crate) async fn find_page<C: ConnectionTrait>(
    db: &C,
    page_id: i32,
) -> Result<page::Model, DomainError> {
    Page::find_by_id(page_id)
        .one(db)
        .await?
        .ok_or(DomainError::not_found("page", page_id))
}

pub(crate) async fn find_page_in_book<C: ConnectionTrait>(
    db: &C,
    book_id: i32,
    page_id: i32,
) -> Result<page::Model, DomainError> {
    Page::find_by_id(page_id)
        .filter(page::Column::BookId.eq(book_id))
        .one(db)
        .await?
        .ok_or(DomainError::not_found("page", page_id))
}

pub(crate) async fn pages_of_book<C: ConnectionTrait>(
    db: &C,
    book_id: i32,
) -> Result<Vec<page::Model>, DomainError> {
    let pages = Page::find()
        .filter(page::Column::BookId.eq(book_id))
        .order_by_asc(page::Column::Order)
        .order_by_asc(page::Column::Id)
        .all(db)
        .await?;
    Ok(pages)
}
