//! Book Service - books and the ownership rules across Book -> Page -> Card
//!
//! Pages and cards have no life of their own: deleting an owner removes
//! everything below it. The cascades are spelled out here, children first,
//! inside one transaction, so a failure leaves the store untouched.
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;

use crate::domain::{BookUpdate, DEFAULT_LOCALE, DomainError, NewBook, required};
use crate::models::book::{self, Entity as Book};
use crate::models::card::{self, Entity as Card};
use crate::models::page::{self, Entity as Page};
use crate::services::{page_service, placement_service};

/// What a cascading delete removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    pub pages: u64,
    pub cards: u64,
}

/// Create a book
pub async fn create_book(db: &DatabaseConnection, input: NewBook) -> Result<book::Model, DomainError> {
    let title = required("book title", &input.title)?;
    let locale = input
        .locale
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
    let now = chrono::Utc::now().to_rfc3339();

    let new_book = book::ActiveModel {
        title: Set(title),
        locale: Set(locale),
        home_page_id: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let saved = new_book.insert(db).await?;
    tracing::info!("Book {} '{}' created", saved.id, saved.title);
    Ok(saved)
}

/// Get a single book by ID
pub async fn get_book(db: &DatabaseConnection, book_id: i32) -> Result<book::Model, DomainError> {
    find_book(db, book_id).await
}

/// List books, optionally filtered by a case-insensitive title fragment
pub async fn list_books(
    db: &DatabaseConnection,
    search: Option<&str>,
) -> Result<Vec<book::Model>, DomainError> {
    let mut books = Book::find()
        .order_by_asc(book::Column::Id)
        .all(db)
        .await?;

    // SQLite LIKE only folds ASCII, so the title match runs here
    if let Some(q) = search.map(|q| q.trim().to_lowercase())
        && !q.is_empty()
    {
        books.retain(|b| b.title.to_lowercase().contains(&q));
    }

    Ok(books)
}

/// Rename a book or change its locale
pub async fn update_book(
    db: &DatabaseConnection,
    book_id: i32,
    input: BookUpdate,
) -> Result<book::Model, DomainError> {
    let title = required("book title", &input.title)?;
    let existing = find_book(db, book_id).await?;

    let mut active: book::ActiveModel = existing.into();
    active.title = Set(title);
    if let Some(locale) = input.locale.filter(|l| !l.trim().is_empty()) {
        active.locale = Set(locale);
    }
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    let updated = active.update(db).await?;
    Ok(updated)
}

/// Delete a book with all of its pages and their cards.
///
/// Assets shown by those cards are left alone.
pub async fn delete_book(
    db: &DatabaseConnection,
    book_id: i32,
) -> Result<DeletionReport, DomainError> {
    let txn = db.begin().await?;

    find_book(&txn, book_id).await?;
    let page_ids: Vec<i32> = page_service::pages_of_book(&txn, book_id)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();

    let cards = Card::delete_many()
        .filter(card::Column::PageId.is_in(page_ids))
        .exec(&txn)
        .await?
        .rows_affected;
    let pages = Page::delete_many()
        .filter(page::Column::BookId.eq(book_id))
        .exec(&txn)
        .await?
        .rows_affected;
    Book::delete_by_id(book_id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        "Book {} deleted with {} pages and {} cards",
        book_id,
        pages,
        cards
    );
    Ok(DeletionReport { pages, cards })
}

/// Delete a page and its cards.
///
/// When the page was its book's home page the book falls back to default
/// resolution. Cards on other pages that navigate here keep their dangling
/// target.
pub async fn delete_page(
    db: &DatabaseConnection,
    page_id: i32,
) -> Result<DeletionReport, DomainError> {
    let txn = db.begin().await?;

    let page = page_service::find_page(&txn, page_id).await?;

    let cards = Card::delete_many()
        .filter(card::Column::PageId.eq(page.id))
        .exec(&txn)
        .await?
        .rows_affected;

    let cleared = Book::update_many()
        .col_expr(book::Column::HomePageId, Expr::value(Option::<i32>::None))
        .filter(book::Column::Id.eq(page.book_id))
        .filter(book::Column::HomePageId.eq(page.id))
        .exec(&txn)
        .await?
        .rows_affected;

    Page::delete_by_id(page.id).exec(&txn).await?;
    txn.commit().await?;

    if cleared > 0 {
        tracing::info!("Book {} lost its home page {}", page.book_id, page.id);
    }
    tracing::info!("Page {} deleted with {} cards", page.id, cards);
    Ok(DeletionReport { pages: 1, cards })
}

/// Delete a single card, freeing its slot
pub async fn delete_card(db: &DatabaseConnection, card_id: i32) -> Result<(), DomainError> {
    let card = placement_service::find_card(db, card_id).await?;
    Card::delete_by_id(card.id).exec(db).await?;

    tracing::info!(
        "Card {} deleted, slot ({}, {}) of page {} is free",
        card.id,
        card.slot_row,
        card.slot_col,
        card.page_id
    );
    Ok(())
}

pub(crate) async fn find_book<C: ConnectionTrait>(
    db: &C,
    book_id: i32,
) -> Result<book::Model, DomainError> {
    Book::find_by_id(book_id)
        .one(db)
        .await?
        .ok_or(DomainError::not_found("book", book_id))
}
