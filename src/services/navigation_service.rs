//! Navigation Service - links between pages and a book's entry point

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::{ActionType, DomainError};
use crate::models::page::{self, Entity as Page};
use crate::models::{book, card};
use crate::services::{book_service, page_service, placement_service};

/// Everything needed to show one page of a book in end-user mode
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeView {
    pub book: book::Model,
    pub page: page::Model,
    pub cards: Vec<card::Model>,
    /// All pages of the book in display order
    pub pages: Vec<page::Model>,
    /// Navigation card id -> target page (`None` when the target is gone)
    pub targets: HashMap<i32, Option<page::Model>>,
}

/// Checks the target of a card that lives in `book_id`.
///
/// Only navigation cards are checked; they need a target page of the same
/// book. Returns the target to store, which is always `None` for other
/// action types.
pub async fn validate_navigation_target<C: ConnectionTrait>(
    db: &C,
    book_id: i32,
    action_type: ActionType,
    target_page_id: Option<i32>,
) -> Result<Option<i32>, DomainError> {
    if action_type != ActionType::Navigation {
        return Ok(None);
    }

    let target_id = target_page_id.ok_or_else(|| {
        DomainError::InvalidTarget("navigation cards need a target page".to_string())
    })?;

    let target = Page::find_by_id(target_id).one(db).await?.ok_or_else(|| {
        DomainError::InvalidTarget(format!("page {} does not exist", target_id))
    })?;

    if target.book_id != book_id {
        tracing::warn!(
            "Rejected navigation from book {} to page {} of book {}",
            book_id,
            target.id,
            target.book_id
        );
        return Err(DomainError::InvalidTarget(format!(
            "page {} belongs to another book",
            target_id
        )));
    }

    Ok(Some(target_id))
}

/// The page a book opens on.
///
/// The explicit home page wins when it belongs to the book; otherwise the
/// book's page with the smallest `order` (then smallest id).
pub fn resolve_home_page<'a>(
    book: &book::Model,
    pages: &'a [page::Model],
) -> Option<&'a page::Model> {
    let owned = pages.iter().filter(|p| p.book_id == book.id);

    if let Some(home_id) = book.home_page_id
        && let Some(home) = owned.clone().find(|p| p.id == home_id)
    {
        return Some(home);
    }

    owned.min_by_key(|p| (p.order, p.id))
}

/// Refuses a home page taken from another book
pub fn check_home_page(book: &book::Model, page: &page::Model) -> Result<(), DomainError> {
    if page.book_id != book.id {
        return Err(DomainError::CrossBookReference {
            page_id: page.id,
            book_id: book.id,
        });
    }
    Ok(())
}

/// Make `page_id` the page `book_id` opens on
pub async fn set_home_page(
    db: &DatabaseConnection,
    book_id: i32,
    page_id: i32,
) -> Result<book::Model, DomainError> {
    let txn = db.begin().await?;

    let book = book_service::find_book(&txn, book_id).await?;
    let page = page_service::find_page(&txn, page_id).await?;
    check_home_page(&book, &page)?;

    let mut active: book::ActiveModel = book.into();
    active.home_page_id = Set(Some(page.id));
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!("Book {} now opens on page {}", book_id, page_id);
    Ok(updated)
}

/// Resolved home page of a book
pub async fn home_page(db: &DatabaseConnection, book_id: i32) -> Result<page::Model, DomainError> {
    let book = book_service::find_book(db, book_id).await?;
    let pages = page_service::pages_of_book(db, book_id).await?;

    resolve_home_page(&book, &pages)
        .cloned()
        .ok_or(DomainError::not_found("home page of book", book_id))
}

/// Resolves the target page of every navigation card in `cards`.
///
/// Cards without a navigation action or without a target are left out.
/// A target that no longer exists maps to `None`.
pub async fn resolve_card_targets<C: ConnectionTrait>(
    db: &C,
    cards: &[card::Model],
) -> Result<HashMap<i32, Option<page::Model>>, DomainError> {
    let links: Vec<(i32, i32)> = cards
        .iter()
        .filter(|c| c.is_navigation())
        .filter_map(|c| c.target_page_id.map(|target| (c.id, target)))
        .collect();

    if links.is_empty() {
        return Ok(HashMap::new());
    }

    let target_ids: Vec<i32> = links.iter().map(|(_, target)| *target).collect();
    let found: HashMap<i32, page::Model> = Page::find()
        .filter(page::Column::Id.is_in(target_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    Ok(links
        .into_iter()
        .map(|(card_id, target)| (card_id, found.get(&target).cloned()))
        .collect())
}

/// Open a book on its home page
pub async fn open_book(db: &DatabaseConnection, book_id: i32) -> Result<RuntimeView, DomainError> {
    let book = book_service::find_book(db, book_id).await?;
    let pages = page_service::pages_of_book(db, book_id).await?;
    let page = resolve_home_page(&book, &pages)
        .cloned()
        .ok_or(DomainError::not_found("home page of book", book_id))?;

    runtime_view(db, book, page, pages).await
}

/// Open a specific page of a book
pub async fn open_page(
    db: &DatabaseConnection,
    book_id: i32,
    page_id: i32,
) -> Result<RuntimeView, DomainError> {
    let book = book_service::find_book(db, book_id).await?;
    let page = page_service::find_page_in_book(db, book_id, page_id).await?;
    let pages = page_service::pages_of_book(db, book_id).await?;

    runtime_view(db, book, page, pages).await
}

async fn runtime_view(
    db: &DatabaseConnection,
    book: book::Model,
    page: page::Model,
    pages: Vec<page::Model>,
) -> Result<RuntimeView, DomainError> {
    let cards = placement_service::cards_on_page(db, page.id).await?;
    let targets = resolve_card_targets(db, &cards).await?;

    tracing::debug!(
        "Runtime view of book {} page {}: {} cards, {} links",
        book.id,
        page.id,
        cards.len(),
        targets.len()
    );

    Ok(RuntimeView {
        book,
        page,
        cards,
        pages,
        targets,
    })
}
