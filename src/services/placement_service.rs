//! Placement Service - collision-free card placement on a page grid
//!
//! Every write that puts a card on a slot runs its occupancy check and the
//! write inside one transaction. The `cards` table additionally carries a
//! unique index on `(page_id, slot_row, slot_col)`, so a writer that slips
//! past the check is still rejected with `PositionOccupied`.
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::HashSet;

use crate::domain::{
    CardAttrs, DEFAULT_BACKGROUND_COLOR, DEFAULT_BORDER_COLOR, DomainError, Grid, MoveOutcome,
    Slot,
};
use crate::models::card::{self, Entity as Card};
use crate::models::page;
use crate::services::{asset_service, navigation_service, page_service};

/// Checks `slot` against a snapshot of the page's cards.
///
/// Bounds are checked first, then occupancy. `exclude_card_id` is the card
/// being moved, which never collides with itself.
pub fn check_placement(
    page: &page::Model,
    cards: &[card::Model],
    slot: Slot,
    exclude_card_id: Option<i32>,
) -> Result<(), DomainError> {
    let grid = page.grid();
    if !grid.contains(slot) {
        return Err(DomainError::out_of_bounds(slot, grid.rows(), grid.cols()));
    }

    let taken = cards.iter().any(|c| {
        c.page_id == page.id && Some(c.id) != exclude_card_id && c.slot() == slot
    });
    if taken {
        return Err(DomainError::occupied(slot));
    }

    Ok(())
}

/// Store-backed placement check against the page's current cards
pub async fn validate_placement<C: ConnectionTrait>(
    db: &C,
    page: &page::Model,
    slot: Slot,
    exclude_card_id: Option<i32>,
) -> Result<(), DomainError> {
    let cards = cards_on_page(db, page.id).await?;
    check_placement(page, &cards, slot, exclude_card_id).inspect_err(|e| {
        tracing::warn!("Placement on page {} rejected: {}", page.id, e);
    })
}

/// First free slot in row-major order, or `None` when the grid is full
pub fn first_free_slot(grid: Grid, occupied: &HashSet<Slot>) -> Option<Slot> {
    grid.slots().find(|slot| !occupied.contains(slot))
}

/// First free slot in row-major order.
///
/// Falls back to `(0, 0)` when every slot is taken; that slot may itself be
/// occupied, so callers that must tell "full" apart use [`first_free_slot`]
/// or [`suggest_slot`].
pub fn find_free_slot(grid: Grid, occupied: &HashSet<Slot>) -> Slot {
    first_free_slot(grid, occupied).unwrap_or(Slot::ORIGIN)
}

pub fn occupied_slots(cards: &[card::Model]) -> HashSet<Slot> {
    cards.iter().map(card::Model::slot).collect()
}

/// Create a card on `slot` of a page
pub async fn create_card(
    db: &DatabaseConnection,
    page_id: i32,
    slot: Slot,
    attrs: CardAttrs,
) -> Result<card::Model, DomainError> {
    let label = attrs.checked_label()?;
    let (row_span, col_span) = attrs.checked_spans()?;

    let txn = db.begin().await?;

    let page = page_service::find_page(&txn, page_id).await?;
    validate_placement(&txn, &page, slot, None).await?;
    asset_service::ensure_image_reference(&txn, attrs.image_id).await?;
    let target_page_id = navigation_service::validate_navigation_target(
        &txn,
        page.book_id,
        attrs.action_type,
        attrs.target_page_id,
    )
    .await?;

    let now = chrono::Utc::now().to_rfc3339();
    let new_card = card::ActiveModel {
        page_id: Set(page.id),
        slot_row: Set(slot.row),
        slot_col: Set(slot.col),
        row_span: Set(row_span),
        col_span: Set(col_span),
        label: Set(label),
        background_color: Set(attrs
            .background_color
            .unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_string())),
        border_color: Set(attrs
            .border_color
            .unwrap_or_else(|| DEFAULT_BORDER_COLOR.to_string())),
        action_type: Set(attrs.action_type.as_str().to_string()),
        image_id: Set(attrs.image_id),
        target_page_id: Set(target_page_id),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let saved = new_card
        .insert(&txn)
        .await
        .map_err(|e| DomainError::from_slot_write(e, slot))?;
    txn.commit().await?;

    tracing::info!(
        "Card {} '{}' created on page {} at ({}, {})",
        saved.id,
        saved.label,
        saved.page_id,
        slot.row,
        slot.col
    );
    Ok(saved)
}

/// Move a card to another slot of its page
pub async fn move_card(
    db: &DatabaseConnection,
    card_id: i32,
    slot: Slot,
) -> Result<MoveOutcome, DomainError> {
    let txn = db.begin().await?;

    let card = find_card(&txn, card_id).await?;
    let page = page_service::find_page(&txn, card.page_id).await?;
    validate_placement(&txn, &page, slot, Some(card.id)).await?;

    let old_position = card.slot();
    if old_position == slot {
        txn.commit().await?;
        return Ok(MoveOutcome {
            card_id,
            old_position,
            new_position: slot,
            moved: false,
        });
    }

    let mut active: card::ActiveModel = card.into();
    active.slot_row = Set(slot.row);
    active.slot_col = Set(slot.col);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    active
        .update(&txn)
        .await
        .map_err(|e| DomainError::from_slot_write(e, slot))?;
    txn.commit().await?;

    tracing::info!(
        "Card {} moved from ({}, {}) to ({}, {})",
        card_id,
        old_position.row,
        old_position.col,
        slot.row,
        slot.col
    );
    Ok(MoveOutcome {
        card_id,
        old_position,
        new_position: slot,
        moved: true,
    })
}

/// Replace every editable field of a card, position included
pub async fn update_card(
    db: &DatabaseConnection,
    card_id: i32,
    slot: Slot,
    attrs: CardAttrs,
) -> Result<card::Model, DomainError> {
    let label = attrs.checked_label()?;
    let (row_span, col_span) = attrs.checked_spans()?;

    let txn = db.begin().await?;

    let card = find_card(&txn, card_id).await?;
    let page = page_service::find_page(&txn, card.page_id).await?;
    if card.slot() != slot {
        validate_placement(&txn, &page, slot, Some(card.id)).await?;
    }
    asset_service::ensure_image_reference(&txn, attrs.image_id).await?;
    let target_page_id = navigation_service::validate_navigation_target(
        &txn,
        page.book_id,
        attrs.action_type,
        attrs.target_page_id,
    )
    .await?;

    let mut active: card::ActiveModel = card.into();
    active.slot_row = Set(slot.row);
    active.slot_col = Set(slot.col);
    active.row_span = Set(row_span);
    active.col_span = Set(col_span);
    active.label = Set(label);
    active.background_color = Set(attrs
        .background_color
        .unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_string()));
    active.border_color = Set(attrs
        .border_color
        .unwrap_or_else(|| DEFAULT_BORDER_COLOR.to_string()));
    active.action_type = Set(attrs.action_type.as_str().to_string());
    active.image_id = Set(attrs.image_id);
    active.target_page_id = Set(target_page_id);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    let updated = active
        .update(&txn)
        .await
        .map_err(|e| DomainError::from_slot_write(e, slot))?;
    txn.commit().await?;

    tracing::info!("Card {} '{}' updated", updated.id, updated.label);
    Ok(updated)
}

/// Get a single card by ID
pub async fn get_card(db: &DatabaseConnection, card_id: i32) -> Result<card::Model, DomainError> {
    find_card(db, card_id).await
}

/// Cards of a page in reading order
pub async fn list_cards(
    db: &DatabaseConnection,
    page_id: i32,
) -> Result<Vec<card::Model>, DomainError> {
    page_service::find_page(db, page_id).await?;
    cards_on_page(db, page_id).await
}

/// First free slot of a page, for pre-filling a new card
pub async fn suggest_slot(db: &DatabaseConnection, page_id: i32) -> Result<Slot, DomainError> {
    let page = page_service::find_page(db, page_id).await?;
    let cards = cards_on_page(db, page_id).await?;
    let grid = page.grid();

    first_free_slot(grid, &occupied_slots(&cards)).ok_or(DomainError::GridFull {
        rows: grid.rows(),
        cols: grid.cols(),
    })
}

/// The page as a `rows x cols` matrix of optional cards
pub async fn page_grid(
    db: &DatabaseConnection,
    page_id: i32,
) -> Result<Vec<Vec<Option<card::Model>>>, DomainError> {
    let page = page_service::find_page(db, page_id).await?;
    let cards = cards_on_page(db, page_id).await?;
    Ok(layout(page.grid(), cards))
}

pub fn layout(grid: Grid, cards: Vec<card::Model>) -> Vec<Vec<Option<card::Model>>> {
    let mut rows = vec![vec![None; grid.cols() as usize]; grid.rows() as usize];
    for card in cards {
        let slot = card.slot();
        if grid.contains(slot) {
            rows[slot.row as usize][slot.col as usize] = Some(card);
        }
    }
    rows
}

pub(crate) async fn find_card<C: ConnectionTrait>(
    db: &C,
    card_id: i32,
) -> Result<card::Model, DomainError> {
    Card::find_by_id(card_id)
        .one(db)
        .await?
        .ok_or(DomainError::not_found("card", card_id))
}

pub(crate) async fn cards_on_page<C: ConnectionTrait>(
    db: &C,
    page_id: i32,
) -> Result<Vec<card::Model>, DomainError> {
    let cards = Card::find()
        .filter(card::Column::PageId.eq(page_id))
        .order_by_asc(card::Column::SlotRow)
        .order_by_asc(card::Column::SlotCol)
        .all(db)
        .await?;
    Ok(cards)
}
