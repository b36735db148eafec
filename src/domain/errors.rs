//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! None of them is fatal: every variant is meant to be surfaced to the caller.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use super::grid::Slot;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Referenced entity is absent
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// Slot lies outside the page grid
    #[error("slot ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: i32,
        col: i32,
        rows: i32,
        cols: i32,
    },

    /// Another card already sits on the slot
    #[error("slot ({row}, {col}) is already occupied")]
    PositionOccupied { row: i32, col: i32 },

    /// Every slot of the grid is taken
    #[error("no free slot left on the {rows}x{cols} grid")]
    GridFull { rows: i32, cols: i32 },

    /// Missing or malformed required field
    #[error("validation error: {0}")]
    Validation(String),

    /// Navigation card without a usable target page
    #[error("invalid navigation target: {0}")]
    InvalidTarget(String),

    /// Page referenced from a book it does not belong to
    #[error("page {page_id} does not belong to book {book_id}")]
    CrossBookReference { page_id: i32, book_id: i32 },

    #[error("asset {0} not found")]
    AssetNotFound(i32),

    #[error("asset {asset_id} is still used by {cards} card(s)")]
    AssetInUse { asset_id: i32, cards: u64 },

    /// Database/persistence error
    #[error("database error: {0}")]
    Database(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        DomainError::NotFound { entity, id }
    }

    pub fn out_of_bounds(slot: Slot, rows: i32, cols: i32) -> Self {
        DomainError::OutOfBounds {
            row: slot.row,
            col: slot.col,
            rows,
            cols,
        }
    }

    pub fn occupied(slot: Slot) -> Self {
        DomainError::PositionOccupied {
            row: slot.row,
            col: slot.col,
        }
    }

    /// Maps a failed card write to `PositionOccupied` when the store's
    /// slot index rejected it, and to `Database` otherwise.
    pub fn from_slot_write(err: DbErr, slot: Slot) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::occupied(slot),
            _ => DomainError::from(err),
        }
    }

    /// Stable machine-readable name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "not_found",
            DomainError::OutOfBounds { .. } => "out_of_bounds",
            DomainError::PositionOccupied { .. } => "position_occupied",
            DomainError::GridFull { .. } => "grid_full",
            DomainError::Validation(_) => "validation_error",
            DomainError::InvalidTarget(_) => "invalid_target",
            DomainError::CrossBookReference { .. } => "cross_book_reference",
            DomainError::AssetNotFound(_) => "asset_not_found",
            DomainError::AssetInUse { .. } => "asset_in_use",
            DomainError::Database(_) => "database_error",
        }
    }
}

// Conversion from SeaORM errors (used by every store-backed operation)
impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}
