//! Plain input/output types exchanged with callers
//!
//! Callers hand the core validated primitives; these structs group them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;
use super::grid::Slot;

pub const DEFAULT_LOCALE: &str = "it-IT";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFFF";
pub const DEFAULT_BORDER_COLOR: &str = "#000000";

/// What happens when a card is activated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[default]
    None,
    Navigation,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::None => "none",
            ActionType::Navigation => "navigation",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "" => Ok(ActionType::None),
            "navigation" => Ok(ActionType::Navigation),
            other => Err(DomainError::Validation(format!(
                "unknown action type '{}'",
                other
            ))),
        }
    }
}

/// Everything about a card except where it sits
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardAttrs {
    pub label: String,
    #[serde(default)]
    pub row_span: Option<i32>,
    #[serde(default)]
    pub col_span: Option<i32>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub action_type: ActionType,
    #[serde(default)]
    pub image_id: Option<i32>,
    #[serde(default)]
    pub target_page_id: Option<i32>,
}

impl CardAttrs {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn navigating_to(label: impl Into<String>, target_page_id: i32) -> Self {
        Self {
            label: label.into(),
            action_type: ActionType::Navigation,
            target_page_id: Some(target_page_id),
            ..Default::default()
        }
    }

    /// Trimmed label, rejected when empty
    pub fn checked_label(&self) -> Result<String, DomainError> {
        let label = self.label.trim();
        if label.is_empty() {
            return Err(DomainError::Validation("card label is required".to_string()));
        }
        Ok(label.to_string())
    }

    /// `(row_span, col_span)`, defaulting to 1 and rejecting anything below
    pub fn checked_spans(&self) -> Result<(i32, i32), DomainError> {
        let row_span = self.row_span.unwrap_or(1);
        let col_span = self.col_span.unwrap_or(1);
        if row_span < 1 || col_span < 1 {
            return Err(DomainError::Validation(format!(
                "card spans must be at least 1 (got {}x{})",
                row_span, col_span
            )));
        }
        Ok((row_span, col_span))
    }
}

/// Result of moving a card
#[derive(Debug, Clone, Serialize)]
pub struct MoveOutcome {
    pub card_id: i32,
    pub old_position: Slot,
    pub new_position: Slot,
    /// False when the card already sat on the requested slot
    pub moved: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub title: String,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookUpdate {
    pub title: String,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPage {
    pub title: String,
    #[serde(default)]
    pub grid_cols: Option<i32>,
    #[serde(default)]
    pub grid_rows: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageUpdate {
    pub title: String,
    #[serde(default)]
    pub grid_cols: Option<i32>,
    #[serde(default)]
    pub grid_rows: Option<i32>,
    #[serde(default)]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAsset {
    pub kind: String,
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Edit of an asset. `None` keeps the stored value; a blank `alt` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetUpdate {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Narrows an asset listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetFilter {
    /// Exact kind, e.g. `image`
    #[serde(default)]
    pub kind: Option<String>,
    /// Case-insensitive fragment of the url or alt text
    #[serde(default)]
    pub search: Option<String>,
}

/// Trims a required text field, rejecting blank input
pub fn required(field: &str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}
