//! Asset Service - media references used by cards
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::domain::{AssetFilter, AssetUpdate, DomainError, NewAsset, required};
use crate::models::AssetDto;
use crate::models::asset::{self, Entity as Asset};
use crate::models::card::{self, Entity as Card};

/// Root every stored media file is served from
pub const STATIC_PREFIX: &str = "/static/";
pub const STATIC_MEDIA_PREFIX: &str = "/static/media/";
const MEDIA_PREFIX: &str = "/media/";
const RELATIVE_MEDIA_PREFIX: &str = "media/";

/// Canonical form of an asset URL.
///
/// Absolute `http(s)://` and `data:` URLs and anything already under
/// `/static/` are kept as is. `/media/...` and `media/...` are rooted under
/// `/static/media/`, and any other value is treated as a file name inside
/// `/static/media/`. Idempotent.
pub fn normalize_url(raw: &str) -> String {
    let url = raw.trim();
    if url.is_empty() {
        return String::new();
    }

    if url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("data:")
        || url.starts_with(STATIC_PREFIX)
    {
        return url.to_string();
    }

    if let Some(rest) = url
        .strip_prefix(MEDIA_PREFIX)
        .or_else(|| url.strip_prefix(RELATIVE_MEDIA_PREFIX))
    {
        return format!("{}{}", STATIC_MEDIA_PREFIX, rest);
    }

    format!("{}{}", STATIC_MEDIA_PREFIX, url.trim_start_matches('/'))
}

/// Fails when a card points at an image that does not exist
pub fn validate_image_reference(
    image_id: Option<i32>,
    asset_exists: bool,
) -> Result<(), DomainError> {
    match image_id {
        Some(id) if !asset_exists => Err(DomainError::AssetNotFound(id)),
        _ => Ok(()),
    }
}

/// Refuses to delete an asset that cards still display
pub fn deletion_guard(asset: &asset::Model, referencing_cards: u64) -> Result<(), DomainError> {
    if referencing_cards > 0 {
        return Err(DomainError::AssetInUse {
            asset_id: asset.id,
            cards: referencing_cards,
        });
    }
    Ok(())
}

/// Store-backed image check used while writing a card
pub async fn ensure_image_reference<C: ConnectionTrait>(
    db: &C,
    image_id: Option<i32>,
) -> Result<(), DomainError> {
    let exists = match image_id {
        Some(id) => Asset::find_by_id(id).one(db).await?.is_some(),
        None => false,
    };
    validate_image_reference(image_id, exists)
}

/// Register a new asset
pub async fn create_asset(
    db: &DatabaseConnection,
    input: NewAsset,
) -> Result<AssetDto, DomainError> {
    let kind = required("asset kind", &input.kind)?;
    let url = required("asset url", &input.url)?;
    let now = chrono::Utc::now().to_rfc3339();

    let new_asset = asset::ActiveModel {
        kind: Set(kind),
        url: Set(url),
        alt: Set(input.alt.filter(|a| !a.trim().is_empty())),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let saved = new_asset.insert(db).await?;
    tracing::info!("Asset {} registered ({})", saved.id, saved.url);
    Ok(AssetDto::from(saved))
}

/// Get a single asset by ID
pub async fn get_asset(db: &DatabaseConnection, asset_id: i32) -> Result<AssetDto, DomainError> {
    Asset::find_by_id(asset_id)
        .one(db)
        .await?
        .map(AssetDto::from)
        .ok_or(DomainError::AssetNotFound(asset_id))
}

/// Assets matching `filter`, newest first
pub async fn list_assets(
    db: &DatabaseConnection,
    filter: &AssetFilter,
) -> Result<Vec<AssetDto>, DomainError> {
    let mut query = Asset::find();

    if let Some(kind) = filter.kind.as_deref().map(str::trim)
        && !kind.is_empty()
    {
        query = query.filter(asset::Column::Kind.eq(kind));
    }

    let assets = query
        .order_by_desc(asset::Column::CreatedAt)
        .order_by_desc(asset::Column::Id)
        .all(db)
        .await?;

    // SQLite LIKE only folds ASCII, so text search runs here
    let needle = filter
        .search
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .unwrap_or_default();

    Ok(assets
        .into_iter()
        .filter(|a| matches_search(a, &needle))
        .map(AssetDto::from)
        .collect())
}

/// True when `needle` (already lowercased) occurs in the url or alt text
pub fn matches_search(asset: &asset::Model, needle: &str) -> bool {
    needle.is_empty()
        || asset.url.to_lowercase().contains(needle)
        || asset
            .alt
            .as_deref()
            .is_some_and(|alt| alt.to_lowercase().contains(needle))
}

/// Change the url or alt text of an asset
pub async fn update_asset(
    db: &DatabaseConnection,
    asset_id: i32,
    input: AssetUpdate,
) -> Result<AssetDto, DomainError> {
    let url = input
        .url
        .as_deref()
        .map(|u| required("asset url", u))
        .transpose()?;

    let existing = Asset::find_by_id(asset_id)
        .one(db)
        .await?
        .ok_or(DomainError::AssetNotFound(asset_id))?;

    let mut active: asset::ActiveModel = existing.into();
    if let Some(url) = url {
        active.url = Set(url);
    }
    if let Some(alt) = input.alt {
        let alt = alt.trim();
        active.alt = Set((!alt.is_empty()).then(|| alt.to_string()));
    }
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    let updated = active.update(db).await?;
    tracing::info!("Asset {} updated ({})", updated.id, updated.url);
    Ok(AssetDto::from(updated))
}

/// IDs of the cards displaying an asset
pub async fn asset_usage(db: &DatabaseConnection, asset_id: i32) -> Result<Vec<i32>, DomainError> {
    Asset::find_by_id(asset_id)
        .one(db)
        .await?
        .ok_or(DomainError::AssetNotFound(asset_id))?;

    let ids: Vec<i32> = Card::find()
        .select_only()
        .column(card::Column::Id)
        .filter(card::Column::ImageId.eq(asset_id))
        .order_by_asc(card::Column::Id)
        .into_tuple()
        .all(db)
        .await?;
    Ok(ids)
}

/// Delete an asset no card uses any more
pub async fn delete_asset(db: &DatabaseConnection, asset_id: i32) -> Result<(), DomainError> {
    let txn = db.begin().await?;

    let asset = Asset::find_by_id(asset_id)
        .one(&txn)
        .await?
        .ok_or(DomainError::AssetNotFound(asset_id))?;

    let referencing = Card::find()
        .filter(card::Column::ImageId.eq(asset_id))
        .count(&txn)
        .await?;
    deletion_guard(&asset, referencing).inspect_err(|e| {
        tracing::warn!("Refused to delete asset {}: {}", asset_id, e);
    })?;

    Asset::delete_by_id(asset_id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!("Asset {} deleted", asset_id);
    Ok(())
}
