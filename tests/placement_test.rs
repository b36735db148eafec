//! Placement tests: collision-free cards on a page grid

use std::collections::HashSet;

use aacbook::db;
use aacbook::domain::{ActionType, CardAttrs, DomainError, NewBook, NewPage, NewAsset, PageUpdate, Slot};
use aacbook::models::{book, card, page};
use aacbook::services::{asset_service, book_service, page_service, placement_service};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn create_test_book(db: &DatabaseConnection, title: &str) -> book::Model {
    book_service::create_book(
        db,
        NewBook {
            title: title.to_string(),
            locale: None,
        },
    )
    .await
    .expect("Failed to create book")
}

async fn create_test_page(
    db: &DatabaseConnection,
    book_id: i32,
    rows: i32,
    cols: i32,
) -> page::Model {
    page_service::create_page(
        db,
        book_id,
        NewPage {
            title: "Home".to_string(),
            grid_cols: Some(cols),
            grid_rows: Some(rows),
        },
    )
    .await
    .expect("Failed to create page")
}

async fn setup_page(rows: i32, cols: i32) -> (DatabaseConnection, page::Model) {
    let db = setup_test_db().await;
    let book = create_test_book(&db, "Test Book").await;
    let page = create_test_page(&db, book.id, rows, cols).await;
    (db, page)
}

fn assert_no_collisions(cards: &[aacbook::models::card::Model], page: &page::Model) {
    let mut seen = HashSet::new();
    for card in cards {
        assert!(seen.insert(card.slot()), "two cards share {:?}", card.slot());
        assert!(page.grid().contains(card.slot()), "card {} is off-grid", card.id);
    }
}

#[tokio::test]
async fn test_create_card_defaults() {
    let (db, page) = setup_page(3, 3).await;

    let card = placement_service::create_card(&db, page.id, Slot::new(1, 2), CardAttrs::labeled(" Ciao "))
        .await
        .expect("Failed to create card");

    assert_eq!(card.page_id, page.id);
    assert_eq!(card.slot(), Slot::new(1, 2));
    assert_eq!(card.label, "Ciao");
    assert_eq!((card.row_span, card.col_span), (1, 1));
    assert_eq!(card.background_color, "#FFFFFF");
    assert_eq!(card.border_color, "#000000");
    assert_eq!(card.action(), ActionType::None);
    assert_eq!(card.target_page_id, None);
}

#[tokio::test]
async fn test_create_card_on_occupied_slot() {
    let (db, page) = setup_page(3, 3).await;

    placement_service::create_card(&db, page.id, Slot::new(0, 0), CardAttrs::labeled("Casa"))
        .await
        .unwrap();

    let err = placement_service::create_card(&db, page.id, Slot::new(0, 0), CardAttrs::labeled("Bere"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::PositionOccupied { row: 0, col: 0 }));

    let cards = placement_service::list_cards(&db, page.id).await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].label, "Casa");
}

#[tokio::test]
async fn test_create_card_out_of_bounds() {
    let (db, page) = setup_page(3, 3).await;

    let err = placement_service::create_card(&db, page.id, Slot::new(3, 0), CardAttrs::labeled("Casa"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::OutOfBounds {
            row: 3,
            col: 0,
            rows: 3,
            cols: 3
        }
    ));

    let err = placement_service::create_card(&db, page.id, Slot::new(0, -1), CardAttrs::labeled("Casa"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::OutOfBounds { .. }));
    assert!(placement_service::list_cards(&db, page.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_card_validation() {
    let (db, page) = setup_page(3, 3).await;

    let err = placement_service::create_card(&db, page.id, Slot::new(0, 0), CardAttrs::labeled("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = placement_service::create_card(&db, 999, Slot::new(0, 0), CardAttrs::labeled("Casa"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "page", id: 999 }));

    let err = placement_service::create_card(
        &db,
        page.id,
        Slot::new(0, 0),
        CardAttrs {
            image_id: Some(42),
            ..CardAttrs::labeled("Casa")
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::AssetNotFound(42)));
}

#[tokio::test]
async fn test_create_card_with_image() {
    let (db, page) = setup_page(3, 3).await;
    let asset = asset_service::create_asset(
        &db,
        NewAsset {
            kind: "image".to_string(),
            url: "casa.png".to_string(),
            alt: Some("Casa".to_string()),
        },
    )
    .await
    .unwrap();

    let card = placement_service::create_card(
        &db,
        page.id,
        Slot::new(0, 0),
        CardAttrs {
            image_id: Some(asset.id),
            ..CardAttrs::labeled("Casa")
        },
    )
    .await
    .unwrap();
    assert_eq!(card.image_id, Some(asset.id));
}

#[tokio::test]
async fn test_move_card() {
    let (db, page) = setup_page(3, 3).await;
    let card = placement_service::create_card(&db, page.id, Slot::new(0, 0), CardAttrs::labeled("Casa"))
        .await
        .unwrap();

    let outcome = placement_service::move_card(&db, card.id, Slot::new(2, 1))
        .await
        .expect("Failed to move card");
    assert!(outcome.moved);
    assert_eq!(outcome.old_position, Slot::new(0, 0));
    assert_eq!(outcome.new_position, Slot::new(2, 1));

    let moved = placement_service::get_card(&db, card.id).await.unwrap();
    assert_eq!(moved.slot(), Slot::new(2, 1));

    // The old slot is free again
    placement_service::create_card(&db, page.id, Slot::new(0, 0), CardAttrs::labeled("Bere"))
        .await
        .expect("old slot should be free");
}

#[tokio::test]
async fn test_move_card_to_same_slot_is_noop() {
    let (db, page) = setup_page(3, 3).await;
    let card = placement_service::create_card(&db, page.id, Slot::new(1, 1), CardAttrs::labeled("Casa"))
        .await
        .unwrap();

    let outcome = placement_service::move_card(&db, card.id, Slot::new(1, 1)).await.unwrap();
    assert!(!outcome.moved);
    assert_eq!(outcome.old_position, outcome.new_position);

    let unchanged = placement_service::get_card(&db, card.id).await.unwrap();
    assert_eq!(unchanged.updated_at, card.updated_at);
}

#[tokio::test]
async fn test_move_card_rejections() {
    let (db, page) = setup_page(3, 3).await;
    let a = placement_service::create_card(&db, page.id, Slot::new(0, 0), CardAttrs::labeled("A"))
        .await
        .unwrap();
    placement_service::create_card(&db, page.id, Slot::new(0, 1), CardAttrs::labeled("B"))
        .await
        .unwrap();

    let err = placement_service::move_card(&db, a.id, Slot::new(0, 1)).await.unwrap_err();
    assert!(matches!(err, DomainError::PositionOccupied { row: 0, col: 1 }));

    let err = placement_service::move_card(&db, a.id, Slot::new(0, 3)).await.unwrap_err();
    assert!(matches!(err, DomainError::OutOfBounds { .. }));

    let err = placement_service::move_card(&db, 999, Slot::new(2, 2)).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "card", .. }));

    let still = placement_service::get_card(&db, a.id).await.unwrap();
    assert_eq!(still.slot(), Slot::new(0, 0));
}

#[tokio::test]
async fn test_update_card() {
    let (db, page) = setup_page(3, 3).await;
    let a = placement_service::create_card(&db, page.id, Slot::new(0, 0), CardAttrs::labeled("A"))
        .await
        .unwrap();
    placement_service::create_card(&db, page.id, Slot::new(0, 1), CardAttrs::labeled("B"))
        .await
        .unwrap();

    // Same slot, new attributes
    let updated = placement_service::update_card(
        &db,
        a.id,
        Slot::new(0, 0),
        CardAttrs {
            background_color: Some("#FFEE00".to_string()),
            ..CardAttrs::labeled("Acqua")
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.label, "Acqua");
    assert_eq!(updated.background_color, "#FFEE00");

    let err = placement_service::update_card(&db, a.id, Slot::new(0, 1), CardAttrs::labeled("Acqua"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::PositionOccupied { .. }));

    let moved = placement_service::update_card(&db, a.id, Slot::new(2, 2), CardAttrs::labeled("Acqua"))
        .await
        .unwrap();
    assert_eq!(moved.slot(), Slot::new(2, 2));
}

#[tokio::test]
async fn test_delete_card_frees_slot() {
    let (db, page) = setup_page(2, 2).await;
    let card = placement_service::create_card(&db, page.id, Slot::new(1, 1), CardAttrs::labeled("A"))
        .await
        .unwrap();

    book_service::delete_card(&db, card.id).await.unwrap();
    assert!(matches!(
        placement_service::get_card(&db, card.id).await,
        Err(DomainError::NotFound { .. })
    ));

    placement_service::create_card(&db, page.id, Slot::new(1, 1), CardAttrs::labeled("B"))
        .await
        .expect("slot should be free after delete");

    assert!(matches!(
        book_service::delete_card(&db, card.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_suggest_slot() {
    let (db, page) = setup_page(3, 3).await;
    assert_eq!(placement_service::suggest_slot(&db, page.id).await.unwrap(), Slot::new(0, 0));

    for (row, col) in [(0, 0), (0, 1)] {
        placement_service::create_card(&db, page.id, Slot::new(row, col), CardAttrs::labeled("x"))
            .await
            .unwrap();
    }
    assert_eq!(placement_service::suggest_slot(&db, page.id).await.unwrap(), Slot::new(0, 2));
}

#[tokio::test]
async fn test_suggest_slot_on_full_grid() {
    let (db, page) = setup_page(1, 2).await;
    for col in 0..2 {
        placement_service::create_card(&db, page.id, Slot::new(0, col), CardAttrs::labeled("x"))
            .await
            .unwrap();
    }

    let err = placement_service::suggest_slot(&db, page.id).await.unwrap_err();
    assert!(matches!(err, DomainError::GridFull { rows: 1, cols: 2 }));
}

#[tokio::test]
async fn test_concurrent_creates_on_same_slot() {
    let (db, page) = setup_page(3, 3).await;

    let (first, second) = tokio::join!(
        placement_service::create_card(&db, page.id, Slot::new(1, 1), CardAttrs::labeled("A")),
        placement_service::create_card(&db, page.id, Slot::new(1, 1), CardAttrs::labeled("B")),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(DomainError::PositionOccupied { row: 1, col: 1 })))
    );
}

#[tokio::test]
async fn test_page_dimensions_are_clamped() {
    let db = setup_test_db().await;
    let book = create_test_book(&db, "Clamp").await;

    let page = create_test_page(&db, book.id, 0, 25).await;
    assert_eq!((page.grid_rows, page.grid_cols), (1, 10));

    let updated = page_service::update_page(
        &db,
        page.id,
        PageUpdate {
            title: "Bigger".to_string(),
            grid_cols: Some(-3),
            grid_rows: Some(12),
            order: None,
        },
    )
    .await
    .unwrap();
    assert_eq!((updated.grid_rows, updated.grid_cols), (10, 1));
}

#[tokio::test]
async fn test_shrinking_page_cannot_strand_cards() {
    let (db, page) = setup_page(3, 3).await;
    placement_service::create_card(&db, page.id, Slot::new(2, 2), CardAttrs::labeled("Corner"))
        .await
        .unwrap();

    let err = page_service::update_page(
        &db,
        page.id,
        PageUpdate {
            title: "Small".to_string(),
            grid_cols: Some(2),
            grid_rows: Some(2),
            order: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::OutOfBounds {
            row: 2,
            col: 2,
            rows: 2,
            cols: 2
        }
    ));

    let unchanged = page_service::get_page(&db, page.book_id, page.id).await.unwrap();
    assert_eq!((unchanged.grid_rows, unchanged.grid_cols), (3, 3));
}

#[tokio::test]
async fn test_page_grid_layout() {
    let (db, page) = setup_page(2, 3).await;
    placement_service::create_card(&db, page.id, Slot::new(1, 2), CardAttrs::labeled("A"))
        .await
        .unwrap();

    let grid = placement_service::page_grid(&db, page.id).await.unwrap();
    assert_eq!(grid.len(), 2);
    assert!(grid.iter().all(|row| row.len() == 3));
    assert_eq!(grid[1][2].as_ref().map(|c| c.label.as_str()), Some("A"));
    assert_eq!(grid.iter().flatten().filter(|c| c.is_some()).count(), 1);
}

#[tokio::test]
async fn test_no_collisions_after_mixed_operations() {
    let (db, page) = setup_page(3, 3).await;

    let mut ids = Vec::new();
    for i in 0..6 {
        let slot = placement_service::suggest_slot(&db, page.id).await.unwrap();
        let card = placement_service::create_card(&db, page.id, slot, CardAttrs::labeled(format!("c{}", i)))
            .await
            .unwrap();
        ids.push(card.id);
    }

    // Cards sit row-major from (0, 0); collisions must be refused
    let outcome = placement_service::move_card(&db, ids[0], Slot::new(2, 2)).await.unwrap();
    assert_eq!((outcome.old_position, outcome.new_position), (Slot::new(0, 0), Slot::new(2, 2)));

    let outcome = placement_service::move_card(&db, ids[1], Slot::new(0, 0)).await.unwrap();
    assert!(outcome.moved);

    let err = placement_service::move_card(&db, ids[2], Slot::new(2, 2)).await.unwrap_err();
    assert!(matches!(err, DomainError::PositionOccupied { row: 2, col: 2 }));

    placement_service::move_card(&db, ids[3], Slot::new(2, 0)).await.unwrap();

    let err = placement_service::move_card(&db, ids[5], Slot::new(1, 1)).await.unwrap_err();
    assert!(matches!(err, DomainError::PositionOccupied { row: 1, col: 1 }));

    book_service::delete_card(&db, ids[4]).await.unwrap();
    placement_service::move_card(&db, ids[5], Slot::new(1, 1))
        .await
        .expect("slot of the deleted card should be free");

    let cards = placement_service::list_cards(&db, page.id).await.unwrap();
    assert_eq!(cards.len(), 5);
    assert_no_collisions(&cards, &page);
}

#[tokio::test]
async fn test_slot_index_rejects_unchecked_writes() {
    let (db, page) = setup_page(3, 3).await;
    let existing = placement_service::create_card(&db, page.id, Slot::new(0, 0), CardAttrs::labeled("A"))
        .await
        .unwrap();

    // A writer that skips the placement check still hits the unique slot index
    let now = chrono::Utc::now().to_rfc3339();
    let duplicate = card::ActiveModel {
        page_id: Set(page.id),
        slot_row: Set(0),
        slot_col: Set(0),
        row_span: Set(1),
        col_span: Set(1),
        label: Set("B".to_string()),
        background_color: Set("#FFFFFF".to_string()),
        border_color: Set("#000000".to_string()),
        action_type: Set("none".to_string()),
        image_id: Set(None),
        target_page_id: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let err = duplicate.insert(&db).await.unwrap_err();
    assert!(matches!(
        DomainError::from_slot_write(err, Slot::new(0, 0)),
        DomainError::PositionOccupied { row: 0, col: 0 }
    ));

    // Other store failures are not reported as collisions
    assert!(matches!(
        DomainError::from_slot_write(DbErr::Custom("disk full".to_string()), Slot::new(0, 0)),
        DomainError::Database(_)
    ));

    let cards = placement_service::list_cards(&db, page.id).await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id, existing.id);
}
