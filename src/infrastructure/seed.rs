use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::domain::{CardAttrs, DomainError, NewBook, NewPage};
use crate::models::book;
use crate::services::placement_service::{find_free_slot, occupied_slots};
use crate::services::{book_service, navigation_service, page_service, placement_service};

const DEMO_LABELS: [&str; 6] = ["Ciao", "Casa", "Mangiare", "Bere", "Dormire", "Giocare"];

/// One book with a 3x3 home page holding six cards.
/// Does nothing when the store already has books.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DomainError> {
    let existing = book::Entity::find().count(db).await?;
    if existing > 0 {
        tracing::info!("{} books already present, skipping demo data", existing);
        return Ok(());
    }

    let book = book_service::create_book(
        db,
        NewBook {
            title: "Il Mio Primo Libro AAC".to_owned(),
            locale: Some("it-IT".to_owned()),
        },
    )
    .await?;

    let page = page_service::create_page(
        db,
        book.id,
        NewPage {
            title: "Pagina Principale".to_owned(),
            grid_cols: Some(3),
            grid_rows: Some(3),
        },
    )
    .await?;
    navigation_service::set_home_page(db, book.id, page.id).await?;

    let mut cards = Vec::new();
    for label in DEMO_LABELS {
        let slot = find_free_slot(page.grid(), &occupied_slots(&cards));
        let card =
            placement_service::create_card(db, page.id, slot, CardAttrs::labeled(label)).await?;
        cards.push(card);
    }

    tracing::info!(
        "Demo book {} seeded: page {} with {} cards",
        book.id,
        page.id,
        cards.len()
    );
    Ok(())
}
