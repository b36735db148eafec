use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let statements = [
        // home_page_id is resolved by the services, not by a foreign key:
        // pages reference books and books reference pages.
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            locale TEXT NOT NULL DEFAULT 'it-IT',
            home_page_id INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS pages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            grid_cols INTEGER NOT NULL DEFAULT 3,
            grid_rows INTEGER NOT NULL DEFAULT 3,
            "order" INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (book_id) REFERENCES books(id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS assets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,
            url TEXT NOT NULL,
            alt TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            page_id INTEGER NOT NULL,
            slot_row INTEGER NOT NULL,
            slot_col INTEGER NOT NULL,
            row_span INTEGER NOT NULL DEFAULT 1,
            col_span INTEGER NOT NULL DEFAULT 1,
            label TEXT NOT NULL,
            background_color TEXT NOT NULL DEFAULT '#FFFFFF',
            border_color TEXT NOT NULL DEFAULT '#000000',
            action_type TEXT NOT NULL DEFAULT 'none',
            image_id INTEGER,
            target_page_id INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (page_id) REFERENCES pages(id),
            FOREIGN KEY (image_id) REFERENCES assets(id)
        )
        "#,
        // Last line of defence for the one-card-per-slot rule
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_cards_page_slot
            ON cards (page_id, slot_row, slot_col)
        "#,
        "CREATE INDEX IF NOT EXISTS idx_pages_book ON pages (book_id)",
        "CREATE INDEX IF NOT EXISTS idx_cards_image ON cards (image_id)",
    ];

    for sql in statements {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            sql.to_owned(),
        ))
        .await?;
    }

    Ok(())
}
