//! Schema setup
//!
//! Every statement is `IF NOT EXISTS`, so running this on each start is safe.
//! There is no migration history; tables are created in their final shape.

use sqlx::SqlitePool;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS system_info (
        user_id INTEGER PRIMARY KEY,
        os TEXT NOT NULL CHECK (length(trim(os)) > 0),
        cpu TEXT NOT NULL CHECK (length(trim(cpu)) > 0),
        gpu TEXT NOT NULL CHECK (length(trim(gpu)) > 0),
        memory TEXT NOT NULL CHECK (length(trim(memory)) > 0),
        storage TEXT NOT NULL CHECK (length(trim(storage)) > 0),
        keyboard TEXT,
        mouse TEXT,
        other_controllers TEXT,
        audio_config TEXT,
        updated_at DATETIME NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_system_info_updated
    ON system_info(updated_at)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS hangar_ships (
        user_id INTEGER NOT NULL,
        position INTEGER NOT NULL,
        ship_code TEXT NOT NULL CHECK (length(trim(ship_code)) > 0),
        name TEXT NOT NULL CHECK (length(trim(name)) > 0),
        manufacturer_code TEXT NOT NULL,
        manufacturer_name TEXT NOT NULL CHECK (length(trim(manufacturer_name)) > 0),
        ship_name TEXT NOT NULL,
        lti BOOLEAN NOT NULL,
        warbond BOOLEAN NOT NULL,
        entity_type TEXT NOT NULL,
        pledge_id TEXT NOT NULL,
        pledge_name TEXT NOT NULL,
        pledge_date TEXT NOT NULL,
        pledge_cost TEXT NOT NULL,
        PRIMARY KEY (user_id, ship_code, pledge_id, position)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_hangar_ships_user
    ON hangar_ships(user_id)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_hangar_ships_model
    ON hangar_ships(manufacturer_name, name)
    "#,
];

/// Create tables and indexes that do not exist yet
pub async fn ensure_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!("Schema ensured ({} statements)", STATEMENTS.len());
    Ok(())
}
