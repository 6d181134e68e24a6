//! Database Migrations
//!
//! Versioned schema migrations tracked in the `_migrations` table.

use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tracing::info;

/// `(version, name, sql)` in application order.
const MIGRATIONS: &[(i32, &str, &str)] = &[
    (1, "compendium_schema", MIGRATION_V1),
    (2, "monster_name_index", MIGRATION_V2),
    (3, "monster_folders", MIGRATION_V3),
];

/// Version of the newest migration.
pub const SCHEMA_VERSION: i32 = MIGRATIONS.len() as i32;

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current_version = current_version(pool).await?;
    info!(current_version, target_version = SCHEMA_VERSION, "Checking database migrations");

    for &(version, name, sql) in MIGRATIONS.iter().filter(|(v, _, _)| *v > current_version) {
        apply(pool, version, name, sql).await?;
    }

    Ok(())
}

/// Highest applied migration, 0 on a fresh database.
pub async fn current_version(pool: &SqlitePool) -> Result<i32, sqlx::Error> {
    let row = sqlx::query("SELECT MAX(version) AS version FROM _migrations")
        .fetch_optional(pool)
        .await?;

    Ok(row
        .and_then(|r| r.try_get::<Option<i32>, _>("version").ok().flatten())
        .unwrap_or(0))
}

async fn apply(pool: &SqlitePool, version: i32, name: &str, sql: &str) -> Result<(), sqlx::Error> {
    info!(version, name, "Applying migration");

    let mut tx = pool.begin().await?;
    for statement in sql.split(';').filter(|s| !s.trim().is_empty()) {
        sqlx::query(statement.trim()).execute(&mut *tx).await?;
    }
    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(version)
        .bind(name)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(())
}

/// Migration v1: monsters, spells and settings
const MIGRATION_V1: &str = r#"
CREATE TABLE IF NOT EXISTS monsters (
    monster_index TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    monster_type TEXT NOT NULL,
    challenge_rating REAL NOT NULL,
    group_name TEXT,
    subtitle TEXT NOT NULL DEFAULT '',
    source_name TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'imported',
    image_json TEXT NOT NULL DEFAULT '{}',
    data_json TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_monsters_status ON monsters(status);

CREATE TABLE IF NOT EXISTS spells (
    spell_index TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    level INTEGER NOT NULL,
    school TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'imported',
    data_json TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_spells_status ON spells(status);

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
"#;

/// Migration v2: case-insensitive name ordering for previews
const MIGRATION_V2: &str = r#"
CREATE INDEX IF NOT EXISTS idx_monsters_name ON monsters(name COLLATE NOCASE)
"#;

/// Migration v3: user folders and the folder preview.
///
/// Neither table references `monsters`: sync replaces imported rows, and a
/// folder keeps its entries for monsters that come back later.
const MIGRATION_V3: &str = r#"
CREATE TABLE IF NOT EXISTS monster_folders (
    folder_name TEXT NOT NULL,
    monster_index TEXT NOT NULL,
    added_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (folder_name, monster_index)
);

CREATE TABLE IF NOT EXISTS folder_preview (
    monster_index TEXT PRIMARY KEY,
    added_at TEXT NOT NULL DEFAULT (datetime('now'))
)
"#;
