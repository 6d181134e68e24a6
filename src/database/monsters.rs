//! Monster database operations

use super::models::{MonsterPreviewRecord, MonsterRecord};
use super::Database;

/// SQLite caps bound parameters per statement.
const MAX_BIND_PARAMS: usize = 500;

const PREVIEW_COLUMNS: &str = "monster_index, name, monster_type, challenge_rating, group_name, \
     subtitle, source_name, status, image_json";

const FULL_COLUMNS: &str = "monster_index, name, monster_type, challenge_rating, group_name, \
     subtitle, source_name, status, image_json, data_json";

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Extension trait for monster database operations
pub trait MonsterOps {
    fn list_monster_previews(&self) -> impl std::future::Future<Output = Result<Vec<MonsterPreviewRecord>, sqlx::Error>> + Send;
    fn list_monsters(&self) -> impl std::future::Future<Output = Result<Vec<MonsterRecord>, sqlx::Error>> + Send;
    fn get_monster(&self, index: &str) -> impl std::future::Future<Output = Result<Option<MonsterRecord>, sqlx::Error>> + Send;
    fn get_monsters_by_indexes(&self, indexes: &[String]) -> impl std::future::Future<Output = Result<Vec<MonsterRecord>, sqlx::Error>> + Send;
    fn list_monsters_by_status(&self, statuses: &[&str]) -> impl std::future::Future<Output = Result<Vec<MonsterRecord>, sqlx::Error>> + Send;
    fn save_monsters(&self, records: &[MonsterRecord], replace_imported: bool) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn delete_monster(&self, index: &str) -> impl std::future::Future<Output = Result<bool, sqlx::Error>> + Send;
    fn count_monsters(&self) -> impl std::future::Future<Output = Result<i64, sqlx::Error>> + Send;
}

impl MonsterOps for Database {
    async fn list_monster_previews(&self) -> Result<Vec<MonsterPreviewRecord>, sqlx::Error> {
        let sql = format!("SELECT {PREVIEW_COLUMNS} FROM monsters ORDER BY name COLLATE NOCASE");
        sqlx::query_as::<_, MonsterPreviewRecord>(&sql)
            .fetch_all(self.pool())
            .await
    }

    async fn list_monsters(&self) -> Result<Vec<MonsterRecord>, sqlx::Error> {
        let sql = format!("SELECT {FULL_COLUMNS} FROM monsters ORDER BY name COLLATE NOCASE");
        sqlx::query_as::<_, MonsterRecord>(&sql)
            .fetch_all(self.pool())
            .await
    }

    async fn get_monster(&self, index: &str) -> Result<Option<MonsterRecord>, sqlx::Error> {
        let sql = format!("SELECT {FULL_COLUMNS} FROM monsters WHERE monster_index = ?");
        sqlx::query_as::<_, MonsterRecord>(&sql)
            .bind(index)
            .fetch_optional(self.pool())
            .await
    }

    async fn get_monsters_by_indexes(&self, indexes: &[String]) -> Result<Vec<MonsterRecord>, sqlx::Error> {
        let mut records = Vec::with_capacity(indexes.len());
        for chunk in indexes.chunks(MAX_BIND_PARAMS) {
            let sql = format!(
                "SELECT {FULL_COLUMNS} FROM monsters WHERE monster_index IN ({})",
                placeholders(chunk.len())
            );
            let mut query = sqlx::query_as::<_, MonsterRecord>(&sql);
            for index in chunk {
                query = query.bind(index);
            }
            records.extend(query.fetch_all(self.pool()).await?);
        }
        Ok(records)
    }

    async fn list_monsters_by_status(&self, statuses: &[&str]) -> Result<Vec<MonsterRecord>, sqlx::Error> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {FULL_COLUMNS} FROM monsters WHERE status IN ({}) ORDER BY name COLLATE NOCASE",
            placeholders(statuses.len())
        );
        let mut query = sqlx::query_as::<_, MonsterRecord>(&sql);
        for status in statuses {
            query = query.bind(*status);
        }
        query.fetch_all(self.pool()).await
    }

    /// Upsert `records` in one transaction. With `replace_imported`, rows
    /// still marked `imported` are removed first so monsters dropped upstream
    /// disappear locally.
    async fn save_monsters(&self, records: &[MonsterRecord], replace_imported: bool) -> Result<(), sqlx::Error> {
        let mut tx = self.pool().begin().await?;

        if replace_imported {
            sqlx::query("DELETE FROM monsters WHERE status = 'imported'")
                .execute(&mut *tx)
                .await?;
        }

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO monsters
                    (monster_index, name, monster_type, challenge_rating, group_name,
                     subtitle, source_name, status, image_json, data_json, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'))
                ON CONFLICT(monster_index) DO UPDATE SET
                    name = excluded.name,
                    monster_type = excluded.monster_type,
                    challenge_rating = excluded.challenge_rating,
                    group_name = excluded.group_name,
                    subtitle = excluded.subtitle,
                    source_name = excluded.source_name,
                    status = excluded.status,
                    image_json = excluded.image_json,
                    data_json = excluded.data_json,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(&record.monster_index)
            .bind(&record.name)
            .bind(&record.monster_type)
            .bind(record.challenge_rating)
            .bind(&record.group_name)
            .bind(&record.subtitle)
            .bind(&record.source_name)
            .bind(&record.status)
            .bind(&record.image_json)
            .bind(&record.data_json)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_monster(&self, index: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM monsters WHERE monster_index = ?")
            .bind(index)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_monsters(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM monsters")
            .fetch_one(self.pool())
            .await
    }
}
