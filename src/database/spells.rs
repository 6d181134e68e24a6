//! Spell database operations

use super::models::SpellRecord;
use super::Database;

const MAX_BIND_PARAMS: usize = 500;

/// Extension trait for spell database operations
pub trait SpellOps {
    fn get_spell(&self, index: &str) -> impl std::future::Future<Output = Result<Option<SpellRecord>, sqlx::Error>> + Send;
    fn get_spells_by_indexes(&self, indexes: &[String]) -> impl std::future::Future<Output = Result<Vec<SpellRecord>, sqlx::Error>> + Send;
    fn list_spells_by_status(&self, status: &str) -> impl std::future::Future<Output = Result<Vec<SpellRecord>, sqlx::Error>> + Send;
    fn save_spells(&self, records: &[SpellRecord], replace_imported: bool) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
}

impl SpellOps for Database {
    async fn get_spell(&self, index: &str) -> Result<Option<SpellRecord>, sqlx::Error> {
        sqlx::query_as::<_, SpellRecord>(
            "SELECT spell_index, name, level, school, status, data_json FROM spells WHERE spell_index = ?",
        )
        .bind(index)
        .fetch_optional(self.pool())
        .await
    }

    async fn get_spells_by_indexes(&self, indexes: &[String]) -> Result<Vec<SpellRecord>, sqlx::Error> {
        let mut records = Vec::with_capacity(indexes.len());
        for chunk in indexes.chunks(MAX_BIND_PARAMS) {
            let sql = format!(
                "SELECT spell_index, name, level, school, status, data_json FROM spells WHERE spell_index IN ({})",
                vec!["?"; chunk.len()].join(", ")
            );
            let mut query = sqlx::query_as::<_, SpellRecord>(&sql);
            for index in chunk {
                query = query.bind(index);
            }
            records.extend(query.fetch_all(self.pool()).await?);
        }
        Ok(records)
    }

    async fn list_spells_by_status(&self, status: &str) -> Result<Vec<SpellRecord>, sqlx::Error> {
        sqlx::query_as::<_, SpellRecord>(
            "SELECT spell_index, name, level, school, status, data_json FROM spells WHERE status = ? ORDER BY name",
        )
        .bind(status)
        .fetch_all(self.pool())
        .await
    }

    async fn save_spells(&self, records: &[SpellRecord], replace_imported: bool) -> Result<(), sqlx::Error> {
        let mut tx = self.pool().begin().await?;

        if replace_imported {
            sqlx::query("DELETE FROM spells WHERE status = 'imported'")
                .execute(&mut *tx)
                .await?;
        }

        for record in records {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO spells (spell_index, name, level, school, status, data_json, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, datetime('now'))
                "#,
            )
            .bind(&record.spell_index)
            .bind(&record.name)
            .bind(record.level)
            .bind(&record.school)
            .bind(&record.status)
            .bind(&record.data_json)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
