//! Key-value settings (content language, content version, last sync time).

use super::Database;
use sqlx::Row;

/// Extension trait for settings database operations
pub trait SettingsOps {
    fn get_setting(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>, sqlx::Error>> + Send;
    fn set_setting(&self, key: &str, value: &str) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn delete_setting(&self, key: &str) -> impl std::future::Future<Output = Result<bool, sqlx::Error>> + Send;
    fn list_settings(&self) -> impl std::future::Future<Output = Result<Vec<(String, String)>, sqlx::Error>> + Send;
}

impl SettingsOps for Database {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool())
            .await
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at) VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn delete_setting(&self, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM settings WHERE key = ?")
            .bind(key)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_settings(&self) -> Result<Vec<(String, String)>, sqlx::Error> {
        let rows = sqlx::query("SELECT key, value FROM settings ORDER BY key")
            .fetch_all(self.pool())
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| (r.get("key"), r.get("value")))
            .collect())
    }
}
