//! Monster folder database operations
//!
//! Folder and preview rows only hold monster indexes. Reads join against
//! `monsters`, so entries whose monster is gone are skipped, and rows come
//! back in insertion order.

use super::models::{FolderSummaryRecord, MonsterPreviewRecord};
use super::Database;

const JOINED_PREVIEW_COLUMNS: &str = "m.monster_index, m.name, m.monster_type, m.challenge_rating, \
     m.group_name, m.subtitle, m.source_name, m.status, m.image_json";

/// Extension trait for folder database operations
pub trait FolderOps {
    fn list_folders(&self) -> impl std::future::Future<Output = Result<Vec<FolderSummaryRecord>, sqlx::Error>> + Send;
    fn list_folder_monsters(&self, folder: &str) -> impl std::future::Future<Output = Result<Vec<MonsterPreviewRecord>, sqlx::Error>> + Send;
    fn add_to_folder(&self, folder: &str, indexes: &[String]) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn remove_from_folder(&self, folder: &str, indexes: &[String]) -> impl std::future::Future<Output = Result<u64, sqlx::Error>> + Send;
    fn delete_folder(&self, folder: &str) -> impl std::future::Future<Output = Result<bool, sqlx::Error>> + Send;
    fn list_folder_preview(&self) -> impl std::future::Future<Output = Result<Vec<MonsterPreviewRecord>, sqlx::Error>> + Send;
    fn add_to_folder_preview(&self, index: &str) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn remove_from_folder_preview(&self, index: &str) -> impl std::future::Future<Output = Result<bool, sqlx::Error>> + Send;
    fn clear_folder_preview(&self) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
}

impl FolderOps for Database {
    async fn list_folders(&self) -> Result<Vec<FolderSummaryRecord>, sqlx::Error> {
        sqlx::query_as::<_, FolderSummaryRecord>(
            r#"
            SELECT f.folder_name AS folder_name, COUNT(*) AS monster_count
            FROM monster_folders f
            JOIN monsters m ON m.monster_index = f.monster_index
            GROUP BY f.folder_name
            ORDER BY f.folder_name COLLATE NOCASE
            "#,
        )
        .fetch_all(self.pool())
        .await
    }

    async fn list_folder_monsters(&self, folder: &str) -> Result<Vec<MonsterPreviewRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT {JOINED_PREVIEW_COLUMNS} FROM monster_folders f \
             JOIN monsters m ON m.monster_index = f.monster_index \
             WHERE f.folder_name = ? ORDER BY f.rowid"
        );
        sqlx::query_as::<_, MonsterPreviewRecord>(&sql)
            .bind(folder)
            .fetch_all(self.pool())
            .await
    }

    /// Indexes already in the folder keep their position.
    async fn add_to_folder(&self, folder: &str, indexes: &[String]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool().begin().await?;
        for index in indexes {
            sqlx::query(
                "INSERT INTO monster_folders (folder_name, monster_index) VALUES (?, ?) \
                 ON CONFLICT(folder_name, monster_index) DO NOTHING",
            )
            .bind(folder)
            .bind(index)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn remove_from_folder(&self, folder: &str, indexes: &[String]) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool().begin().await?;
        let mut removed = 0;
        for index in indexes {
            removed += sqlx::query("DELETE FROM monster_folders WHERE folder_name = ? AND monster_index = ?")
                .bind(folder)
                .bind(index)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }
        tx.commit().await?;
        Ok(removed)
    }

    async fn delete_folder(&self, folder: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM monster_folders WHERE folder_name = ?")
            .bind(folder)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_folder_preview(&self) -> Result<Vec<MonsterPreviewRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT {JOINED_PREVIEW_COLUMNS} FROM folder_preview p \
             JOIN monsters m ON m.monster_index = p.monster_index ORDER BY p.rowid"
        );
        sqlx::query_as::<_, MonsterPreviewRecord>(&sql)
            .fetch_all(self.pool())
            .await
    }

    async fn add_to_folder_preview(&self, index: &str) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO folder_preview (monster_index) VALUES (?) ON CONFLICT(monster_index) DO NOTHING")
            .bind(index)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn remove_from_folder_preview(&self, index: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM folder_preview WHERE monster_index = ?")
            .bind(index)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_folder_preview(&self) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM folder_preview")
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
