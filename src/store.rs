//! # Record Store
//!
//! SQLite-backed store for submitted projects, using sqlx.
//! One table, two operations: insert a completed submission, list a user's
//! records in insertion order. Records are immutable once created.

use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

/// Any failure reading or writing the record store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A stored project record.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub url: String,
    pub status: String,
    pub photo: Option<Vec<u8>>,
}

/// A completed submission, ready to insert.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub url: String,
    pub status: String,
    pub photo: Option<Vec<u8>>,
}

/// SQLite-backed record store.
#[derive(Clone)]
pub struct ProjectStore {
    pool: SqlitePool,
}

impl ProjectStore {
    /// Opens (creating if missing) the database file at `path`.
    pub async fn connect(path: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Idempotent schema setup, invoked once at process start.
    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS projects
             (id INTEGER PRIMARY KEY AUTOINCREMENT,
              user_id INTEGER,
              project_name TEXT,
              description TEXT,
              url TEXT,
              status TEXT,
              photo BLOB)",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Inserts a new record and returns its id.
    pub async fn create(&self, new: NewProject) -> Result<i64, StorageError> {
        let result = sqlx::query(
            "INSERT INTO projects (user_id, project_name, description, url, status, photo)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(new.owner_id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.url)
        .bind(&new.status)
        .bind(&new.photo)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Returns all records for `owner_id` in insertion order.
    pub async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Project>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, user_id, project_name, description, url, status, photo
             FROM projects WHERE user_id = ? ORDER BY id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let mut projects = Vec::with_capacity(rows.len());
        for row in &rows {
            projects.push(Project {
                id: row.try_get("id")?,
                owner_id: row.try_get("user_id")?,
                name: row.try_get("project_name")?,
                description: row.try_get("description")?,
                url: row.try_get("url")?,
                status: row.try_get("status")?,
                photo: row.try_get("photo")?,
            });
        }

        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> ProjectStore {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        let store = ProjectStore::connect(db_path.to_str().unwrap())
            .await
            .unwrap();
        store.ensure_schema().await.unwrap();
        store
    }

    fn make_project(owner_id: i64, name: &str, photo: Option<Vec<u8>>) -> NewProject {
        NewProject {
            owner_id,
            name: name.to_string(),
            description: format!("{name} description"),
            url: "http://example.com".to_string(),
            status: "live".to_string(),
            photo,
        }
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let store = test_store().await;
        store.ensure_schema().await.unwrap();
        store.ensure_schema().await.unwrap();
    }

    #[tokio::test]
    async fn create_and_list_roundtrip() {
        let store = test_store().await;

        let id = store
            .create(make_project(42, "Demo", Some(vec![1, 2, 3])))
            .await
            .unwrap();
        assert!(id > 0);

        let projects = store.list_by_owner(42).await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, id);
        assert_eq!(projects[0].owner_id, 42);
        assert_eq!(projects[0].name, "Demo");
        assert_eq!(projects[0].description, "Demo description");
        assert_eq!(projects[0].url, "http://example.com");
        assert_eq!(projects[0].status, "live");
        assert_eq!(projects[0].photo.as_deref(), Some(&[1u8, 2, 3][..]));
    }

    #[tokio::test]
    async fn missing_photo_is_stored_as_null() {
        let store = test_store().await;
        store.create(make_project(1, "NoPic", None)).await.unwrap();

        let projects = store.list_by_owner(1).await.unwrap();
        assert_eq!(projects.len(), 1);
        assert!(projects[0].photo.is_none());
    }

    #[tokio::test]
    async fn list_returns_insertion_order_and_monotonic_ids() {
        let store = test_store().await;
        let a = store.create(make_project(9, "First", None)).await.unwrap();
        let b = store.create(make_project(9, "Second", None)).await.unwrap();
        let c = store.create(make_project(9, "Third", None)).await.unwrap();
        assert!(a < b && b < c);

        let names: Vec<String> = store
            .list_by_owner(9)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn list_is_scoped_to_owner() {
        let store = test_store().await;
        store.create(make_project(1, "Mine", None)).await.unwrap();
        store.create(make_project(2, "Theirs", None)).await.unwrap();

        let mine = store.list_by_owner(1).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "Mine");
    }

    #[tokio::test]
    async fn listing_unknown_owner_is_empty_not_an_error() {
        let store = test_store().await;
        let projects = store.list_by_owner(12345).await.unwrap();
        assert!(projects.is_empty());
    }
}
