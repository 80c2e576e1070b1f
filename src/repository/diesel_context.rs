//! Diesel database context for managing connections and repository access.
//!
//! Provides a unified entry point for database operations using Diesel ORM
//! over SQLite.

use std::path::Path;

use diesel_async::SimpleAsyncConnection;

use super::diesel_crop::CropRepository;
use super::diesel_disease::DiseaseRepository;
use super::diesel_prediction::PredictionRepository;
use super::diesel_pool::{AsyncSqlitePool, DieselError};

/// Database context that manages the connection factory and provides
/// repository access.
///
/// # Example
/// ```ignore
/// let ctx = DbContext::from_sqlite_path(&db_path);
/// ctx.init_schema().await?;
/// let crops = ctx.crops().get_all().await?;
/// ```
#[derive(Clone)]
pub struct DbContext {
    pool: AsyncSqlitePool,
}

impl DbContext {
    /// Create a new database context from a SQLite file path.
    pub fn from_sqlite_path(db_path: &Path) -> Self {
        Self {
            pool: AsyncSqlitePool::from_path(db_path),
        }
    }

    /// Create a new database context from a database URL.
    pub fn from_url(database_url: &str) -> Self {
        Self {
            pool: AsyncSqlitePool::new(database_url),
        }
    }

    /// Get the underlying connection pool.
    #[allow(dead_code)]
    pub fn pool(&self) -> &AsyncSqlitePool {
        &self.pool
    }

    /// Get a crop repository.
    pub fn crops(&self) -> CropRepository {
        CropRepository::new(self.pool.clone())
    }

    /// Get a disease repository.
    pub fn diseases(&self) -> DiseaseRepository {
        DiseaseRepository::new(self.pool.clone())
    }

    /// Get a prediction repository.
    pub fn predictions(&self) -> PredictionRepository {
        PredictionRepository::new(self.pool.clone())
    }

    /// Initialize the database schema.
    ///
    /// Creates the necessary tables if they don't exist. Catalog child
    /// tables cascade with their parents; prediction links nullify so
    /// history survives catalog deletions.
    pub async fn init_schema(&self) -> Result<(), DieselError> {
        let mut conn = self.pool.get().await?;

        conn.batch_execute(
            r#"
            -- Crops table
            CREATE TABLE IF NOT EXISTS crops (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                scientific_name TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                image_path TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Diseases table
            CREATE TABLE IF NOT EXISTS diseases (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                crop_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(crop_id, name),
                FOREIGN KEY (crop_id) REFERENCES crops(id) ON DELETE CASCADE
            );

            -- Treatments table
            CREATE TABLE IF NOT EXISTS treatments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                disease_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                instructions TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (disease_id) REFERENCES diseases(id) ON DELETE CASCADE
            );

            -- Crop care tips table
            CREATE TABLE IF NOT EXISTS crop_tips (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                crop_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                tip_type TEXT NOT NULL DEFAULT 'general',
                season TEXT NOT NULL DEFAULT 'all',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (crop_id) REFERENCES crops(id) ON DELETE CASCADE
            );

            -- Prediction history table (append-only)
            CREATE TABLE IF NOT EXISTS predictions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                image_path TEXT,
                predicted_crop TEXT NOT NULL,
                predicted_disease TEXT NOT NULL,
                confidence_score DOUBLE NOT NULL,
                crop_id INTEGER,
                disease_id INTEGER,
                treatment_id INTEGER,
                actual_crop TEXT NOT NULL DEFAULT '',
                actual_disease TEXT NOT NULL DEFAULT '',
                is_correct BOOLEAN,
                created_at TEXT NOT NULL,
                FOREIGN KEY (crop_id) REFERENCES crops(id) ON DELETE SET NULL,
                FOREIGN KEY (disease_id) REFERENCES diseases(id) ON DELETE SET NULL,
                FOREIGN KEY (treatment_id) REFERENCES treatments(id) ON DELETE SET NULL
            );

            -- Indexes
            CREATE INDEX IF NOT EXISTS idx_diseases_crop ON diseases(crop_id);
            CREATE INDEX IF NOT EXISTS idx_treatments_disease ON treatments(disease_id);
            CREATE INDEX IF NOT EXISTS idx_crop_tips_crop ON crop_tips(crop_id);
            CREATE INDEX IF NOT EXISTS idx_predictions_created ON predictions(created_at);
            "#,
        )
        .await
    }

    /// Get list of all tables in the database.
    #[allow(dead_code)]
    pub async fn list_tables(&self) -> Result<Vec<String>, DieselError> {
        let mut conn = self.pool.get().await?;

        let rows: Vec<TableName> = diesel_async::RunQueryDsl::load(
            diesel::sql_query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            ),
            &mut conn,
        )
        .await?;
        Ok(rows.into_iter().map(|r| r.name).collect())
    }
}

#[derive(diesel::QueryableByName)]
#[allow(dead_code)]
struct TableName {
    #[diesel(sql_type = diesel::sql_types::Text)]
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_init_schema_creates_tables() {
        let dir = tempdir().unwrap();
        let ctx = DbContext::from_sqlite_path(&dir.path().join("test.db"));

        ctx.init_schema().await.unwrap();

        let tables = ctx.list_tables().await.unwrap();
        for expected in ["crops", "diseases", "treatments", "crop_tips", "predictions"] {
            assert!(tables.contains(&expected.to_string()), "missing {expected}");
        }

        // Idempotent
        ctx.init_schema().await.unwrap();
        assert!(ctx.crops().get_all().await.unwrap().is_empty());
    }
}
