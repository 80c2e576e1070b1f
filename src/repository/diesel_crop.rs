//! Diesel-based crop repository for SQLite.
//!
//! Crops own their care tips, so tip access lives here too. Catalog rows
//! are reference data: written by the seed command, read by the pages and
//! the classify endpoint.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::diesel_models::{CropRecord, CropTipRecord, NewCrop, NewCropTip};
use super::diesel_pool::{AsyncSqlitePool, DieselError};
use super::util::last_insert_rowid;
use super::parse_datetime;
use crate::models::{Crop, CropTip, Season, TipCategory};
use crate::schema::{crop_tips, crops};

/// Convert a database record to a domain model.
impl From<CropRecord> for Crop {
    fn from(record: CropRecord) -> Self {
        Crop {
            id: record.id,
            name: record.name,
            scientific_name: record.scientific_name,
            description: record.description,
            image_path: record.image_path,
            created_at: parse_datetime(&record.created_at),
            updated_at: parse_datetime(&record.updated_at),
        }
    }
}

impl From<CropTipRecord> for CropTip {
    fn from(record: CropTipRecord) -> Self {
        CropTip {
            id: record.id,
            crop_id: record.crop_id,
            title: record.title,
            content: record.content,
            tip_type: TipCategory::from_str(&record.tip_type).unwrap_or(TipCategory::General),
            season: Season::from_str(&record.season).unwrap_or(Season::All),
            created_at: parse_datetime(&record.created_at),
            updated_at: parse_datetime(&record.updated_at),
        }
    }
}

/// Diesel-based crop repository with compile-time query checking.
#[derive(Clone)]
pub struct CropRepository {
    pool: AsyncSqlitePool,
}

impl CropRepository {
    /// Create a new crop repository with an existing pool.
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// Get a crop by id.
    pub async fn get(&self, id: i64) -> Result<Option<Crop>, DieselError> {
        let mut conn = self.pool.get().await?;

        crops::table
            .find(id)
            .first::<CropRecord>(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(Crop::from))
    }

    /// Get all crops ordered by name.
    pub async fn get_all(&self) -> Result<Vec<Crop>, DieselError> {
        let mut conn = self.pool.get().await?;

        crops::table
            .order(crops::name.asc())
            .load::<CropRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(Crop::from).collect())
    }

    /// Find a crop by name, case-insensitively.
    ///
    /// SQLite LIKE without wildcards is a case-insensitive equality match
    /// for ASCII, which covers the taxonomy's crop names.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Crop>, DieselError> {
        let mut conn = self.pool.get().await?;

        crops::table
            .filter(crops::name.like(name.trim()))
            .first::<CropRecord>(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(Crop::from))
    }

    /// Insert a crop, returning its new id.
    pub async fn insert(&self, crop: &Crop) -> Result<i64, DieselError> {
        let mut conn = self.pool.get().await?;
        let created_at = crop.created_at.to_rfc3339();
        let updated_at = crop.updated_at.to_rfc3339();

        diesel::insert_into(crops::table)
            .values(NewCrop {
                name: &crop.name,
                scientific_name: &crop.scientific_name,
                description: &crop.description,
                image_path: crop.image_path.as_deref(),
                created_at: &created_at,
                updated_at: &updated_at,
            })
            .execute(&mut conn)
            .await?;

        diesel::select(last_insert_rowid()).first(&mut conn).await
    }

    /// Delete a crop. Diseases, treatments, and tips cascade.
    pub async fn delete(&self, id: i64) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;

        let rows = diesel::delete(crops::table.find(id))
            .execute(&mut conn)
            .await?;

        Ok(rows > 0)
    }

    /// All tips for a crop, ordered by category then title.
    pub async fn tips_for(&self, crop_id: i64) -> Result<Vec<CropTip>, DieselError> {
        let mut conn = self.pool.get().await?;

        crop_tips::table
            .filter(crop_tips::crop_id.eq(crop_id))
            .order((crop_tips::tip_type.asc(), crop_tips::title.asc()))
            .load::<CropTipRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(CropTip::from).collect())
    }

    /// Insert a care tip for a crop, returning its new id.
    pub async fn insert_tip(&self, tip: &CropTip) -> Result<i64, DieselError> {
        let mut conn = self.pool.get().await?;
        let created_at = tip.created_at.to_rfc3339();
        let updated_at = tip.updated_at.to_rfc3339();

        diesel::insert_into(crop_tips::table)
            .values(NewCropTip {
                crop_id: tip.crop_id,
                title: &tip.title,
                content: &tip.content,
                tip_type: tip.tip_type.as_str(),
                season: tip.season.as_str(),
                created_at: &created_at,
                updated_at: &updated_at,
            })
            .execute(&mut conn)
            .await?;

        diesel::select(last_insert_rowid()).first(&mut conn).await
    }

    /// Count all crops.
    pub async fn count(&self) -> Result<u64, DieselError> {
        let mut conn = self.pool.get().await?;

        let count: i64 = crops::table.count().first(&mut conn).await?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Crop, CropTip, TipCategory};
    use crate::repository::diesel_context::DbContext;
    use tempfile::tempdir;

    async fn setup() -> (DbContext, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let ctx = DbContext::from_sqlite_path(&dir.path().join("test.db"));
        ctx.init_schema().await.unwrap();
        (ctx, dir)
    }

    #[tokio::test]
    async fn test_crop_crud() {
        let (ctx, _dir) = setup().await;
        let repo = ctx.crops();

        let crop = Crop::new(
            "Tomato".to_string(),
            "Solanum lycopersicum".to_string(),
            "Warm-season fruiting vegetable.".to_string(),
        );
        let id = repo.insert(&crop).await.unwrap();
        assert!(id > 0);

        let fetched = repo.get(id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Tomato");
        assert_eq!(fetched.scientific_name, "Solanum lycopersicum");

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 1);

        assert!(repo.delete(id).await.unwrap());
        assert!(repo.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_name_is_case_insensitive() {
        let (ctx, _dir) = setup().await;
        let repo = ctx.crops();

        let id = repo
            .insert(&Crop::new("Apple".to_string(), String::new(), String::new()))
            .await
            .unwrap();

        let found = repo.find_by_name("aPPle").await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert!(repo.find_by_name("Pear").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tips_cascade_with_crop() {
        let (ctx, _dir) = setup().await;
        let repo = ctx.crops();

        let crop_id = repo
            .insert(&Crop::new("Grape".to_string(), String::new(), String::new()))
            .await
            .unwrap();
        repo.insert_tip(&CropTip::new(
            crop_id,
            "Prune in late winter".to_string(),
            "Remove last season's fruiting canes.".to_string(),
            TipCategory::Pruning,
        ))
        .await
        .unwrap();

        assert_eq!(repo.tips_for(crop_id).await.unwrap().len(), 1);

        repo.delete(crop_id).await.unwrap();
        assert!(repo.tips_for(crop_id).await.unwrap().is_empty());
    }
}
