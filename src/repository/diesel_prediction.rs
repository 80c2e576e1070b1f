//! Diesel-based prediction history repository for SQLite.
//!
//! Prediction rows are append-only: the inference path inserts exactly one
//! row per recorded request and never updates the predicted fields. The
//! only later mutation is ground-truth entry, which is an operator concern.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::diesel_models::{NewPrediction, PredictionRecord};
use super::diesel_pool::{AsyncSqlitePool, DieselError};
use super::util::last_insert_rowid;
use super::parse_datetime;
use crate::models::{Prediction, PredictionStats};
use crate::schema::predictions;

impl From<PredictionRecord> for Prediction {
    fn from(record: PredictionRecord) -> Self {
        Prediction {
            id: record.id,
            image_path: record.image_path,
            predicted_crop: record.predicted_crop,
            predicted_disease: record.predicted_disease,
            confidence_score: record.confidence_score,
            crop_id: record.crop_id,
            disease_id: record.disease_id,
            treatment_id: record.treatment_id,
            actual_crop: record.actual_crop,
            actual_disease: record.actual_disease,
            is_correct: record.is_correct,
            created_at: parse_datetime(&record.created_at),
        }
    }
}

/// Diesel-based prediction repository with compile-time query checking.
#[derive(Clone)]
pub struct PredictionRepository {
    pool: AsyncSqlitePool,
}

impl PredictionRepository {
    /// Create a new prediction repository with an existing pool.
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// Insert one history row, returning its new id.
    ///
    /// The confidence is stored exactly as decoded. No deduplication:
    /// byte-identical uploads still get their own rows.
    pub async fn insert(&self, prediction: &Prediction) -> Result<i64, DieselError> {
        let mut conn = self.pool.get().await?;
        let created_at = prediction.created_at.to_rfc3339();

        diesel::insert_into(predictions::table)
            .values(NewPrediction {
                image_path: prediction.image_path.as_deref(),
                predicted_crop: &prediction.predicted_crop,
                predicted_disease: &prediction.predicted_disease,
                confidence_score: prediction.confidence_score,
                crop_id: prediction.crop_id,
                disease_id: prediction.disease_id,
                treatment_id: prediction.treatment_id,
                actual_crop: &prediction.actual_crop,
                actual_disease: &prediction.actual_disease,
                is_correct: prediction.is_correct,
                created_at: &created_at,
            })
            .execute(&mut conn)
            .await?;

        diesel::select(last_insert_rowid()).first(&mut conn).await
    }

    /// Get a prediction by id.
    pub async fn get(&self, id: i64) -> Result<Option<Prediction>, DieselError> {
        let mut conn = self.pool.get().await?;

        predictions::table
            .find(id)
            .first::<PredictionRecord>(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(Prediction::from))
    }

    /// One page of history, newest first.
    pub async fn recent(&self, limit: i64, offset: i64) -> Result<Vec<Prediction>, DieselError> {
        let mut conn = self.pool.get().await?;

        predictions::table
            .order(predictions::created_at.desc())
            .then_order_by(predictions::id.desc())
            .limit(limit)
            .offset(offset)
            .load::<PredictionRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(Prediction::from).collect())
    }

    /// Count all history rows.
    pub async fn count(&self) -> Result<u64, DieselError> {
        let mut conn = self.pool.get().await?;

        let count: i64 = predictions::table.count().first(&mut conn).await?;
        Ok(count as u64)
    }

    /// Aggregate accuracy stats over the whole history.
    pub async fn stats(&self) -> Result<PredictionStats, DieselError> {
        let mut conn = self.pool.get().await?;

        let total: i64 = predictions::table.count().first(&mut conn).await?;
        let correct: i64 = predictions::table
            .filter(predictions::is_correct.eq(Some(true)))
            .count()
            .first(&mut conn)
            .await?;

        Ok(PredictionStats::new(total as u64, correct as u64))
    }

    /// Record human-supplied ground truth for one entry.
    ///
    /// Not part of the inference path; predicted fields stay untouched.
    pub async fn record_ground_truth(
        &self,
        id: i64,
        actual_crop: &str,
        actual_disease: &str,
        is_correct: bool,
    ) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;

        let rows = diesel::update(predictions::table.find(id))
            .set((
                predictions::actual_crop.eq(actual_crop),
                predictions::actual_disease.eq(actual_disease),
                predictions::is_correct.eq(Some(is_correct)),
            ))
            .execute(&mut conn)
            .await?;

        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Crop, Prediction};
    use crate::repository::diesel_context::DbContext;
    use tempfile::tempdir;

    async fn setup() -> (DbContext, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let ctx = DbContext::from_sqlite_path(&dir.path().join("test.db"));
        ctx.init_schema().await.unwrap();
        (ctx, dir)
    }

    fn sample_prediction() -> Prediction {
        Prediction::new(
            Some("ab/abcdef12.jpg".to_string()),
            "Tomato".to_string(),
            "Early_blight".to_string(),
            87.65,
        )
    }

    #[tokio::test]
    async fn test_insert_adds_exactly_one_row() {
        let (ctx, _dir) = setup().await;
        let repo = ctx.predictions();

        assert_eq!(repo.count().await.unwrap(), 0);
        let id = repo.insert(&sample_prediction()).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        let stored = repo.get(id).await.unwrap().unwrap();
        assert_eq!(stored.predicted_crop, "Tomato");
        assert_eq!(stored.confidence_score, 87.65);
        assert!(stored.is_correct.is_none());

        // Identical input still appends.
        repo.insert(&sample_prediction()).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_crop_delete_nullifies_link_but_keeps_row() {
        let (ctx, _dir) = setup().await;
        let repo = ctx.predictions();

        let crop_id = ctx
            .crops()
            .insert(&Crop::new("Tomato".to_string(), String::new(), String::new()))
            .await
            .unwrap();

        let mut prediction = sample_prediction();
        prediction.crop_id = Some(crop_id);
        let id = repo.insert(&prediction).await.unwrap();

        ctx.crops().delete(crop_id).await.unwrap();

        let stored = repo.get(id).await.unwrap().unwrap();
        assert_eq!(stored.crop_id, None);
        assert_eq!(stored.predicted_crop, "Tomato");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ground_truth_and_stats() {
        let (ctx, _dir) = setup().await;
        let repo = ctx.predictions();

        let first = repo.insert(&sample_prediction()).await.unwrap();
        repo.insert(&sample_prediction()).await.unwrap();

        assert!(repo
            .record_ground_truth(first, "Tomato", "Early_blight", true)
            .await
            .unwrap());

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.correct, 1);
        assert_eq!(stats.accuracy, 50.0);

        let stored = repo.get(first).await.unwrap().unwrap();
        assert_eq!(stored.actual_crop, "Tomato");
        assert_eq!(stored.is_correct, Some(true));
        // Predicted fields unchanged by correction.
        assert_eq!(stored.confidence_score, 87.65);
    }

    #[tokio::test]
    async fn test_recent_is_newest_first() {
        let (ctx, _dir) = setup().await;
        let repo = ctx.predictions();

        for _ in 0..3 {
            repo.insert(&sample_prediction()).await.unwrap();
        }

        let page = repo.recent(2, 0).await.unwrap();
        assert_eq!(page.len(), 2);
        assert!(page[0].id > page[1].id);

        let rest = repo.recent(2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
    }
}
