//! Diesel-based disease repository for SQLite.
//!
//! Diseases own their treatments. Listing queries join the owning crop so
//! pages can show "Crop - Disease" without extra lookups.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::diesel_models::{DiseaseRecord, NewDisease, NewTreatment, TreatmentRecord};
use super::diesel_pool::{AsyncSqlitePool, DieselError};
use super::util::last_insert_rowid;
use super::parse_datetime;
use crate::models::{Disease, Treatment};
use crate::schema::{crops, diseases, treatments};

impl From<DiseaseRecord> for Disease {
    fn from(record: DiseaseRecord) -> Self {
        Disease {
            id: record.id,
            crop_id: record.crop_id,
            name: record.name,
            created_at: parse_datetime(&record.created_at),
            updated_at: parse_datetime(&record.updated_at),
        }
    }
}

impl From<TreatmentRecord> for Treatment {
    fn from(record: TreatmentRecord) -> Self {
        Treatment {
            id: record.id,
            disease_id: record.disease_id,
            title: record.title,
            instructions: record.instructions,
            created_at: parse_datetime(&record.created_at),
            updated_at: parse_datetime(&record.updated_at),
        }
    }
}

/// A disease row together with its owning crop's name.
#[derive(Debug, Clone)]
pub struct DiseaseWithCrop {
    pub disease: Disease,
    pub crop_name: String,
}

/// Diesel-based disease repository with compile-time query checking.
#[derive(Clone)]
pub struct DiseaseRepository {
    pool: AsyncSqlitePool,
}

impl DiseaseRepository {
    /// Create a new disease repository with an existing pool.
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// Get a disease by id, with its crop name.
    pub async fn get(&self, id: i64) -> Result<Option<DiseaseWithCrop>, DieselError> {
        let mut conn = self.pool.get().await?;

        diseases::table
            .inner_join(crops::table)
            .filter(diseases::id.eq(id))
            .select((DiseaseRecord::as_select(), crops::name))
            .first::<(DiseaseRecord, String)>(&mut conn)
            .await
            .optional()
            .map(|opt| {
                opt.map(|(record, crop_name)| DiseaseWithCrop {
                    disease: Disease::from(record),
                    crop_name,
                })
            })
    }

    /// All diseases for one crop, ordered by name.
    pub async fn for_crop(&self, crop_id: i64) -> Result<Vec<Disease>, DieselError> {
        let mut conn = self.pool.get().await?;

        diseases::table
            .filter(diseases::crop_id.eq(crop_id))
            .order(diseases::name.asc())
            .load::<DiseaseRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(Disease::from).collect())
    }

    /// Find a disease by exact name under a crop (case-insensitive).
    pub async fn find_by_name(
        &self,
        crop_id: i64,
        name: &str,
    ) -> Result<Option<Disease>, DieselError> {
        let mut conn = self.pool.get().await?;

        diseases::table
            .filter(diseases::crop_id.eq(crop_id))
            .filter(diseases::name.like(name.trim()))
            .first::<DiseaseRecord>(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(Disease::from))
    }

    /// One page of diseases ordered by crop then disease name, optionally
    /// filtered by a substring match on either name.
    pub async fn search(
        &self,
        query: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DiseaseWithCrop>, DieselError> {
        let mut conn = self.pool.get().await?;

        let mut q = diseases::table
            .inner_join(crops::table)
            .select((DiseaseRecord::as_select(), crops::name))
            .into_boxed();

        if let Some(term) = query.filter(|t| !t.trim().is_empty()) {
            let pattern = format!("%{}%", term.trim());
            q = q.filter(
                diseases::name
                    .like(pattern.clone())
                    .or(crops::name.like(pattern)),
            );
        }

        q.order((crops::name.asc(), diseases::name.asc()))
            .limit(limit)
            .offset(offset)
            .load::<(DiseaseRecord, String)>(&mut conn)
            .await
            .map(|rows| {
                rows.into_iter()
                    .map(|(record, crop_name)| DiseaseWithCrop {
                        disease: Disease::from(record),
                        crop_name,
                    })
                    .collect()
            })
    }

    /// Count diseases matching the same filter as [`search`](Self::search).
    pub async fn search_count(&self, query: Option<&str>) -> Result<u64, DieselError> {
        let mut conn = self.pool.get().await?;

        let count: i64 = match query.filter(|t| !t.trim().is_empty()) {
            Some(term) => {
                let pattern = format!("%{}%", term.trim());
                diseases::table
                    .inner_join(crops::table)
                    .filter(
                        diseases::name
                            .like(pattern.clone())
                            .or(crops::name.like(pattern)),
                    )
                    .count()
                    .first(&mut conn)
                    .await?
            }
            None => diseases::table.count().first(&mut conn).await?,
        };
        Ok(count as u64)
    }

    /// Insert a disease, returning its new id.
    pub async fn insert(&self, disease: &Disease) -> Result<i64, DieselError> {
        let mut conn = self.pool.get().await?;
        let created_at = disease.created_at.to_rfc3339();
        let updated_at = disease.updated_at.to_rfc3339();

        diesel::insert_into(diseases::table)
            .values(NewDisease {
                crop_id: disease.crop_id,
                name: &disease.name,
                created_at: &created_at,
                updated_at: &updated_at,
            })
            .execute(&mut conn)
            .await?;

        diesel::select(last_insert_rowid()).first(&mut conn).await
    }

    /// Delete a disease. Treatments cascade.
    #[allow(dead_code)]
    pub async fn delete(&self, id: i64) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;

        let rows = diesel::delete(diseases::table.find(id))
            .execute(&mut conn)
            .await?;

        Ok(rows > 0)
    }

    /// All treatments for a disease, ordered by title.
    pub async fn treatments_for(&self, disease_id: i64) -> Result<Vec<Treatment>, DieselError> {
        let mut conn = self.pool.get().await?;

        treatments::table
            .filter(treatments::disease_id.eq(disease_id))
            .order(treatments::title.asc())
            .load::<TreatmentRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(Treatment::from).collect())
    }

    /// Insert a treatment, returning its new id.
    pub async fn insert_treatment(&self, treatment: &Treatment) -> Result<i64, DieselError> {
        let mut conn = self.pool.get().await?;
        let created_at = treatment.created_at.to_rfc3339();
        let updated_at = treatment.updated_at.to_rfc3339();

        diesel::insert_into(treatments::table)
            .values(NewTreatment {
                disease_id: treatment.disease_id,
                title: &treatment.title,
                instructions: &treatment.instructions,
                created_at: &created_at,
                updated_at: &updated_at,
            })
            .execute(&mut conn)
            .await?;

        diesel::select(last_insert_rowid()).first(&mut conn).await
    }
}
