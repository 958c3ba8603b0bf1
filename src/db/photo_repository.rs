// src/db/photo_repository.rs
// DOCUMENTATION: Photo database operations
// PURPOSE: Insert, list and update counters of rows in the `photos` table

use crate::errors::HotspotError;
use crate::models::{NewPhoto, Photo};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Access to the `photos` table
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Insert a new photo with zeroed counters and return the stored row
    async fn insert_photo(&self, photo: &NewPhoto) -> Result<Photo, HotspotError>;

    async fn get_photo(&self, id: Uuid) -> Result<Option<Photo>, HotspotError>;

    /// Photos at a location, newest first
    async fn list_by_location(&self, location_name: &str) -> Result<Vec<Photo>, HotspotError>;

    /// Photos uploaded by a user, newest first
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Photo>, HotspotError>;

    /// Add the given deltas to the photo's counters in one atomic step and
    /// return the updated row. Counters never drop below zero.
    ///
    /// Fails with `NotFound` if the photo does not exist.
    async fn apply_vote_delta(
        &self,
        id: Uuid,
        up_delta: i32,
        down_delta: i32,
    ) -> Result<Photo, HotspotError>;
}

const PHOTO_COLUMNS: &str = "id, user_id, location_name, image_url, title, description, \
                             latitude, longitude, upvotes, downvotes, created_at";

/// PostgreSQL-backed photo repository
pub struct PgPhotoRepository {
    pool: PgPool,
}

impl PgPhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_where(&self, column: &str, value: &str) -> Result<Vec<Photo>, HotspotError> {
        let sql = format!(
            "SELECT {} FROM photos WHERE {} = $1 ORDER BY created_at DESC",
            PHOTO_COLUMNS, column
        );

        sqlx::query_as::<_, Photo>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list photos by {} = {}: {}", column, value, e);
                HotspotError::DatabaseError(format!("List photos failed: {}", e))
            })
    }
}

#[async_trait]
impl PhotoRepository for PgPhotoRepository {
    async fn insert_photo(&self, photo: &NewPhoto) -> Result<Photo, HotspotError> {
        let sql = format!(
            r#"
            INSERT INTO photos (
                id, user_id, location_name, image_url, title, description,
                latitude, longitude, upvotes, downvotes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, 0)
            RETURNING {}
            "#,
            PHOTO_COLUMNS
        );

        sqlx::query_as::<_, Photo>(&sql)
            .bind(photo.id)
            .bind(&photo.user_id)
            .bind(&photo.location_name)
            .bind(&photo.image_url)
            .bind(&photo.title)
            .bind(&photo.description)
            .bind(photo.latitude)
            .bind(photo.longitude)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to insert photo {}: {}", photo.id, e);
                HotspotError::DatabaseError(format!("Insert photo failed: {}", e))
            })
    }

    async fn get_photo(&self, id: Uuid) -> Result<Option<Photo>, HotspotError> {
        let sql = format!("SELECT {} FROM photos WHERE id = $1", PHOTO_COLUMNS);

        sqlx::query_as::<_, Photo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch photo {}: {}", id, e);
                HotspotError::DatabaseError(format!("Fetch photo failed: {}", e))
            })
    }

    async fn list_by_location(&self, location_name: &str) -> Result<Vec<Photo>, HotspotError> {
        self.list_where("location_name", location_name).await
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Photo>, HotspotError> {
        self.list_where("user_id", user_id).await
    }

    async fn apply_vote_delta(
        &self,
        id: Uuid,
        up_delta: i32,
        down_delta: i32,
    ) -> Result<Photo, HotspotError> {
        // Relative update: concurrent votes on the same photo cannot overwrite each other
        let sql = format!(
            r#"
            UPDATE photos
            SET upvotes = GREATEST(upvotes + $2, 0),
                downvotes = GREATEST(downvotes + $3, 0)
            WHERE id = $1
            RETURNING {}
            "#,
            PHOTO_COLUMNS
        );

        sqlx::query_as::<_, Photo>(&sql)
            .bind(id)
            .bind(up_delta)
            .bind(down_delta)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to update counters of photo {}: {}", id, e);
                HotspotError::DatabaseError(format!("Update counters failed: {}", e))
            })?
            .ok_or_else(|| HotspotError::NotFound(format!("photo {}", id)))
    }
}
