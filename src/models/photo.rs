// src/models/photo.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::VoteAction;

/// A location-tagged photo as stored in the `photos` table
/// DOCUMENTATION: Counters are only ever changed by vote reconciliation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub id: Uuid,
    /// Uploader; client supplied, there is no account system
    pub user_id: String,
    /// Exact-match grouping key for listings
    pub location_name: String,
    /// Public URL of the stored image
    pub image_url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub upvotes: i32,
    pub downvotes: i32,
    pub created_at: DateTime<Utc>,
}

/// Row to insert after the image has been stored
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub id: Uuid,
    pub user_id: String,
    pub location_name: String,
    pub image_url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Metadata fields of a POST /upload form
#[derive(Debug, Clone, Default, Validate)]
pub struct UploadRequest {
    #[validate(length(min = 1, max = 255, message = "user_id is required"))]
    pub user_id: String,

    #[validate(length(min = 1, max = 255, message = "location_name is required"))]
    pub location_name: String,

    #[validate(length(max = 255))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

/// The `file` part of a POST /upload form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Photo DTO for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoResponse {
    pub id: Uuid,
    pub user_id: String,
    pub location_name: String,
    pub image_url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub upvotes: i32,
    pub downvotes: i32,
    pub created_at: DateTime<Utc>,
    /// The viewer's vote, present only when the listing named a viewer
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_vote: Option<VoteAction>,
}

impl Photo {
    /// Convert database photo into API response DTO
    pub fn to_response(&self, user_vote: Option<VoteAction>) -> PhotoResponse {
        PhotoResponse {
            id: self.id,
            user_id: self.user_id.clone(),
            location_name: self.location_name.clone(),
            image_url: self.image_url.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            upvotes: self.upvotes,
            downvotes: self.downvotes,
            created_at: self.created_at,
            user_vote,
        }
    }
}
