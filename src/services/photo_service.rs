// src/services/photo_service.rs
// DOCUMENTATION: Business logic for photos
// PURPOSE: Upload images with their metadata and list photos for viewers

use crate::db::{PhotoRepository, VoteRepository};
use crate::errors::HotspotError;
use crate::models::{NewPhoto, Photo, PhotoResponse, UploadRequest, UploadedFile, VoteAction};
use crate::services::ObjectStore;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub struct PhotoService {
    photos: Arc<dyn PhotoRepository>,
    votes: Arc<dyn VoteRepository>,
    storage: Arc<dyn ObjectStore>,
    max_upload_bytes: usize,
}

impl PhotoService {
    pub fn new(
        photos: Arc<dyn PhotoRepository>,
        votes: Arc<dyn VoteRepository>,
        storage: Arc<dyn ObjectStore>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            photos,
            votes,
            storage,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Store the image, then insert the photo row with zero counters.
    ///
    /// Everything is validated before the first write. If the row insert
    /// fails after the image was stored, the image is left in the bucket.
    pub async fn upload(
        &self,
        req: UploadRequest,
        file: Option<UploadedFile>,
    ) -> Result<PhotoResponse, HotspotError> {
        let req = normalize(req);
        req.validate()?;

        let file = file
            .ok_or_else(|| HotspotError::ValidationError("file is required".to_string()))?;
        let filename = file
            .filename
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                HotspotError::ValidationError("File must have a filename".to_string())
            })?;

        if file.data.is_empty() {
            return Err(HotspotError::ValidationError("file is empty".to_string()));
        }
        if file.data.len() > self.max_upload_bytes {
            return Err(HotspotError::ValidationError(format!(
                "file exceeds {} bytes",
                self.max_upload_bytes
            )));
        }

        let id = Uuid::new_v4();
        let path = object_path(id, filename);
        let content_type = file
            .content_type
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let image_url = self.storage.upload(&path, &content_type, file.data).await?;

        let photo = self
            .photos
            .insert_photo(&NewPhoto {
                id,
                user_id: req.user_id,
                location_name: req.location_name,
                image_url,
                title: req.title,
                description: req.description,
                latitude: req.latitude,
                longitude: req.longitude,
            })
            .await?;

        log::info!(
            "Photo {} uploaded by {} at '{}'",
            photo.id,
            photo.user_id,
            photo.location_name
        );

        Ok(photo.to_response(None))
    }

    /// Photos at a location, newest first. The key is trimmed the same way
    /// upload trims it.
    pub async fn list_by_location(
        &self,
        location_name: &str,
        viewer_id: Option<&str>,
    ) -> Result<Vec<PhotoResponse>, HotspotError> {
        let photos = self.photos.list_by_location(location_name.trim()).await?;
        self.annotate(photos, viewer_id).await
    }

    /// Photos uploaded by a user, newest first
    pub async fn list_by_user(
        &self,
        user_id: &str,
        viewer_id: Option<&str>,
    ) -> Result<Vec<PhotoResponse>, HotspotError> {
        let photos = self.photos.list_by_user(user_id.trim()).await?;
        self.annotate(photos, viewer_id).await
    }

    /// Attach the viewer's vote to each photo with one lookup for the whole page
    async fn annotate(
        &self,
        photos: Vec<Photo>,
        viewer_id: Option<&str>,
    ) -> Result<Vec<PhotoResponse>, HotspotError> {
        let viewer_id = match viewer_id.map(str::trim).filter(|v| !v.is_empty()) {
            Some(viewer_id) => viewer_id,
            None => return Ok(photos.iter().map(|p| p.to_response(None)).collect()),
        };

        let ids: Vec<Uuid> = photos.iter().map(|p| p.id).collect();
        let votes = self.votes.votes_by_user(viewer_id, &ids).await?;

        Ok(photos
            .iter()
            .map(|p| p.to_response(Some(VoteAction::from(votes.get(&p.id).copied()))))
            .collect())
    }
}

/// Trim identifiers and drop blank optional text
fn normalize(req: UploadRequest) -> UploadRequest {
    let non_blank = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    UploadRequest {
        user_id: req.user_id.trim().to_string(),
        location_name: req.location_name.trim().to_string(),
        title: non_blank(req.title),
        description: non_blank(req.description),
        latitude: req.latitude,
        longitude: req.longitude,
    }
}

/// Bucket path for a new photo: `<id>.<ext>`, extension taken from the
/// uploaded filename when it has a usable one
pub fn object_path(id: Uuid, filename: &str) -> String {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}
