// src/handlers/photos.rs
// DOCUMENTATION: HTTP handlers for photo operations
// PURPOSE: Parse multipart uploads and listing requests, call PhotoService

use crate::errors::HotspotError;
use crate::models::{UploadRequest, UploadedFile};
use crate::state::AppState;
use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use serde::Deserialize;
use serde_json::json;

/// Largest accepted text field in an upload form
const MAX_TEXT_FIELD_BYTES: usize = 16 * 1024;

/// Optional viewer for listings
#[derive(Debug, Deserialize)]
pub struct ViewerQuery {
    pub viewer_id: Option<String>,
}

/// POST /upload
/// Store a photo and its metadata
pub async fn upload_photo(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<impl Responder, HotspotError> {
    let (req, file) = read_upload_form(payload, state.photos.max_upload_bytes()).await?;
    let photo = state.photos.upload(req, file).await?;

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "photo": photo
    })))
}

/// GET /locations/{location_name}/photos
pub async fn photos_by_location(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ViewerQuery>,
) -> Result<impl Responder, HotspotError> {
    let location_name = path.into_inner();
    let photos = state
        .photos
        .list_by_location(&location_name, query.viewer_id.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(photos))
}

/// GET /users/{user_id}/photos
pub async fn photos_by_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ViewerQuery>,
) -> Result<impl Responder, HotspotError> {
    let user_id = path.into_inner();
    let photos = state
        .photos
        .list_by_user(&user_id, query.viewer_id.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(photos))
}

fn malformed_form(e: MultipartError) -> HotspotError {
    HotspotError::ValidationError(format!("Malformed upload form: {}", e))
}

/// Collect the form into metadata and the optional `file` part.
/// Unknown fields are skipped; oversized parts abort the read early.
async fn read_upload_form(
    mut payload: Multipart,
    max_upload_bytes: usize,
) -> Result<(UploadRequest, Option<UploadedFile>), HotspotError> {
    let mut req = UploadRequest::default();
    let mut file = None;

    while let Some(mut field) = payload.try_next().await.map_err(malformed_form)? {
        let disposition = field.content_disposition().clone();
        let name = disposition.get_name().unwrap_or_default();

        if name == "file" {
            let content_type = field.content_type().map(|mime| mime.to_string());
            let data = read_field(&mut field, max_upload_bytes, "file").await?;
            file = Some(UploadedFile {
                filename: disposition.get_filename().map(str::to_string),
                content_type,
                data,
            });
            continue;
        }

        let bytes = read_field(&mut field, MAX_TEXT_FIELD_BYTES, name).await?;
        let value = String::from_utf8(bytes).map_err(|_| {
            HotspotError::ValidationError(format!("{} must be valid UTF-8", name))
        })?;

        match name {
            "user_id" => req.user_id = value,
            "location_name" => req.location_name = value,
            "title" => req.title = Some(value),
            "description" => req.description = Some(value),
            "latitude" => req.latitude = parse_coordinate(name, &value)?,
            "longitude" => req.longitude = parse_coordinate(name, &value)?,
            other => log::debug!("Ignoring unknown upload field '{}'", other),
        }
    }

    Ok((req, file))
}

async fn read_field(
    field: &mut Field,
    limit: usize,
    name: &str,
) -> Result<Vec<u8>, HotspotError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed_form)? {
        if data.len() + chunk.len() > limit {
            return Err(HotspotError::ValidationError(format!(
                "{} exceeds {} bytes",
                name, limit
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Blank means "not given"; anything else must be a finite number
fn parse_coordinate(name: &str, value: &str) -> Result<Option<f64>, HotspotError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(HotspotError::ValidationError(format!(
            "{} must be a number, got '{}'",
            name, value
        ))),
    }
}

/// Configuration for photo routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/upload", web::post().to(upload_photo))
        .route(
            "/locations/{location_name}/photos",
            web::get().to(photos_by_location),
        )
        .route("/users/{user_id}/photos", web::get().to(photos_by_user));
}
