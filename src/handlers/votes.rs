// src/handlers/votes.rs
// DOCUMENTATION: HTTP handler for voting
// PURPOSE: Cast, switch or retract a vote on a photo

use crate::errors::HotspotError;
use crate::models::VoteRequest;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};

/// POST /vote
/// Body: {"photo_id", "user_id", "vote_type": "up" | "down" | "none"}
pub async fn cast_vote(
    state: web::Data<AppState>,
    req: web::Json<VoteRequest>,
) -> Result<impl Responder, HotspotError> {
    let outcome = state.votes.handle_request(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Configuration for vote routes
pub fn config(cfg: &mut web::ServiceConfig) {
    // Malformed bodies get the same JSON error shape as every other 400
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        HotspotError::ValidationError(err.to_string()).into()
    });

    cfg.service(
        web::resource("/vote")
            .app_data(json_config)
            .route(web::post().to(cast_vote)),
    );
}
