// src/state.rs
// DOCUMENTATION: Shared application state
// PURPOSE: Bundle the long-lived store handles that every request uses

use crate::db::{PhotoRepository, VoteRepository};
use crate::models::VotePolicy;
use crate::services::{ObjectStore, PhotoService, VoteReconciler};
use std::sync::Arc;

/// Built once in main.rs before the server starts and shared by all workers
/// through `web::Data<AppState>`.
pub struct AppState {
    pub photos: PhotoService,
    pub votes: VoteReconciler,
}

impl AppState {
    pub fn new(
        photo_repository: Arc<dyn PhotoRepository>,
        vote_repository: Arc<dyn VoteRepository>,
        storage: Arc<dyn ObjectStore>,
        vote_policy: VotePolicy,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            photos: PhotoService::new(
                photo_repository.clone(),
                vote_repository.clone(),
                storage,
                max_upload_bytes,
            ),
            votes: VoteReconciler::new(photo_repository, vote_repository, vote_policy),
        }
    }
}
