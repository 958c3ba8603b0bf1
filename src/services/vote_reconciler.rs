// src/services/vote_reconciler.rs
// DOCUMENTATION: Vote reconciliation
// PURPOSE: Keep per-user vote records and per-photo counters consistent

use crate::db::{PhotoRepository, VoteRepository};
use crate::errors::HotspotError;
use crate::models::{
    Photo, Vote, VoteAction, VoteOutcome, VotePolicy, VoteRequest, VoteStatus, VoteType,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Change to a photo's counters caused by one user's vote changing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterDelta {
    pub up: i32,
    pub down: i32,
}

impl CounterDelta {
    /// Undo `prior`'s contribution, then add `requested`'s.
    ///
    /// Re-submitting the same vote cancels out to zero; switching sides
    /// moves one from each counter to the other in a single delta.
    pub fn between(prior: Option<VoteType>, requested: VoteAction) -> Self {
        let mut delta = CounterDelta::default();

        match prior {
            Some(VoteType::Up) => delta.up -= 1,
            Some(VoteType::Down) => delta.down -= 1,
            None => {}
        }

        match requested {
            VoteAction::Up => delta.up += 1,
            VoteAction::Down => delta.down += 1,
            VoteAction::None => {}
        }

        delta
    }

    pub fn is_zero(&self) -> bool {
        self.up == 0 && self.down == 0
    }
}

/// Applies vote requests under the configured policy
///
/// # Concurrency
///
/// Counters are changed with a single relative update in the photo
/// repository, so concurrent votes on the same photo never lose each
/// other's increments. The vote record write and the counter write are
/// still two separate statements without a shared transaction: a failure
/// between them leaves the record changed but the counters stale, and two
/// concurrent requests from the *same* user on the same photo may both
/// read the same prior vote and apply overlapping deltas. Neither case is
/// repaired automatically.
pub struct VoteReconciler {
    photos: Arc<dyn PhotoRepository>,
    votes: Arc<dyn VoteRepository>,
    policy: VotePolicy,
}

impl VoteReconciler {
    pub fn new(
        photos: Arc<dyn PhotoRepository>,
        votes: Arc<dyn VoteRepository>,
        policy: VotePolicy,
    ) -> Self {
        Self {
            photos,
            votes,
            policy,
        }
    }

    /// Validate a POST /vote body and reconcile it
    pub async fn handle_request(&self, req: VoteRequest) -> Result<VoteOutcome, HotspotError> {
        req.validate()?;

        let user_id = req.user_id.trim();
        if user_id.is_empty() {
            return Err(HotspotError::ValidationError(
                "user_id is required".to_string(),
            ));
        }

        // An id that is not a UUID cannot name any photo
        let photo_id = Uuid::parse_str(req.photo_id.trim())
            .map_err(|_| HotspotError::NotFound(format!("photo {}", req.photo_id)))?;

        self.reconcile(photo_id, user_id, req.vote_type).await
    }

    /// Record `requested` as the user's vote on the photo and return the
    /// photo's counters afterwards.
    ///
    /// Fails with `NotFound` before writing anything if the photo does not exist.
    pub async fn reconcile(
        &self,
        photo_id: Uuid,
        user_id: &str,
        requested: VoteAction,
    ) -> Result<VoteOutcome, HotspotError> {
        let photo = self
            .photos
            .get_photo(photo_id)
            .await?
            .ok_or_else(|| HotspotError::NotFound(format!("photo {}", photo_id)))?;

        match self.policy {
            VotePolicy::Mutable => self.reconcile_mutable(photo, user_id, requested).await,
            VotePolicy::Immutable => self.reconcile_immutable(photo, user_id, requested).await,
        }
    }

    async fn reconcile_mutable(
        &self,
        photo: Photo,
        user_id: &str,
        requested: VoteAction,
    ) -> Result<VoteOutcome, HotspotError> {
        let prior = self
            .votes
            .get_vote(user_id, photo.id)
            .await?
            .map(|vote| vote.vote_type);
        let delta = CounterDelta::between(prior, requested);

        match requested.vote_type() {
            Some(vote_type) => {
                self.votes
                    .upsert_vote(&Vote {
                        user_id: user_id.to_string(),
                        photo_id: photo.id,
                        vote_type,
                    })
                    .await?;
            }
            None => {
                if prior.is_some() {
                    self.votes.delete_vote(user_id, photo.id).await?;
                }
            }
        }

        let photo = if delta.is_zero() {
            photo
        } else {
            self.photos
                .apply_vote_delta(photo.id, delta.up, delta.down)
                .await?
        };

        log::info!(
            "Vote on photo {} by {}: {:?} -> {:?} (up={}, down={})",
            photo.id,
            user_id,
            VoteAction::from(prior),
            requested,
            photo.upvotes,
            photo.downvotes
        );

        Ok(VoteOutcome {
            status: VoteStatus::Success,
            photo_id: photo.id,
            upvotes: photo.upvotes,
            downvotes: photo.downvotes,
            user_vote: requested,
        })
    }

    async fn reconcile_immutable(
        &self,
        photo: Photo,
        user_id: &str,
        requested: VoteAction,
    ) -> Result<VoteOutcome, HotspotError> {
        let vote_type = requested.vote_type().ok_or_else(|| {
            HotspotError::ValidationError("votes cannot be retracted".to_string())
        })?;

        if let Some(existing) = self.votes.get_vote(user_id, photo.id).await? {
            return Ok(Self::ignored(&photo, user_id, existing.vote_type));
        }

        let vote = Vote {
            user_id: user_id.to_string(),
            photo_id: photo.id,
            vote_type,
        };

        // A concurrent first vote by the same user may have landed since the lookup
        if !self.votes.insert_vote_if_absent(&vote).await? {
            let existing = self
                .votes
                .get_vote(user_id, photo.id)
                .await?
                .map(|v| v.vote_type)
                .unwrap_or(vote_type);
            return Ok(Self::ignored(&photo, user_id, existing));
        }

        let delta = CounterDelta::between(None, requested);
        let photo = self
            .photos
            .apply_vote_delta(photo.id, delta.up, delta.down)
            .await?;

        log::info!(
            "Vote on photo {} by {}: {} (up={}, down={})",
            photo.id,
            user_id,
            vote_type,
            photo.upvotes,
            photo.downvotes
        );

        Ok(VoteOutcome {
            status: VoteStatus::Success,
            photo_id: photo.id,
            upvotes: photo.upvotes,
            downvotes: photo.downvotes,
            user_vote: requested,
        })
    }

    fn ignored(photo: &Photo, user_id: &str, existing: VoteType) -> VoteOutcome {
        log::debug!(
            "Ignoring repeat vote on photo {} by {} (already {})",
            photo.id,
            user_id,
            existing
        );

        VoteOutcome {
            status: VoteStatus::Ignored,
            photo_id: photo.id,
            upvotes: photo.upvotes,
            downvotes: photo.downvotes,
            user_vote: VoteAction::from(Some(existing)),
        }
    }
}
