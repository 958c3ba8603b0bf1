// src/db/vote_repository.rs
// DOCUMENTATION: Vote database operations
// PURPOSE: Per-user vote records in the `votes` table, unique per (user_id, photo_id)

use crate::errors::HotspotError;
use crate::models::{Vote, VoteType};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

/// Access to the `votes` table
#[async_trait]
pub trait VoteRepository: Send + Sync {
    async fn get_vote(&self, user_id: &str, photo_id: Uuid)
        -> Result<Option<Vote>, HotspotError>;

    /// Insert the vote unless the user already voted on the photo.
    /// Returns `false` when a record already existed and nothing was written.
    async fn insert_vote_if_absent(&self, vote: &Vote) -> Result<bool, HotspotError>;

    /// Insert the vote or replace the type of the existing record
    async fn upsert_vote(&self, vote: &Vote) -> Result<(), HotspotError>;

    /// Remove the user's vote on the photo. Returns `false` if there was none.
    async fn delete_vote(&self, user_id: &str, photo_id: Uuid) -> Result<bool, HotspotError>;

    /// The user's votes on any of the given photos, keyed by photo id
    async fn votes_by_user(
        &self,
        user_id: &str,
        photo_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, VoteType>, HotspotError>;
}

/// Raw `votes` row; `vote_type` is checked before it leaves this module
#[derive(Debug, FromRow)]
struct VoteRow {
    user_id: String,
    photo_id: Uuid,
    vote_type: String,
}

impl TryFrom<VoteRow> for Vote {
    type Error = HotspotError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        let vote_type = row.vote_type.parse::<VoteType>().map_err(|e| {
            log::error!(
                "Malformed vote row for user {} on photo {}: {}",
                row.user_id,
                row.photo_id,
                e
            );
            HotspotError::DatabaseError(format!("Malformed vote row: {}", e))
        })?;

        Ok(Vote {
            user_id: row.user_id,
            photo_id: row.photo_id,
            vote_type,
        })
    }
}

fn db_error(action: &'static str) -> impl FnOnce(sqlx::Error) -> HotspotError {
    move |e| {
        log::error!("Failed to {}: {}", action, e);
        HotspotError::DatabaseError(format!("{} failed: {}", action, e))
    }
}

/// PostgreSQL-backed vote repository
pub struct PgVoteRepository {
    pool: PgPool,
}

impl PgVoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for PgVoteRepository {
    async fn get_vote(
        &self,
        user_id: &str,
        photo_id: Uuid,
    ) -> Result<Option<Vote>, HotspotError> {
        let row = sqlx::query_as::<_, VoteRow>(
            r#"
            SELECT user_id, photo_id, vote_type
            FROM votes
            WHERE user_id = $1 AND photo_id = $2
            "#,
        )
        .bind(user_id)
        .bind(photo_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch vote"))?;

        row.map(Vote::try_from).transpose()
    }

    async fn insert_vote_if_absent(&self, vote: &Vote) -> Result<bool, HotspotError> {
        let result = sqlx::query(
            r#"
            INSERT INTO votes (user_id, photo_id, vote_type)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, photo_id) DO NOTHING
            "#,
        )
        .bind(&vote.user_id)
        .bind(vote.photo_id)
        .bind(vote.vote_type.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert vote"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn upsert_vote(&self, vote: &Vote) -> Result<(), HotspotError> {
        sqlx::query(
            r#"
            INSERT INTO votes (user_id, photo_id, vote_type)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, photo_id) DO UPDATE
            SET vote_type = EXCLUDED.vote_type
            "#,
        )
        .bind(&vote.user_id)
        .bind(vote.photo_id)
        .bind(vote.vote_type.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("upsert vote"))?;

        Ok(())
    }

    async fn delete_vote(&self, user_id: &str, photo_id: Uuid) -> Result<bool, HotspotError> {
        let result = sqlx::query(
            r#"
            DELETE FROM votes
            WHERE user_id = $1 AND photo_id = $2
            "#,
        )
        .bind(user_id)
        .bind(photo_id)
        .execute(&self.pool)
        .await
        .map_err(db_error("delete vote"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn votes_by_user(
        &self,
        user_id: &str,
        photo_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, VoteType>, HotspotError> {
        if photo_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, VoteRow>(
            r#"
            SELECT user_id, photo_id, vote_type
            FROM votes
            WHERE user_id = $1 AND photo_id = ANY($2)
            "#,
        )
        .bind(user_id)
        .bind(photo_ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("fetch viewer votes"))?;

        rows.into_iter()
            .map(|row| Vote::try_from(row).map(|vote| (vote.photo_id, vote.vote_type)))
            .collect()
    }
}
