// src/mock.rs
// DOCUMENTATION: In-memory stores for tests
// PURPOSE: Stand in for the tables and the storage bucket so services and
// handlers run without a database or network access

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::db::{PhotoRepository, VoteRepository};
use crate::errors::HotspotError;
use crate::models::{NewPhoto, Photo, Vote, VoteType};
use crate::services::ObjectStore;

/// Tables kept in memory
#[derive(Default)]
pub struct MemoryStore {
    photos: Mutex<Vec<Photo>>,
    votes: Mutex<HashMap<(String, Uuid), VoteType>>,
    /// Number of successful mutating calls
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a photo directly, bypassing upload
    pub async fn seed_photo(&self, user_id: &str, location_name: &str) -> Photo {
        let photo = NewPhoto {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            location_name: location_name.to_string(),
            image_url: format!("https://storage.test/{}.jpg", user_id),
            title: None,
            description: None,
            latitude: None,
            longitude: None,
        };
        self.insert_photo(&photo).await.unwrap()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every later mutating call fail with a database error
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn photo(&self, id: Uuid) -> Option<Photo> {
        self.photos.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }

    pub fn stored_vote(&self, user_id: &str, photo_id: Uuid) -> Option<VoteType> {
        self.votes
            .lock()
            .unwrap()
            .get(&(user_id.to_string(), photo_id))
            .copied()
    }

    /// Number of stored records of `vote_type` for the photo
    pub fn count_votes(&self, photo_id: Uuid, vote_type: VoteType) -> i32 {
        self.votes
            .lock()
            .unwrap()
            .iter()
            .filter(|((_, id), t)| *id == photo_id && **t == vote_type)
            .count() as i32
    }

    fn write(&self) -> Result<(), HotspotError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(HotspotError::DatabaseError(
                "connection reset by peer".to_string(),
            ));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn newest_first(mut photos: Vec<Photo>) -> Vec<Photo> {
        photos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        photos
    }
}

#[async_trait]
impl PhotoRepository for MemoryStore {
    async fn insert_photo(&self, photo: &NewPhoto) -> Result<Photo, HotspotError> {
        self.write()?;
        let mut photos = self.photos.lock().unwrap();
        // Strictly increasing timestamps keep "newest first" deterministic
        let created_at = Utc::now() + Duration::milliseconds(photos.len() as i64);
        let stored = Photo {
            id: photo.id,
            user_id: photo.user_id.clone(),
            location_name: photo.location_name.clone(),
            image_url: photo.image_url.clone(),
            title: photo.title.clone(),
            description: photo.description.clone(),
            latitude: photo.latitude,
            longitude: photo.longitude,
            upvotes: 0,
            downvotes: 0,
            created_at,
        };
        photos.push(stored.clone());
        Ok(stored)
    }

    async fn get_photo(&self, id: Uuid) -> Result<Option<Photo>, HotspotError> {
        Ok(self.photo(id))
    }

    async fn list_by_location(&self, location_name: &str) -> Result<Vec<Photo>, HotspotError> {
        let photos = self.photos.lock().unwrap();
        Ok(Self::newest_first(
            photos
                .iter()
                .filter(|p| p.location_name == location_name)
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Photo>, HotspotError> {
        let photos = self.photos.lock().unwrap();
        Ok(Self::newest_first(
            photos.iter().filter(|p| p.user_id == user_id).cloned().collect(),
        ))
    }

    async fn apply_vote_delta(
        &self,
        id: Uuid,
        up_delta: i32,
        down_delta: i32,
    ) -> Result<Photo, HotspotError> {
        self.write()?;
        let mut photos = self.photos.lock().unwrap();
        let photo = photos
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| HotspotError::NotFound(format!("photo {}", id)))?;
        photo.upvotes = (photo.upvotes + up_delta).max(0);
        photo.downvotes = (photo.downvotes + down_delta).max(0);
        Ok(photo.clone())
    }
}

#[async_trait]
impl VoteRepository for MemoryStore {
    async fn get_vote(
        &self,
        user_id: &str,
        photo_id: Uuid,
    ) -> Result<Option<Vote>, HotspotError> {
        Ok(self.stored_vote(user_id, photo_id).map(|vote_type| Vote {
            user_id: user_id.to_string(),
            photo_id,
            vote_type,
        }))
    }

    async fn insert_vote_if_absent(&self, vote: &Vote) -> Result<bool, HotspotError> {
        self.write()?;
        let mut votes = self.votes.lock().unwrap();
        let key = (vote.user_id.clone(), vote.photo_id);
        if votes.contains_key(&key) {
            return Ok(false);
        }
        votes.insert(key, vote.vote_type);
        Ok(true)
    }

    async fn upsert_vote(&self, vote: &Vote) -> Result<(), HotspotError> {
        self.write()?;
        self.votes
            .lock()
            .unwrap()
            .insert((vote.user_id.clone(), vote.photo_id), vote.vote_type);
        Ok(())
    }

    async fn delete_vote(&self, user_id: &str, photo_id: Uuid) -> Result<bool, HotspotError> {
        self.write()?;
        Ok(self
            .votes
            .lock()
            .unwrap()
            .remove(&(user_id.to_string(), photo_id))
            .is_some())
    }

    async fn votes_by_user(
        &self,
        user_id: &str,
        photo_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, VoteType>, HotspotError> {
        let votes = self.votes.lock().unwrap();
        Ok(votes
            .iter()
            .filter(|((user, photo_id), _)| user == user_id && photo_ids.contains(photo_id))
            .map(|((_, photo_id), vote_type)| (*photo_id, *vote_type))
            .collect())
    }
}

/// Bucket kept in memory
#[derive(Default)]
pub struct MemoryObjectStore {
    /// path -> (content type, bytes)
    objects: Mutex<HashMap<String, (String, Vec<u8>)>>,
    fail: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later upload fail
    pub fn fail_uploads(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn content_type(&self, path: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .map(|(content_type, _)| content_type.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, HotspotError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(HotspotError::StorageError(
                "Upload error 400 Bad Request: Bucket not found".to_string(),
            ));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), (content_type.to_string(), data));
        Ok(format!("https://storage.test/photos/{}", path))
    }
}
