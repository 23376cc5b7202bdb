//! Record store abstraction and the in-memory implementation.

use async_trait::async_trait;
use courtside_error::{CourtsideResult, RecordError, RecordErrorKind};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::guard::ensure_persistable;
use crate::model::{Post, Team, Tournament, UserProfile};

/// Persistence boundary for records.
///
/// The hosted backend sits behind this trait; implementations must refuse
/// writes whose media slots carry unpersistable descriptors.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create or replace a post.
    async fn put_post(&self, post: Post) -> CourtsideResult<()>;

    /// Fetch a post by id.
    async fn get_post(&self, id: Uuid) -> CourtsideResult<Post>;

    /// List all posts, newest first.
    async fn list_posts(&self) -> CourtsideResult<Vec<Post>>;

    /// Create or replace a profile.
    async fn put_profile(&self, profile: UserProfile) -> CourtsideResult<()>;

    /// Fetch a profile by account id.
    async fn get_profile(&self, account_id: &str) -> CourtsideResult<UserProfile>;

    /// Create or replace a team.
    async fn put_team(&self, team: Team) -> CourtsideResult<()>;

    /// Create or replace a tournament.
    async fn put_tournament(&self, tournament: Tournament) -> CourtsideResult<()>;
}

/// In-memory record store for tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    posts: RwLock<HashMap<Uuid, Post>>,
    profiles: RwLock<HashMap<String, UserProfile>>,
    teams: RwLock<HashMap<Uuid, Team>>,
    tournaments: RwLock<HashMap<Uuid, Tournament>>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    #[tracing::instrument(skip(self, post), fields(id = %post.id))]
    async fn put_post(&self, post: Post) -> CourtsideResult<()> {
        for slot in post.media_slots() {
            ensure_persistable(slot)?;
        }
        self.posts
            .write()
            .expect("record store lock poisoned")
            .insert(post.id, post);
        Ok(())
    }

    async fn get_post(&self, id: Uuid) -> CourtsideResult<Post> {
        self.posts
            .read()
            .expect("record store lock poisoned")
            .get(&id)
            .cloned()
            .ok_or_else(|| RecordError::new(RecordErrorKind::NotFound(id.to_string())).into())
    }

    async fn list_posts(&self) -> CourtsideResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .read()
            .expect("record store lock poisoned")
            .values()
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    #[tracing::instrument(skip(self, profile), fields(account = %profile.account_id))]
    async fn put_profile(&self, profile: UserProfile) -> CourtsideResult<()> {
        for slot in profile.media_slots() {
            ensure_persistable(slot)?;
        }
        self.profiles
            .write()
            .expect("record store lock poisoned")
            .insert(profile.account_id.clone(), profile);
        Ok(())
    }

    async fn get_profile(&self, account_id: &str) -> CourtsideResult<UserProfile> {
        self.profiles
            .read()
            .expect("record store lock poisoned")
            .get(account_id)
            .cloned()
            .ok_or_else(|| {
                RecordError::new(RecordErrorKind::NotFound(account_id.to_string())).into()
            })
    }

    async fn put_team(&self, team: Team) -> CourtsideResult<()> {
        for slot in team.media_slots() {
            ensure_persistable(slot)?;
        }
        self.teams
            .write()
            .expect("record store lock poisoned")
            .insert(team.id, team);
        Ok(())
    }

    async fn put_tournament(&self, tournament: Tournament) -> CourtsideResult<()> {
        for slot in tournament.media_slots() {
            ensure_persistable(slot)?;
        }
        self.tournaments
            .write()
            .expect("record store lock poisoned")
            .insert(tournament.id, tournament);
        Ok(())
    }
}
