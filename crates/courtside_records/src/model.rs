//! Record types with media slots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A timeline post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier
    pub id: Uuid,
    /// Author's account id
    pub author_id: String,
    /// Post body text
    pub body: String,
    /// Attached image descriptor, if any
    pub image_url: Option<String>,
    /// Attached video descriptor, if any
    pub video_url: Option<String>,
    /// Attached document descriptor, if any
    pub document_url: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a post with no media.
    pub fn new(author_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id: author_id.into(),
            body: body.into(),
            image_url: None,
            video_url: None,
            document_url: None,
            created_at: Utc::now(),
        }
    }

    /// Every filled media slot on this record.
    pub fn media_slots(&self) -> impl Iterator<Item = &str> {
        [&self.image_url, &self.video_url, &self.document_url]
            .into_iter()
            .flatten()
            .map(String::as_str)
    }
}

/// A user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account id this profile belongs to
    pub account_id: String,
    /// Display name
    pub display_name: String,
    /// Free-form bio
    pub bio: Option<String>,
    /// Avatar image descriptor, if any
    pub avatar_url: Option<String>,
    /// Banner image descriptor, if any
    pub banner_url: Option<String>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a bare profile.
    pub fn new(account_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            display_name: display_name.into(),
            bio: None,
            avatar_url: None,
            banner_url: None,
            updated_at: Utc::now(),
        }
    }

    /// Every filled media slot on this record.
    pub fn media_slots(&self) -> impl Iterator<Item = &str> {
        [&self.avatar_url, &self.banner_url]
            .into_iter()
            .flatten()
            .map(String::as_str)
    }
}

/// A team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier
    pub id: Uuid,
    /// Team name
    pub name: String,
    /// Team description
    pub description: Option<String>,
    /// Logo image descriptor, if any
    pub logo_url: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Create a team.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            logo_url: None,
            created_at: Utc::now(),
        }
    }

    /// Every filled media slot on this record.
    pub fn media_slots(&self) -> impl Iterator<Item = &str> {
        self.logo_url.as_deref().into_iter()
    }
}

/// A tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    /// Unique identifier
    pub id: Uuid,
    /// Tournament name
    pub name: String,
    /// Scheduled start
    pub starts_at: Option<DateTime<Utc>>,
    /// Banner image descriptor, if any
    pub banner_url: Option<String>,
    /// Rules document descriptor, if any
    pub rules_document_url: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a tournament.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            starts_at: None,
            banner_url: None,
            rules_document_url: None,
            created_at: Utc::now(),
        }
    }

    /// Every filled media slot on this record.
    pub fn media_slots(&self) -> impl Iterator<Item = &str> {
        [&self.banner_url, &self.rules_document_url]
            .into_iter()
            .flatten()
            .map(String::as_str)
    }
}
