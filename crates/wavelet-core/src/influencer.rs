//! Tracked influencers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Social platform an influencer publishes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Instagram,
    Linkedin,
    Twitter,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Youtube,
        Platform::Instagram,
        Platform::Linkedin,
        Platform::Twitter,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::UnknownPlatform(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Influencer {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub platform: Platform,
    pub followers: i64,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Influencer {
    /// Handle with any leading `@` removed, as content sources expect it.
    #[must_use]
    pub fn handle(&self) -> &str {
        self.username.trim_start_matches('@')
    }
}

/// Fields accepted when creating an influencer.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInfluencer {
    pub name: String,
    pub username: String,
    pub platform: Platform,
    pub followers: i64,
    pub avatar: Option<String>,
    pub is_active: bool,
}

impl NewInfluencer {
    /// An active influencer with zero followers and no avatar.
    #[must_use]
    pub fn new(name: impl Into<String>, username: impl Into<String>, platform: Platform) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            platform,
            followers: 0,
            avatar: None,
            is_active: true,
        }
    }
}

// Option<Option<T>> on `avatar`: outer None = keep current, Some(None) = clear.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfluencerPatch {
    pub name: Option<String>,
    pub username: Option<String>,
    pub platform: Option<Platform>,
    pub followers: Option<i64>,
    pub avatar: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl InfluencerPatch {
    /// Apply the set fields onto `influencer`, leaving the rest untouched.
    pub fn apply(self, influencer: &mut Influencer) {
        if let Some(name) = self.name {
            influencer.name = name;
        }
        if let Some(username) = self.username {
            influencer.username = username;
        }
        if let Some(platform) = self.platform {
            influencer.platform = platform;
        }
        if let Some(followers) = self.followers {
            influencer.followers = followers;
        }
        if let Some(avatar) = self.avatar {
            influencer.avatar = avatar;
        }
        if let Some(is_active) = self.is_active {
            influencer.is_active = is_active;
        }
    }
}
