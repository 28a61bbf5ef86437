//! Core domain types for exported timeline records.
//!
//! Field names are the wire contract with downstream readers of the corpus
//! file. Optional fields serialize as `null` rather than being omitted, so
//! every record in a corpus has the same set of keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Host used when building canonical status links.
const STATUS_URL_BASE: &str = "https://x.com";

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// Author of a post, embedded in every [`Record`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Numeric user id as a string.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Handle without the leading `@`.
    #[serde(default)]
    pub screen_name: Option<String>,
    /// Blue-check flag.
    #[serde(default)]
    pub verified: bool,
    /// Profile image URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Engagement
// ---------------------------------------------------------------------------

/// Public counters of a post. Missing counters are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub bookmarks: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub retweets: u64,
    #[serde(default)]
    pub replies: u64,
    #[serde(default)]
    pub quotes: u64,
}

// ---------------------------------------------------------------------------
// MediaItem
// ---------------------------------------------------------------------------

/// A normalized media attachment.
///
/// Animated GIFs are carried as [`MediaItem::Video`]; they ship as MP4
/// variants upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaItem {
    Photo {
        url: Option<String>,
    },
    Video {
        thumbnail: Option<String>,
        /// Playable URLs in upstream order.
        #[serde(default)]
        variants: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One normalized post. `id` is the identity key used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub engagement: Engagement,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
    #[serde(default)]
    pub bookmarked: bool,
    #[serde(default)]
    pub possibly_sensitive: bool,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub tweet_url: Option<String>,
}

impl Record {
    /// A record with only an id; every other field at its default.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: None,
            text: String::new(),
            lang: None,
            user: User::default(),
            engagement: Engagement::default(),
            urls: Vec::new(),
            media: Vec::new(),
            bookmarked: false,
            possibly_sensitive: false,
            source: None,
            tweet_url: None,
        }
    }
}

/// Build the canonical status link. Both parts must be non-empty.
pub fn status_url(screen_name: Option<&str>, id: Option<&str>) -> Option<String> {
    match (screen_name, id) {
        (Some(handle), Some(id)) if !handle.is_empty() && !id.is_empty() => {
            Some(format!("{STATUS_URL_BASE}/{handle}/status/{id}"))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Corpus
// ---------------------------------------------------------------------------

/// The persisted, deduplicated, ordered collection of records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    /// When this corpus was last written.
    pub exported_at: DateTime<Utc>,
    /// Number of records; always equal to `records.len()` when built here.
    pub count: usize,
    /// Records in accumulation order, unique by id.
    #[serde(alias = "tweets")]
    pub records: Vec<Record>,
}

impl Corpus {
    /// Stamp a record list with the current time and its length.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            exported_at: Utc::now(),
            count: records.len(),
            records,
        }
    }
}
