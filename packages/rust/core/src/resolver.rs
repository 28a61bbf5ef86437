//! Ordered fallback chains for output fields.
//!
//! Each output field is declared as a [`FieldChain`]: a name plus the list
//! of candidate locations to try, left to right. The first *present* value
//! wins. Present means resolvable, not `null`, and, for strings, not empty.

use serde_json::Value;

use crate::accessor::{self, Path, json_path};

/// An output field and the ordered source locations it is read from.
#[derive(Debug, Clone, Copy)]
pub struct FieldChain {
    /// Output field name (dotted for nested fields).
    pub field: &'static str,
    /// Candidate locations, highest priority first.
    pub candidates: &'static [Path],
}

impl FieldChain {
    /// First present candidate value.
    pub fn first<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.candidates
            .iter()
            .filter_map(|candidate| accessor::get(root, candidate))
            .find(|value| is_present(value))
    }

    /// First candidate that reads as text. Numbers are rendered, since some
    /// payloads carry ids as JSON numbers.
    pub fn text(&self, root: &Value) -> Option<String> {
        self.candidates
            .iter()
            .filter_map(|candidate| accessor::get(root, candidate))
            .find_map(as_text)
    }

    /// Like [`text`](Self::text) with a default.
    pub fn text_or(&self, root: &Value, default: &str) -> String {
        self.text(root).unwrap_or_else(|| default.to_string())
    }

    /// Numeric coercion of the first present candidate; 0 otherwise.
    pub fn count(&self, root: &Value) -> u64 {
        self.first(root).map(coerce_count).unwrap_or(0)
    }

    /// Truthiness of the first present candidate; `false` otherwise.
    pub fn flag(&self, root: &Value) -> bool {
        self.first(root).is_some_and(truthy)
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a counter to a non-negative integer.
///
/// Accepts unsigned integers, non-negative finite floats (truncated) and
/// strings holding an unsigned integer. Everything else is 0.
pub fn coerce_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

/// Loose boolean cast: non-zero numbers and non-empty strings or containers are true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

// ---------------------------------------------------------------------------
// Tweet-level chains (rooted at the tweet result)
// ---------------------------------------------------------------------------

pub const ID: FieldChain = FieldChain {
    field: "id",
    candidates: &[json_path!("legacy", "id_str"), json_path!("rest_id")],
};

pub const CREATED_AT: FieldChain = FieldChain {
    field: "created_at",
    candidates: &[json_path!("legacy", "created_at"), json_path!("core", "created_at")],
};

pub const TEXT: FieldChain = FieldChain {
    field: "text",
    candidates: &[
        json_path!("legacy", "full_text"),
        json_path!("note_tweet", "note_tweet_results", "result", "text"),
    ],
};

pub const LANG: FieldChain = FieldChain {
    field: "lang",
    candidates: &[json_path!("legacy", "lang"), json_path!("lang")],
};

pub const SOURCE: FieldChain = FieldChain {
    field: "source",
    candidates: &[json_path!("legacy", "source"), json_path!("source")],
};

pub const BOOKMARKED: FieldChain = FieldChain {
    field: "bookmarked",
    candidates: &[json_path!("legacy", "bookmarked")],
};

pub const POSSIBLY_SENSITIVE: FieldChain = FieldChain {
    field: "possibly_sensitive",
    candidates: &[json_path!("legacy", "possibly_sensitive")],
};

/// Where the author object lives inside a tweet result.
pub const USER_RESULT: Path = json_path!("core", "user_results", "result");

// ---------------------------------------------------------------------------
// User chains (rooted at the user result)
// ---------------------------------------------------------------------------

pub const USER_NAME: FieldChain = FieldChain {
    field: "user.name",
    candidates: &[json_path!("core", "name"), json_path!("legacy", "name")],
};

pub const USER_SCREEN_NAME: FieldChain = FieldChain {
    field: "user.screen_name",
    candidates: &[json_path!("core", "screen_name"), json_path!("legacy", "screen_name")],
};

pub const USER_ID: FieldChain = FieldChain {
    field: "user.id",
    candidates: &[json_path!("rest_id"), json_path!("legacy", "id_str")],
};

pub const USER_VERIFIED: FieldChain = FieldChain {
    field: "user.verified",
    candidates: &[json_path!("is_blue_verified")],
};

pub const USER_AVATAR: FieldChain = FieldChain {
    field: "user.avatar_url",
    candidates: &[json_path!("avatar", "image_url")],
};

// ---------------------------------------------------------------------------
// Engagement chains (rooted at the tweet result)
// ---------------------------------------------------------------------------

pub const VIEWS: FieldChain = FieldChain {
    field: "engagement.views",
    candidates: &[json_path!("views", "count")],
};

pub const BOOKMARKS: FieldChain = FieldChain {
    field: "engagement.bookmarks",
    candidates: &[json_path!("legacy", "bookmark_count")],
};

pub const LIKES: FieldChain = FieldChain {
    field: "engagement.likes",
    candidates: &[json_path!("legacy", "favorite_count")],
};

pub const RETWEETS: FieldChain = FieldChain {
    field: "engagement.retweets",
    candidates: &[json_path!("legacy", "retweet_count")],
};

pub const REPLIES: FieldChain = FieldChain {
    field: "engagement.replies",
    candidates: &[json_path!("legacy", "reply_count")],
};

pub const QUOTES: FieldChain = FieldChain {
    field: "engagement.quotes",
    candidates: &[json_path!("legacy", "quote_count")],
};

/// Expanded URL entities, in source order.
pub const URL_ENTITIES: Path = json_path!("legacy", "entities", "urls");
