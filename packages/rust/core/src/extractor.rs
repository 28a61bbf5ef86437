//! Turning raw timeline entries into [`Record`]s.
//!
//! Each entry is handled independently. An entry without a tweet payload,
//! or whose payload has no id, yields no record; neither case is an error.

use serde_json::Value;
use tracing::{debug, trace};

use xport_shared::{Engagement, Record, User, status_url};

use crate::accessor::{self, Path, json_path};
use crate::media;
use crate::resolver::{self, URL_ENTITIES, USER_RESULT};

/// Location of the tweet payload inside a timeline entry.
const TWEET_RESULT: Path = json_path!("content", "itemContent", "tweet_results", "result");

const VISIBILITY_WRAPPER: &str = "TweetWithVisibilityResults";

/// Records extracted from a batch of entries, plus what was dropped.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Valid records in entry order.
    pub records: Vec<Record>,
    /// Entries that produced no record (no payload or no id).
    pub dropped: usize,
}

/// The tweet payload of an entry, unwrapped from visibility wrappers.
pub fn tweet_result(entry: &Value) -> Option<&Value> {
    let result = accessor::get(entry, TWEET_RESULT).filter(|v| v.is_object())?;

    if accessor::str_at(result, json_path!("__typename")) != Some(VISIBILITY_WRAPPER) {
        return Some(result);
    }
    let inner = accessor::get(result, json_path!("tweet")).filter(|v| v.is_object());
    Some(inner.unwrap_or(result))
}

/// Extract one record from a raw entry.
pub fn extract_record(entry: &Value) -> Option<Record> {
    let result = tweet_result(entry)?;
    let record = build_record(result);

    if record.id.is_empty() {
        trace!("dropping candidate without id");
        return None;
    }
    Some(record)
}

/// Extract every valid record from `entries`, preserving order.
pub fn extract_all<'a, I>(entries: I) -> Extraction
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut extraction = Extraction::default();
    for entry in entries {
        match extract_record(entry) {
            Some(record) => extraction.records.push(record),
            None => extraction.dropped += 1,
        }
    }

    debug!(
        extracted = extraction.records.len(),
        dropped = extraction.dropped,
        "entries extracted"
    );
    extraction
}

fn build_record(result: &Value) -> Record {
    let null = Value::Null;
    let legacy = accessor::get_or(result, json_path!("legacy"), &null);
    let user_result = accessor::get_or(result, USER_RESULT, &null);

    let id = resolver::ID.text(result);
    let user = build_user(user_result);
    let tweet_url = status_url(user.screen_name.as_deref(), id.as_deref());

    Record {
        id: id.unwrap_or_default(),
        created_at: resolver::CREATED_AT.text(result),
        text: resolver::TEXT.text_or(result, ""),
        lang: resolver::LANG.text(result),
        user,
        engagement: build_engagement(result),
        urls: expanded_urls(result),
        media: media::classify_all(legacy),
        bookmarked: resolver::BOOKMARKED.flag(result),
        possibly_sensitive: resolver::POSSIBLY_SENSITIVE.flag(result),
        source: resolver::SOURCE.text(result),
        tweet_url,
    }
}

fn build_user(user_result: &Value) -> User {
    User {
        id: resolver::USER_ID.text(user_result),
        name: resolver::USER_NAME.text(user_result),
        screen_name: resolver::USER_SCREEN_NAME.text(user_result),
        verified: resolver::USER_VERIFIED.flag(user_result),
        avatar_url: resolver::USER_AVATAR.text(user_result),
    }
}

fn build_engagement(result: &Value) -> Engagement {
    Engagement {
        views: resolver::VIEWS.count(result),
        bookmarks: resolver::BOOKMARKS.count(result),
        likes: resolver::LIKES.count(result),
        retweets: resolver::RETWEETS.count(result),
        replies: resolver::REPLIES.count(result),
        quotes: resolver::QUOTES.count(result),
    }
}

fn expanded_urls(result: &Value) -> Vec<String> {
    accessor::array_or_empty(result, URL_ENTITIES)
        .iter()
        .filter_map(|entity| accessor::str_at(entity, json_path!("expanded_url")))
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}
