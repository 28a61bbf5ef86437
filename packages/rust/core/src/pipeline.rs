//! End-to-end export: raw document → entries → records → merged corpus.
//!
//! Everything here works on in-memory values; reading and writing files is
//! the storage crate's job.

use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{info, instrument};

use xport_shared::Corpus;

use crate::collector::{self, TimelineKind};
use crate::extractor::{self, Extraction};
use crate::merge::{self, MergeStats};

/// Options for a single export run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Ignore the existing corpus and keep only the new batch.
    pub fresh: bool,
}

/// Summary of an export run.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Container the entries were found in, if any.
    pub timeline: Option<TimelineKind>,
    /// Raw entries seen.
    pub entries: usize,
    /// Valid records extracted from those entries.
    pub extracted: usize,
    /// Entries that produced no record.
    pub dropped: usize,
    /// Outcome of the merge step.
    pub merge: MergeStats,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Result of the export pipeline.
#[derive(Debug)]
pub struct ExportOutcome {
    pub corpus: Corpus,
    pub summary: ExportSummary,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each entry is processed.
    fn entry_processed(&self, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, summary: &ExportSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn entry_processed(&self, _current: usize, _total: usize) {}
    fn done(&self, _summary: &ExportSummary) {}
}

/// Run the export pipeline.
///
/// 1. Locate the entry list in the document
/// 2. Extract one record per valid entry
/// 3. Merge the batch into `existing` (unless `options.fresh`)
#[instrument(skip_all, fields(fresh = options.fresh))]
pub fn export(
    document: &Value,
    existing: Option<Corpus>,
    options: &ExportOptions,
    progress: &dyn ProgressReporter,
) -> ExportOutcome {
    let start = Instant::now();

    progress.phase("Locating timeline entries");
    let collected = collector::collect_entries(document);
    let total = collected.entries.len();

    progress.phase("Extracting records");
    let mut extraction = Extraction::default();
    for (i, entry) in collected.entries.iter().enumerate() {
        match extractor::extract_record(entry) {
            Some(record) => extraction.records.push(record),
            None => extraction.dropped += 1,
        }
        progress.entry_processed(i + 1, total);
    }
    let extracted = extraction.records.len();

    progress.phase("Merging with existing corpus");
    let existing = if options.fresh { None } else { existing };
    let (corpus, merge_stats) = merge::merge(existing, extraction.records);

    let summary = ExportSummary {
        timeline: collected.kind,
        entries: total,
        extracted,
        dropped: extraction.dropped,
        merge: merge_stats,
        elapsed: start.elapsed(),
    };

    info!(
        timeline = ?summary.timeline,
        entries = summary.entries,
        extracted = summary.extracted,
        added = summary.merge.added,
        total = corpus.count,
        elapsed_ms = summary.elapsed.as_millis(),
        "export complete"
    );

    progress.done(&summary);
    ExportOutcome { corpus, summary }
}

/// What a document contains, without merging or writing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectReport {
    pub timeline: Option<TimelineKind>,
    pub entries: usize,
    pub extractable: usize,
}

/// Count entries and extractable records in a document.
pub fn inspect(document: &Value) -> InspectReport {
    let collected = collector::collect_entries(document);
    let extraction = extractor::extract_all(collected.entries.iter().copied());
    InspectReport {
        timeline: collected.kind,
        entries: collected.entries.len(),
        extractable: extraction.records.len(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use serde_json::json;
    use xport_shared::Record;

    fn tweet_entry(id: &str, text: &str) -> Value {
        json!({
            "entryId": format!("tweet-{id}"),
            "content": { "itemContent": { "tweet_results": { "result": {
                "rest_id": id,
                "legacy": { "full_text": text }
            } } } }
        })
    }

    fn bookmarks(entries: Vec<Value>) -> Value {
        json!({ "data": { "bookmark_timeline_v2": { "timeline": { "instructions": [
            { "type": "TimelineAddEntries", "entries": entries }
        ] } } } })
    }

    fn ids(corpus: &Corpus) -> Vec<&str> {
        corpus.records.iter().map(|r| r.id.as_str()).collect()
    }

    #[derive(Default)]
    struct RecordingProgress {
        phases: Mutex<Vec<String>>,
        processed: Mutex<usize>,
        done: Mutex<bool>,
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, name: &str) {
            self.phases.lock().unwrap().push(name.to_string());
        }
        fn entry_processed(&self, current: usize, _total: usize) {
            *self.processed.lock().unwrap() = current;
        }
        fn done(&self, _summary: &ExportSummary) {
            *self.done.lock().unwrap() = true;
        }
    }

    #[test]
    fn export_first_run() {
        let doc = bookmarks(vec![
            tweet_entry("1", "one"),
            json!({ "entryId": "cursor-bottom", "content": { "value": "abc" } }),
            tweet_entry("2", "two"),
        ]);

        let outcome = export(&doc, None, &ExportOptions::default(), &SilentProgress);
        assert_eq!(ids(&outcome.corpus), vec!["1", "2"]);
        assert_eq!(outcome.corpus.count, 2);
        assert_eq!(outcome.summary.timeline, Some(TimelineKind::Bookmarks));
        assert_eq!(outcome.summary.entries, 3);
        assert_eq!(outcome.summary.extracted, 2);
        assert_eq!(outcome.summary.dropped, 1);
    }

    #[test]
    fn export_appends_to_existing() {
        let existing = Corpus::new(vec![Record::with_id("A"), Record::with_id("B")]);
        let doc = bookmarks(vec![tweet_entry("B", ""), tweet_entry("C", "")]);

        let outcome = export(&doc, Some(existing), &ExportOptions::default(), &SilentProgress);
        assert_eq!(ids(&outcome.corpus), vec!["A", "B", "C"]);
        assert_eq!(outcome.summary.merge.added, 1);
        assert_eq!(outcome.summary.merge.skipped, 1);
    }

    #[test]
    fn fresh_export_ignores_existing() {
        let existing = Corpus::new(vec![Record::with_id("A")]);
        let doc = bookmarks(vec![tweet_entry("C", "")]);

        let outcome = export(&doc, Some(existing), &ExportOptions { fresh: true }, &SilentProgress);
        assert_eq!(ids(&outcome.corpus), vec!["C"]);
        assert_eq!(outcome.summary.merge.existing, 0);
    }

    #[test]
    fn export_twice_is_stable() {
        let doc = bookmarks(vec![tweet_entry("1", ""), tweet_entry("2", "")]);
        let first = export(&doc, None, &ExportOptions::default(), &SilentProgress);
        let first_records = first.corpus.records.clone();
        let second = export(&doc, Some(first.corpus), &ExportOptions::default(), &SilentProgress);
        assert_eq!(second.corpus.records, first_records);
        assert_eq!(second.summary.merge.added, 0);
    }

    #[test]
    fn unknown_document_keeps_existing_untouched() {
        let existing = Corpus::new(vec![Record::with_id("A")]);
        let outcome = export(
            &json!({ "errors": [{ "message": "Rate limit exceeded" }] }),
            Some(existing),
            &ExportOptions::default(),
            &SilentProgress,
        );
        assert_eq!(ids(&outcome.corpus), vec!["A"]);
        assert_eq!(outcome.summary.timeline, None);
        assert_eq!(outcome.summary.entries, 0);
    }

    #[test]
    fn progress_is_reported() {
        let doc = bookmarks(vec![tweet_entry("1", ""), tweet_entry("2", "")]);
        let progress = RecordingProgress::default();
        export(&doc, None, &ExportOptions::default(), &progress);

        assert_eq!(progress.phases.lock().unwrap().len(), 3);
        assert_eq!(*progress.processed.lock().unwrap(), 2);
        assert!(*progress.done.lock().unwrap());
    }

    #[test]
    fn inspect_counts_without_merging() {
        let doc = bookmarks(vec![tweet_entry("1", ""), json!({ "entryId": "cursor" })]);
        assert_eq!(
            inspect(&doc),
            InspectReport {
                timeline: Some(TimelineKind::Bookmarks),
                entries: 2,
                extractable: 1,
            }
        );
    }

    #[test]
    fn bookmarks_fixture_exports() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/bookmarks.fixture.json")
            .expect("read fixture");
        let doc: Value = serde_json::from_str(&fixture).expect("parse fixture");

        let outcome = export(&doc, None, &ExportOptions::default(), &SilentProgress);
        assert_eq!(outcome.summary.timeline, Some(TimelineKind::Bookmarks));
        assert_eq!(outcome.summary.entries, 4);
        assert_eq!(
            ids(&outcome.corpus),
            vec![
                "1800000000000000001",
                "1800000000000000002",
                "1800000000000000003"
            ]
        );

        let first = &outcome.corpus.records[0];
        assert_eq!(first.user.screen_name.as_deref(), Some("rustlang"));
        assert_eq!(first.engagement.likes, 2048);
        assert_eq!(
            first.tweet_url.as_deref(),
            Some("https://x.com/rustlang/status/1800000000000000001")
        );

        let second = &outcome.corpus.records[1];
        assert_eq!(second.media.len(), 2);
        assert_eq!(second.text, "Long-form note text that replaces the truncated legacy text.");
        assert_eq!(second.user.name.as_deref(), Some("Ferris"));
        assert_eq!(second.engagement.likes, 17);
        assert_eq!(second.engagement.retweets, 0);
        assert!(second.bookmarked);

        let third = &outcome.corpus.records[2];
        assert_eq!(third.id, "1800000000000000003");
        assert_eq!(third.text, "visible to some");
    }

    #[test]
    fn home_fixture_exports() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/home.fixture.json")
            .expect("read fixture");
        let doc: Value = serde_json::from_str(&fixture).expect("parse fixture");

        let outcome = export(&doc, None, &ExportOptions::default(), &SilentProgress);
        assert_eq!(outcome.summary.timeline, Some(TimelineKind::Home));
        assert_eq!(ids(&outcome.corpus), vec!["1900000000000000001", "1900000000000000002"]);
        assert_eq!(outcome.corpus.records[1].engagement.views, 0);
    }
}
