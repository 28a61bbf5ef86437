//! Incremental merge of a fresh batch into the persisted corpus.
//!
//! Existing records keep their position and content; new ids are appended
//! in extraction order. Running the same batch twice is a no-op on the
//! record list.

use std::collections::HashSet;

use tracing::{debug, instrument};

use xport_shared::{Corpus, Record};

/// What a merge did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Records carried over from the existing corpus.
    pub existing: usize,
    /// New records appended.
    pub added: usize,
    /// Batch records skipped because their id was already present.
    pub skipped: usize,
}

/// Merge `batch` into `existing` (absent means empty).
#[instrument(skip_all, fields(batch = batch.len()))]
pub fn merge(existing: Option<Corpus>, batch: Vec<Record>) -> (Corpus, MergeStats) {
    let mut records = existing.map(|corpus| corpus.records).unwrap_or_default();
    let mut seen: HashSet<String> = records.iter().map(|r| r.id.clone()).collect();

    let mut stats = MergeStats {
        existing: records.len(),
        ..MergeStats::default()
    };

    for record in batch {
        if seen.insert(record.id.clone()) {
            records.push(record);
            stats.added += 1;
        } else {
            stats.skipped += 1;
        }
    }

    debug!(
        existing = stats.existing,
        added = stats.added,
        skipped = stats.skipped,
        "corpus merged"
    );

    (Corpus::new(records), stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, text: &str) -> Record {
        Record {
            text: text.into(),
            ..Record::with_id(id)
        }
    }

    fn ids(corpus: &Corpus) -> Vec<&str> {
        corpus.records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn first_run_takes_the_batch() {
        let (corpus, stats) = merge(None, vec![record("a", ""), record("b", "")]);
        assert_eq!(ids(&corpus), vec!["a", "b"]);
        assert_eq!(corpus.count, 2);
        assert_eq!(
            stats,
            MergeStats {
                existing: 0,
                added: 2,
                skipped: 0,
            }
        );
    }

    #[test]
    fn existing_first_then_new_in_order() {
        let existing = Corpus::new(vec![record("A", ""), record("B", "")]);
        let (corpus, stats) = merge(Some(existing), vec![record("B", ""), record("C", "")]);
        assert_eq!(ids(&corpus), vec!["A", "B", "C"]);
        assert_eq!(corpus.count, 3);
        assert_eq!(stats.added, 1);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn existing_records_are_never_replaced() {
        let existing = Corpus::new(vec![record("A", "old")]);
        let (corpus, _) = merge(Some(existing), vec![record("A", "new")]);
        assert_eq!(corpus.records.len(), 1);
        assert_eq!(corpus.records[0].text, "old");
    }

    #[test]
    fn merging_the_same_batch_twice_is_idempotent() {
        let existing = Corpus::new(vec![record("x", ""), record("y", "")]);
        let batch = vec![record("y", ""), record("z", ""), record("w", "")];

        let (once, _) = merge(Some(existing), batch.clone());
        let once_records = once.records.clone();
        let (twice, stats) = merge(Some(once), batch);

        assert_eq!(twice.records, once_records);
        assert_eq!(twice.count, once_records.len());
        assert_eq!(stats.added, 0);
        assert_eq!(stats.skipped, 3);
    }

    #[test]
    fn duplicates_within_batch_keep_first() {
        let (corpus, stats) = merge(
            None,
            vec![record("a", "first"), record("a", "second"), record("b", "")],
        );
        assert_eq!(ids(&corpus), vec!["a", "b"]);
        assert_eq!(corpus.records[0].text, "first");
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn empty_batch_keeps_existing() {
        let existing = Corpus::new(vec![record("a", "")]);
        let (corpus, stats) = merge(Some(existing), Vec::new());
        assert_eq!(ids(&corpus), vec!["a"]);
        assert_eq!(stats.existing, 1);
        assert_eq!(stats.added, 0);
    }

    #[test]
    fn count_is_recomputed_not_trusted() {
        let mut existing = Corpus::new(vec![record("a", "")]);
        existing.count = 99;
        let (corpus, _) = merge(Some(existing), vec![record("b", "")]);
        assert_eq!(corpus.count, 2);
    }
}
