//! Extraction and merge logic for xport.
//!
//! This crate turns a raw timeline response into normalized records and
//! folds them into a persisted corpus:
//! - [`collector`] finds the entry list among the known container shapes
//! - [`extractor`] builds one record per entry using the [`resolver`] chains
//!   and the [`media`] classifier
//! - [`merge`] appends new records to the existing corpus
//! - [`pipeline`] runs the whole flow end to end

pub mod accessor;
pub mod collector;
pub mod extractor;
pub mod media;
pub mod merge;
pub mod pipeline;
pub mod resolver;

pub use collector::TimelineKind;
pub use merge::MergeStats;
pub use pipeline::{
    ExportOptions, ExportOutcome, ExportSummary, InspectReport, ProgressReporter, SilentProgress,
    export, inspect,
};
