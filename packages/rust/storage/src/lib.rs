//! File-backed storage for raw documents and the exported corpus.
//!
//! The [`CorpusStore`] owns one corpus file. It is always rewritten
//! wholesale, never patched in place.
//!
//! **Failure rules:**
//! - Unreadable input document: fatal ([`read_document`] returns an error)
//! - Missing corpus: first run, treated as empty
//! - Unreadable corpus, or one whose record list does not parse: logged
//!   with `warn!`, treated as empty
//! - Odd `exported_at` or missing `count`: tolerated, both are rebuilt
//! - Unwritable corpus: fatal

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use xport_shared::{Corpus, Record, Result, XportError};

/// Read and parse the raw timeline document at `path`.
pub fn read_document(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| XportError::io(path, e))?;
    let document = serde_json::from_str(&content)
        .map_err(|e| XportError::parse(format!("{} is not valid JSON: {e}", path.display())))?;
    debug!(path = %path.display(), bytes = content.len(), "raw document loaded");
    Ok(document)
}

/// On-disk corpus as read back. Only the record list has to parse; the
/// header fields are whatever an earlier writer left there.
#[derive(Debug, Deserialize)]
struct StoredCorpus {
    #[serde(default)]
    exported_at: Option<Value>,
    #[serde(alias = "tweets")]
    records: Vec<Record>,
}

impl StoredCorpus {
    fn into_corpus(self) -> Corpus {
        let mut corpus = Corpus::new(self.records);
        if let Some(stamp) = self
            .exported_at
            .and_then(|v| serde_json::from_value::<DateTime<Utc>>(v).ok())
        {
            corpus.exported_at = stamp;
        }
        corpus
    }
}

/// How a corpus file is written.
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Pretty-print the JSON.
    pub pretty: bool,
    /// Write to a sibling temp file, then rename over the target.
    pub atomic: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            atomic: true,
        }
    }
}

/// Handle on a corpus file.
#[derive(Debug, Clone)]
pub struct CorpusStore {
    path: PathBuf,
}

impl CorpusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted corpus.
    ///
    /// Returns `None` when there is nothing usable on disk. A damaged file
    /// is reported but never fails the run: the caller then starts from an
    /// empty corpus.
    pub fn load(&self) -> Option<Corpus> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no existing corpus, starting fresh");
                return None;
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "existing corpus is unreadable, treating it as empty"
                );
                return None;
            }
        };

        match serde_json::from_str::<StoredCorpus>(&content) {
            Ok(stored) => {
                let corpus = stored.into_corpus();
                debug!(
                    path = %self.path.display(),
                    records = corpus.count,
                    "existing corpus loaded"
                );
                Some(corpus)
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "existing corpus is malformed, treating it as empty"
                );
                None
            }
        }
    }

    /// Write `corpus`, replacing whatever is on disk.
    pub fn save(&self, corpus: &Corpus, options: WriteOptions) -> Result<()> {
        let mut content = if options.pretty {
            serde_json::to_string_pretty(corpus)?
        } else {
            serde_json::to_string(corpus)?
        };
        content.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| XportError::io(parent, e))?;
        }

        if options.atomic {
            let tmp = self.temp_path();
            fs::write(&tmp, &content).map_err(|e| XportError::io(&tmp, e))?;
            if let Err(e) = fs::rename(&tmp, &self.path) {
                let _ = fs::remove_file(&tmp);
                return Err(XportError::io(&self.path, e));
            }
        } else {
            fs::write(&self.path, &content).map_err(|e| XportError::io(&self.path, e))?;
        }

        info!(
            path = %self.path.display(),
            records = corpus.count,
            bytes = content.len(),
            "corpus written"
        );
        Ok(())
    }

    /// Sibling temp file used for atomic writes.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "corpus.json".into());
        self.path
            .with_file_name(format!(".{name}.{}.tmp", std::process::id()))
    }
}
