//! Shared types, error model, and configuration for xport.
//!
//! This crate is the foundation depended on by all other xport crates.
//! It provides:
//! - [`XportError`], the unified error type
//! - Domain types ([`Record`], [`User`], [`Engagement`], [`MediaItem`], [`Corpus`])
//! - Configuration ([`AppConfig`], [`ExportConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ExportConfig, MergeConfig, OutputConfig, config_dir, config_file_path, init_config,
    init_config_at, load_config, load_config_from,
};
pub use error::{Result, XportError};
pub use types::{Corpus, Engagement, MediaItem, Record, User, status_url};
