//! Shared types, error model, and configuration for pagesmith.
//!
//! This crate is the foundation depended on by all other pagesmith crates.
//! It provides:
//! - [`PagesmithError`] — the unified error type
//! - Normalized records ([`Page`], [`Post`], [`TeamMember`], [`RecordId`])
//! - Configuration ([`AppConfig`], [`BackendConfig`], [`FetchConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BackendSection, DefaultsConfig, FetchConfig, RetryConfig, backend_config,
    config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{PagesmithError, Result};
pub use types::{BackendConfig, Page, Post, RecordId, TeamMember};
