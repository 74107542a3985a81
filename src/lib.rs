//! # IFSC Lookup SDK
//!
//! A Rust client library for looking up Indian bank branch routing codes
//! (IFSC) through a remote proxy API, with a cascading bank → state →
//! district → branch selection flow and a process-lifetime lookup cache.
//!
//! ## Overview
//!
//! Two cooperating pieces:
//!
//! - **Cascade controller**: four dependent selection levels; changing a
//!   parent level invalidates all descendants and re-fetches the child
//!   level's option list.
//! - **Lookup cache**: memoizes previously fetched option lists per
//!   ancestor-selection key so repeated navigation never repeats a network
//!   call.
//!
//! A parallel direct path bypasses the cascade entirely: a free-text IFSC
//! code (trimmed, uppercased) resolves to the full branch record in a single
//! fetch.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use ifsc_lookup_sdk::{api::HttpDirectoryApi, cache::LookupCache, lookup::LookupSession, settings::Settings};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let settings = Settings::new()?;
//! let api = Arc::new(HttpDirectoryApi::new(&settings.api)?);
//! let mut session = LookupSession::new(api, Arc::new(LookupCache::new()));
//! session.init().await;
//! session.lookup_code("SBIN0000001").await;
//! # Ok(())
//! # }
//! ```

// Core types
/// Option lists, branch entries, and the final lookup record
pub mod types;
/// Client-layer error taxonomy
pub mod error;

// Lookup pipeline
/// Remote proxy endpoints (trait seam + reqwest client)
pub mod api;
/// Per-key memoization of fetched option lists
pub mod cache;
/// Dependent-dropdown state machine over the four levels
pub mod cascade;
/// Direct and cascade lookup paths, session state
pub mod lookup;

// UI support
/// Timed "copied" indicator around a clipboard write
pub mod copy_feedback;

// Infrastructure
/// Configuration management
pub mod settings;
/// Metrics and observability
pub mod metrics;

// Re-exports for convenience
pub use api::{DirectoryApi, HttpDirectoryApi};
pub use cache::LookupCache;
pub use cascade::{CascadeController, CascadeLevel, PendingOptions};
pub use error::ApiError;
pub use lookup::LookupSession;
pub use settings::Settings;
pub use types::{LookupOutcome, LookupRecord, OptionItem, OptionList};
