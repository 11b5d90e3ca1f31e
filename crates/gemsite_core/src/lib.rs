//! Content core for the GEM Events promotional site.
//! This crate is the single source of truth for content invariants.

pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod share;
pub mod suggest;

pub use config::{default_data_dir, SiteConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult, OpenTarget};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::defaults::default_document;
pub use model::document::{
    ContentDocument, ContentPath, ContentValue, MutationError, MutationResult, ShapeError,
};
pub use model::media::MediaError;
pub use model::site::{EditField, SiteContent};
pub use repo::content_repo::{
    ContentRepository, ResetConfirmation, SqliteContentRepository, StorageError, StorageResult,
};
pub use service::site_session::{BootReport, ContentSource, SaveStatus, SiteSession};
pub use share::{DecodeError, ShareLinkError};
pub use suggest::{
    suggest, ExternalServiceError, GeminiClient, ItinerarySuggestion, SuggestionClient,
    SuggestionOutcome, SuggestionService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
