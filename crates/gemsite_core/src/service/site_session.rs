//! Site editing session.
//!
//! # Responsibility
//! - Resolve the startup document (share link, then storage, then defaults).
//! - Apply edits as snapshot replacements and persist after every change.
//! - Expose the typed view, share links, CSV export and factory reset.
//!
//! # Invariants
//! - A failed mutation leaves the current snapshot untouched.
//! - A failed save never rolls back the in-memory snapshot; it is reported
//!   as `SaveStatus::Unsaved`.
//! - Storage is only cleared with a `ResetConfirmation`.

use crate::export::csv::itinerary_csv;
use crate::model::defaults::default_document;
use crate::model::document::{ContentDocument, MutationResult, ShapeError};
use crate::model::media::display_image_ref;
use crate::model::site::{EditField, SiteContent};
use crate::repo::content_repo::{ContentRepository, ResetConfirmation, StorageError, StorageResult};
use crate::share::{build_share_url, decode_share_url, DecodeError, ShareLinkError};
use log::{info, warn};

/// Where the startup document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Defaults,
    Storage,
    ShareLink,
}

impl ContentSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Defaults => "defaults",
            Self::Storage => "storage",
            Self::ShareLink => "share_link",
        }
    }
}

/// Outcome of persisting the current snapshot.
#[derive(Debug)]
pub enum SaveStatus {
    Saved,
    Unsaved(StorageError),
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// What happened while resolving the startup document.
#[derive(Debug)]
pub struct BootReport {
    pub source: ContentSource,
    /// Persisted data that could not be read; defaults were used instead.
    pub storage_error: Option<StorageError>,
    /// Share link that could not be decoded; it was ignored.
    pub link_error: Option<DecodeError>,
    /// Result of the save issued right after startup.
    pub save_status: SaveStatus,
}

/// Editing session over one content repository.
pub struct SiteSession<R: ContentRepository> {
    repo: R,
    document: ContentDocument,
    admin_mode: bool,
}

impl<R: ContentRepository> SiteSession<R> {
    /// Resolves the startup document and persists it.
    ///
    /// Precedence: a decodable `config` parameter in `share_url`, then the
    /// persisted slot, then the compiled-in defaults. Unreadable sources are
    /// reported in the `BootReport` and skipped.
    pub fn bootstrap(repo: R, share_url: Option<&str>) -> (Self, BootReport) {
        let mut link_error = None;
        let mut storage_error = None;

        let from_link = match share_url.map(decode_share_url) {
            Some(Ok(found)) => found,
            Some(Err(err)) => {
                warn!("event=session_boot module=service status=error error_code=bad_share_link error={err}");
                link_error = Some(err);
                None
            }
            None => None,
        };

        let (source, document) = match from_link {
            Some(document) => (ContentSource::ShareLink, document),
            None => match repo.load_document() {
                Ok(Some(document)) => (ContentSource::Storage, document),
                Ok(None) => (ContentSource::Defaults, default_document()),
                Err(err) => {
                    warn!("event=session_boot module=service status=error error_code=storage_unreadable error={err}");
                    storage_error = Some(err);
                    (ContentSource::Defaults, default_document())
                }
            },
        };

        let session = Self {
            repo,
            document,
            admin_mode: false,
        };
        let save_status = session.persist();
        info!(
            "event=session_boot module=service status=ok source={} saved={}",
            source.as_str(),
            save_status.is_saved()
        );

        (
            session,
            BootReport {
                source,
                storage_error,
                link_error,
                save_status,
            },
        )
    }

    pub fn document(&self) -> &ContentDocument {
        &self.document
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Sets the text at `path` and persists the new snapshot.
    ///
    /// # Errors
    /// - Any `MutationError`; the current snapshot is kept.
    pub fn apply_edit(&mut self, path: &str, value: impl Into<String>) -> MutationResult<SaveStatus> {
        let next = self.document.update(path, value).inspect_err(|err| {
            warn!("event=content_edit module=service status=error path={path} error={err}");
        })?;
        self.document = next;
        info!("event=content_edit module=service status=ok path={path}");
        Ok(self.persist())
    }

    pub fn apply_field(
        &mut self,
        field: EditField,
        value: impl Into<String>,
    ) -> MutationResult<SaveStatus> {
        self.apply_edit(&field.path(), value)
    }

    /// Swaps in a whole new document and persists it.
    pub fn replace_document(&mut self, document: ContentDocument) -> SaveStatus {
        self.document = document;
        info!("event=content_replace module=service status=ok");
        self.persist()
    }

    pub fn share_link(&self, page_url: &str, limit: usize) -> Result<String, ShareLinkError> {
        build_share_url(&self.document, page_url, limit)
    }

    pub fn export_csv(&self) -> String {
        itinerary_csv(&self.document)
    }

    /// Typed view of the current snapshot.
    pub fn site_content(&self) -> Result<SiteContent, ShapeError> {
        SiteContent::from_document(&self.document)
    }

    /// Clears persisted content and reloads the defaults.
    ///
    /// The defaults are not written back; the next edit persists them.
    /// Returns whether a persisted document was removed.
    pub fn factory_reset(&mut self, confirmation: ResetConfirmation) -> StorageResult<bool> {
        let removed = self.repo.clear_document(confirmation)?;
        self.document = default_document();
        info!("event=factory_reset module=service status=ok removed={removed}");
        Ok(removed)
    }

    pub fn set_admin_mode(&mut self, enabled: bool) {
        self.admin_mode = enabled;
    }

    pub fn is_admin_mode(&self) -> bool {
        self.admin_mode
    }

    /// Every editable field with its display value.
    ///
    /// Embedded images show as a placeholder label; missing values are empty.
    pub fn editable_fields(&self) -> Result<Vec<(EditField, String)>, ShapeError> {
        let content = self.site_content()?;
        Ok(EditField::all_for(&content)
            .into_iter()
            .map(|field| {
                let value = self.document.get_text(&field.path()).unwrap_or_default();
                let shown = if field.is_image() {
                    display_image_ref(value)
                } else {
                    value
                };
                (field, shown.to_string())
            })
            .collect())
    }

    fn persist(&self) -> SaveStatus {
        match self.repo.save_document(&self.document) {
            Ok(()) => SaveStatus::Saved,
            Err(err) => {
                warn!("event=content_persist module=service status=error error={err}");
                SaveStatus::Unsaved(err)
            }
        }
    }
}
