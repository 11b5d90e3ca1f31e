//! Use-case layer over the content model and its storage.
//!
//! # Responsibility
//! - Compose document, repository, share-link and export operations into
//!   one editing session.
//! - Keep the CLI decoupled from storage details.

pub mod site_session;
