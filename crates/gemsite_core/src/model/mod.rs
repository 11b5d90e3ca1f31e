//! Content domain model.
//!
//! # Responsibility
//! - Define the nested content document and its path-based mutator.
//! - Provide the typed section view, factory defaults and media helpers.
//!
//! # Invariants
//! - The generic document is the source of truth; typed views are derived.
//! - Mutation always produces a new snapshot.

pub mod defaults;
pub mod document;
pub mod media;
pub mod site;
