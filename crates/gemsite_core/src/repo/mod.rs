//! Repository layer over local durable storage.
//!
//! # Responsibility
//! - Define the persistence contract for the content document.
//! - Keep SQL details out of the session/service layer.
//!
//! # Invariants
//! - Repository writes persist whole documents; there are no partial writes.
//! - Repository APIs return semantic errors (`QuotaExceeded`, `Corrupt`)
//!   in addition to DB transport errors.

pub mod content_repo;
