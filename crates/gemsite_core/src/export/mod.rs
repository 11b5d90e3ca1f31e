//! On-demand textual exports of site content.

pub mod csv;
