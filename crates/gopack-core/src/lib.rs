//! Core data types for gopack.
//!
//! This crate defines the model of a vendoring run: the typed declaration
//! file, the import-identifier graph, individual dependencies and their
//! fetch/checkout behavior, ordered dependency sets with aggregated
//! validation, the checksum-gated configuration, and the explicit session
//! context that replaces process-wide workspace state.
//!
//! Retrieval itself is behind the [`retrieve::Retriever`] trait; this crate
//! never talks to a version-control client directly.

/// Version reported by `gopack version`.
pub const GOPACK_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod declaration;
pub mod dep;
pub mod dependencies;
pub mod graph;
pub mod project;
pub mod retrieve;
pub mod session;
