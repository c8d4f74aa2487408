//! Shared utilities for gopack.
//!
//! This crate provides cross-cutting concerns used by all other gopack crates:
//! the error type, filesystem helpers, MD5 hashing of declaration files,
//! cancellable process spawning, and Cargo-style status output.

pub mod errors;
pub mod fs;
pub mod hash;
pub mod process;
pub mod progress;
