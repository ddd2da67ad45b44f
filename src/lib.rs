#![forbid(unsafe_code)]
//! classlens: runtime type introspection
//!
//! Given a type descriptor from the `classlens_core` runtime type model, classlens
//! finds the fields carrying a marker, lists the method names a type exposes through
//! its own declarations and its directly implemented contracts, and constructs
//! instances through whichever declared constructor fits an argument list, even a
//! private one.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod inspector;
pub mod manifest;

pub use config::{InspectConfig, MatchPolicy};
pub use inspector::{InspectError, TypeInspector, is_matching_arguments};
pub use manifest::{DynamicObject, Manifest, ManifestError};

pub use classlens_core as model;
