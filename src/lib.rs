//! Release notes from commit history.
//!
//! Classifies recent commits, resolves a semantic-version bump per author,
//! keeps a JSON notes file and the project manifest version in sync, and
//! renders the notes as a collapsible HTML page.
pub mod builder;
pub mod bump;
pub mod classifier;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod notes;
pub mod repo;
pub mod store;
pub mod viewer;

pub use error::{RelnotesError, Result};

#[cfg(test)]
pub mod test_helpers;
