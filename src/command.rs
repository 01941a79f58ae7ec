//! Command execution for relnotes.
//!
//! - **generate**: read recent history, build per-author release notes, bump
//!   the manifest version, write both files and commit them.
//! - **view**: load the notes file and render it as an HTML page.

/// Release notes generation from commit history.
pub mod generate;

/// HTML rendering of persisted release notes.
pub mod view;
