//! Release notes viewer.
//!
//! Loads the persisted notes, groups them by minor version and developer, and
//! renders a self-contained HTML page with one collapsible section per minor
//! version.
use log::*;
use serde::Serialize;

use crate::{
    error::Result,
    notes::ReleaseNote,
    viewer::{
        group::{VersionSection, build_sections},
        loader::{NotesLoader, fetch_notes},
        template::PAGE_TEMPLATE,
    },
};

pub mod group;
pub mod loader;
mod template;

/// Page title.
pub const PAGE_TITLE: &str = "Release Notes";

/// Template context for the page.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub title: String,
    pub sections: Vec<VersionSection>,
    pub is_empty: bool,
    pub error: Option<String>,
}

impl Page {
    pub fn from_notes(notes: &[ReleaseNote]) -> Self {
        let sections = build_sections(notes);
        Self {
            title: PAGE_TITLE.into(),
            is_empty: sections.is_empty(),
            sections,
            error: None,
        }
    }

    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            title: PAGE_TITLE.into(),
            sections: vec![],
            is_empty: true,
            error: Some(message.into()),
        }
    }

    pub fn render(&self) -> Result<String> {
        let context = tera::Context::from_serialize(self)?;
        Ok(tera::Tera::one_off(PAGE_TEMPLATE, &context, true)?)
    }
}

/// Load notes through `loader` and render the page. Any failure while
/// loading, grouping or rendering produces the error page instead.
pub async fn build_page(
    loader: &dyn NotesLoader,
    candidates: &[String],
) -> Result<String> {
    match load_and_render(loader, candidates).await {
        Ok(html) => Ok(html),
        Err(err) => {
            error!("unable to render release notes: {err}");
            Page::from_error(err.to_string()).render()
        }
    }
}

async fn load_and_render(
    loader: &dyn NotesLoader,
    candidates: &[String],
) -> Result<String> {
    let notes = fetch_notes(loader, candidates).await?;
    info!("rendering {} release note(s)", notes.len());
    Page::from_notes(&notes).render()
}
