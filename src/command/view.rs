//! Release notes page command implementation.
use chrono::Utc;
use log::*;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::{
    cli::Args,
    config::Config,
    error::Result,
    repo::discover_root,
    viewer::{
        build_page,
        loader::{FileLoader, HttpLoader, NotesLoader, candidate_locations},
    },
};

/// Render the notes page and write it to `out_file` or stdout.
pub async fn execute(
    args: &Args,
    source: Option<String>,
    out_file: Option<String>,
) -> Result<()> {
    let root = discover_root(Path::new(&args.repo));
    let config = Config::load(&root)?;
    let notes_path = Path::new(&config.notes_file);

    // without an explicit source, read from the directory generate writes to
    let source = source.unwrap_or_else(|| {
        notes_path
            .parent()
            .map(|dir| root.join(dir))
            .unwrap_or_else(|| root.clone())
            .display()
            .to_string()
    });
    let loader = create_loader(&source)?;

    // only the file name is tried against each candidate prefix
    let file_name = notes_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.notes_file.clone());

    let candidates = candidate_locations(&file_name, Utc::now().timestamp());
    let html = build_page(loader.as_ref(), &candidates).await?;

    if let Some(out_file) = out_file {
        let file_path = Path::new(&out_file);

        if let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await?;
        }

        info!("writing release notes page to: {}", file_path.display());
        fs::write(file_path, &html).await?;
    } else {
        println!("{html}");
    }

    Ok(())
}

/// HTTP(S) sources are fetched over the network, anything else is read from
/// disk.
fn create_loader(source: &str) -> Result<Box<dyn NotesLoader>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        debug!("loading release notes over http from {source}");
        return Ok(Box::new(HttpLoader::new(source)?));
    }

    debug!("loading release notes from directory {source}");
    Ok(Box::new(FileLoader::new(PathBuf::from(source))))
}
