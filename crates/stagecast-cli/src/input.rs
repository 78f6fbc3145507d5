//! Loading and saving project document files.

use std::path::Path;

use anyhow::{Context, Result};

use stagecast_spec::ProjectDocument;

/// Loads a project document from a JSON file.
pub fn load_document(path: &Path) -> Result<ProjectDocument> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document file: {}", path.display()))?;
    ProjectDocument::from_json(&json)
        .with_context(|| format!("failed to parse document file: {}", path.display()))
}

/// Writes a project document back as pretty JSON (with a trailing newline).
pub fn save_document(path: &Path, doc: &ProjectDocument) -> Result<()> {
    let mut json = doc
        .to_json_pretty()
        .context("failed to serialize document")?;
    json.push('\n');
    std::fs::write(path, json)
        .with_context(|| format!("failed to write document file: {}", path.display()))
}
