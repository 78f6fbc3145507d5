//! Normalize command implementation
//!
//! Rewrites every mapping into canonical form: kind tokens, mode defaults,
//! and a reconciled, clamped feed graph.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use stagecast_session::FeedGraphEditor;
use stagecast_spec::{apply_mode_defaults, MappingMode, MappingState, ProjectDocument};

use crate::input::{load_document, save_document};

#[derive(Serialize)]
struct MappingChange {
    id: String,
    name: String,
    mode: String,
    changed: bool,
}

#[derive(Serialize)]
struct NormalizeOutput {
    success: bool,
    changed: usize,
    mappings: Vec<MappingChange>,
}

/// Normalizes one mapping in place; returns the resolved mode and whether
/// anything changed.
pub fn normalize_mapping(doc: &ProjectDocument, mapping: &mut MappingState) -> (MappingMode, bool) {
    let original = mapping.clone();
    let mode = MappingMode::from_state(mapping);

    mapping.kind = mode.kind_token().to_string();
    apply_mode_defaults(mode, &mut mapping.config);

    if mode == MappingMode::Feed {
        let graph = mapping.config.feed_v2.take().unwrap_or_default();
        let mut editor = FeedGraphEditor::new(graph);

        let valid: Vec<String> = mapping
            .surface_ids
            .iter()
            .filter(|id| doc.surface(id).is_some())
            .cloned()
            .collect();

        editor.ensure_sources_bound(&doc.contexts);
        editor.ensure_destinations_bound(&valid);
        editor.ensure_routes_for_destinations(&mapping.surface_ids);
        editor.clamp_all();

        mapping.config.feed_v2 = Some(editor.into_graph());
    }

    (mode, *mapping != original)
}

/// Run the normalize command.
///
/// With `--write` the document file is rewritten in place; otherwise the
/// canonical document is printed to stdout.
pub fn run(doc_path: &str, write: bool, json_output: bool) -> Result<u8> {
    let mut doc = load_document(Path::new(doc_path))?;

    let mut changes = Vec::new();
    let snapshot = doc.clone();
    for mapping in &mut doc.mappings {
        let (mode, changed) = normalize_mapping(&snapshot, mapping);
        changes.push(MappingChange {
            id: mapping.id.clone(),
            name: mapping.name.clone(),
            mode: mode.to_string(),
            changed,
        });
    }
    let changed = changes.iter().filter(|c| c.changed).count();

    if write {
        save_document(Path::new(doc_path), &doc)?;
    }

    if json_output {
        let output = NormalizeOutput {
            success: true,
            changed,
            mappings: changes,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} {}", "Normalizing:".cyan().bold(), doc_path);
        for change in &changes {
            let marker = if change.changed {
                "~".yellow()
            } else {
                "=".dimmed()
            };
            println!(
                "  {} {} ({}) [{}]",
                marker,
                change.name,
                change.id.dimmed(),
                change.mode
            );
        }
        if write {
            println!(
                "\n{} {} mapping(s) rewritten in place",
                "DONE".green().bold(),
                changed
            );
        } else {
            println!("{}", doc.to_json_pretty()?);
        }
    }

    Ok(0)
}
