//! Hash command implementation
//!
//! Prints each mapping's live hash — the value the editing session compares
//! to decide whether a backend write is needed. Useful for diffing two
//! documents or checking whether a normalize would write.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use stagecast_spec::live_state_hash;

use crate::input::load_document;

#[derive(Serialize)]
struct MappingHash {
    id: String,
    name: String,
    hash: String,
}

#[derive(Serialize)]
struct HashOutput {
    success: bool,
    mappings: Vec<MappingHash>,
}

/// Run the hash command.
pub fn run(doc_path: &str, json_output: bool) -> Result<u8> {
    let doc = load_document(Path::new(doc_path))?;

    let hashes: Vec<MappingHash> = doc
        .mappings
        .iter()
        .map(|mapping| MappingHash {
            id: mapping.id.clone(),
            name: mapping.name.clone(),
            hash: live_state_hash(mapping),
        })
        .collect();

    if json_output {
        let output = HashOutput {
            success: true,
            mappings: hashes,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} {}", "Hashing:".cyan().bold(), doc_path);
        if hashes.is_empty() {
            println!("  {}", "no mappings".dimmed());
        }
        for entry in &hashes {
            println!(
                "  {}  {} ({})",
                &entry.hash[..16],
                entry.name,
                entry.id.dimmed()
            );
        }
    }

    Ok(0)
}
