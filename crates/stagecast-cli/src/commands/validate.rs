//! Validate command implementation
//!
//! Validates a project document and prints errors/warnings with codes and
//! paths.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use stagecast_spec::{validate_document, ValidationResult};

use crate::input::load_document;

#[derive(Serialize)]
struct JsonDiagnostic {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

#[derive(Serialize)]
struct ValidateOutput {
    success: bool,
    errors: Vec<JsonDiagnostic>,
    warnings: Vec<JsonDiagnostic>,
}

/// Run the validate command.
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid or unreadable.
pub fn run(doc_path: &str, json_output: bool) -> Result<u8> {
    let doc = match load_document(Path::new(doc_path)) {
        Ok(doc) => doc,
        Err(err) if json_output => {
            let output = ValidateOutput {
                success: false,
                errors: vec![JsonDiagnostic {
                    code: "LOAD".to_string(),
                    message: format!("{:#}", err),
                    path: None,
                }],
                warnings: vec![],
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(1);
        }
        Err(err) => return Err(err),
    };

    let result = validate_document(&doc);

    if json_output {
        let output = ValidateOutput {
            success: result.is_ok(),
            errors: result
                .errors
                .iter()
                .map(|e| JsonDiagnostic {
                    code: e.code.to_string(),
                    message: e.message.clone(),
                    path: e.path.clone(),
                })
                .collect(),
            warnings: result
                .warnings
                .iter()
                .map(|w| JsonDiagnostic {
                    code: w.code.to_string(),
                    message: w.message.clone(),
                    path: w.path.clone(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} {}", "Validating:".cyan().bold(), doc_path);
        println!(
            "{} {} context(s), {} surface(s), {} mapping(s)",
            "Document:".dimmed(),
            doc.contexts.len(),
            doc.surfaces.len(),
            doc.mappings.len()
        );
        print_results(&result);
        if result.is_ok() {
            println!("\n{} Document is valid", "SUCCESS".green().bold());
        } else {
            println!(
                "\n{} Document has {} error(s)",
                "FAILED".red().bold(),
                result.errors.len()
            );
        }
    }

    if result.is_ok() {
        Ok(0)
    } else {
        Ok(1)
    }
}

/// Print validation results to the console.
fn print_results(result: &ValidationResult) {
    if !result.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for error in &result.errors {
            let path_info = error
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "x".red(),
                error.code.to_string().red(),
                path_info.dimmed(),
                error.message
            );
        }
    }

    if !result.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in &result.warnings {
            let path_info = warning
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "!".yellow(),
                warning.code.to_string().yellow(),
                path_info.dimmed(),
                warning.message
            );
        }
    }
}
