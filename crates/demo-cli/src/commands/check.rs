//! Check command implementation

use std::path::Path;

use colored::Colorize;
use demo_core::EngineOptions;
use demo_meta::{Collection, ViewerConfig};

use crate::error::Result;

/// Transform entries naming a file no variant contains.
pub fn unused_renames<'a>(config: &'a ViewerConfig, collection: &Collection) -> Vec<&'a str> {
    config
        .transform
        .keys()
        .filter(|original| {
            !collection
                .variants()
                .any(|(_, variant)| variant.contains_file(original))
        })
        .map(String::as_str)
        .collect()
}

/// Run the check command
pub fn run_check(config_path: &Path) -> Result<()> {
    let config = ViewerConfig::load(config_path)?;
    let collection = config.collection()?;
    // Validates the transform
    EngineOptions::from_config(&config)?;

    println!("{}", collection.title().bold());
    println!();
    println!("{}:      {}", "Slug".dimmed(), collection.slug().cyan());
    println!("{}: {}", "Retention".dimmed(), config.viewer.retention.to_string().cyan());
    println!("{}:     {}", "Scope".dimmed(), collection.preference_scope());
    println!();

    for (name, variant) in collection.variants() {
        let marker = if collection.is_default_variant(name) {
            " (default)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("{}{}:", name.bold(), marker);
        for file in variant.file_names() {
            let display = config
                .transform
                .get(file)
                .map(|display| format!(" -> {display}"))
                .unwrap_or_default();
            println!(
                "  {} {}{}  {}",
                "+".green(),
                file,
                display.dimmed(),
                collection.file_slug(name, file).cyan()
            );
        }
    }

    let unused = unused_renames(&config, &collection);
    if !unused.is_empty() {
        println!();
        for original in unused {
            println!(
                "{} transform renames {} which no variant contains",
                "warning:".yellow().bold(),
                original
            );
        }
    }

    Ok(())
}
