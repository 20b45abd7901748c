//! Resolve command implementation

use std::path::Path;

use colored::Colorize;
use demo_core::{resolve, resolve_variant_only};
use demo_meta::{Collection, FileRef, ViewerConfig};
use serde::Serialize;

use crate::error::{CliError, Result};

/// Outcome of resolving one hash value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveReport {
    pub hash: String,
    pub active: String,
    /// Matched file, if any
    #[serde(rename = "match")]
    pub matched: Option<FileRef>,
    /// The match needs a variant switch first
    pub requires_switch: bool,
    /// Variant named by a variant-only slug (honoured at mount only)
    pub variant_only: Option<String>,
}

/// Resolve `hash` against `collection` with `active` as the active variant.
pub fn resolve_hash(collection: &Collection, hash: &str, active: Option<&str>) -> Result<ResolveReport> {
    let active = active.unwrap_or_else(|| collection.first_variant());
    if !collection.contains_variant(active) {
        return Err(CliError::user(format!(
            "Unknown variant '{active}', expected one of: {}",
            collection.variant_names().collect::<Vec<_>>().join(", ")
        )));
    }

    let found = resolve(hash, collection, active);
    Ok(ResolveReport {
        hash: hash.to_string(),
        active: active.to_string(),
        requires_switch: found.as_ref().is_some_and(|found| !found.is_in(active)),
        matched: found.map(|found| found.into_file_ref()),
        variant_only: resolve_variant_only(hash, collection).map(str::to_string),
    })
}

/// Run the resolve command
pub fn run_resolve(config_path: &Path, hash: &str, active: Option<&str>, json: bool) -> Result<()> {
    let config = ViewerConfig::load(config_path)?;
    let collection = config.collection()?;
    let hash = hash.strip_prefix('#').unwrap_or(hash);
    let report = resolve_hash(&collection, hash, active)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match &report.matched {
        Some(file) if report.requires_switch => {
            println!(
                "{} {} (switch from {})",
                "match".green().bold(),
                file.to_string().cyan(),
                report.active.yellow()
            );
        }
        Some(file) => {
            println!("{} {}", "match".green().bold(), file.to_string().cyan());
        }
        None => match &report.variant_only {
            Some(variant) => println!(
                "{} variant {} (main file, at mount only)",
                "link".yellow().bold(),
                variant.cyan()
            ),
            None => println!("{} nothing in {}", "no match".red().bold(), collection.title()),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collection() -> Collection {
        ViewerConfig::parse(
            r#"
            [collection]
            id = "demo"

            [variants.Default]
            main = { name = "component.tsx" }
            files = { "styles.css" = "./styles.css" }

            [variants.Premium]
            main = { name = "component.tsx" }
            files = { "helper.ts" = "./premium/helper.ts" }
            "#,
        )
        .unwrap()
        .collection()
        .unwrap()
    }

    #[test]
    fn test_resolve_cross_variant() {
        let report = resolve_hash(&collection(), "demo:premium:helper.ts", None).unwrap();
        assert_eq!(
            report,
            ResolveReport {
                hash: "demo:premium:helper.ts".to_string(),
                active: "Default".to_string(),
                matched: Some(FileRef::new("Premium", "helper.ts")),
                requires_switch: true,
                variant_only: None,
            }
        );
    }

    #[test]
    fn test_resolve_variant_only() {
        let report = resolve_hash(&collection(), "demo:premium", Some("Default")).unwrap();
        assert_eq!(report.matched, None);
        assert_eq!(report.variant_only.as_deref(), Some("Premium"));
    }

    #[test]
    fn test_resolve_unknown_active_variant() {
        let result = resolve_hash(&collection(), "demo:styles.css", Some("Gone"));
        assert!(matches!(result, Err(CliError::User { .. })));
    }
}
