//! Slug encode/decode commands

use colored::Colorize;
use demo_slug::{DecodedSlug, decode_slug, encode_collection_slug, encode_file_slug, encode_variant_slug};

use crate::error::{CliError, Result};

/// Compute the slug for the given parts.
///
/// A missing variant means the default variant.
pub fn encode(collection: &str, file: Option<&str>, variant: Option<&str>, is_default: bool) -> String {
    let is_default = is_default || variant.is_none();
    let variant = variant.unwrap_or_default();

    match file {
        Some(file) => encode_file_slug(collection, file, variant, is_default),
        None if is_default => encode_collection_slug(collection),
        None => encode_variant_slug(collection, variant, false),
    }
}

/// Run `slug encode`
pub fn run_slug_encode(
    collection: &str,
    file: Option<&str>,
    variant: Option<&str>,
    is_default: bool,
) -> Result<()> {
    let slug = encode(collection, file, variant, is_default);
    if slug.is_empty() {
        tracing::warn!(collection, "Encoded slug is empty");
    }
    println!("{slug}");
    Ok(())
}

/// Run `slug decode`
pub fn run_slug_decode(slug: &str, variants: &[String]) -> Result<()> {
    let decoded = decode_slug(slug, variants.iter().map(String::as_str));
    let kind = match &decoded {
        DecodedSlug::CollectionOnly { .. } => "collection",
        DecodedSlug::Variant { .. } => "variant",
        DecodedSlug::DefaultVariantFile { .. } => "default-variant file",
        DecodedSlug::VariantFile { .. } => "variant file",
        DecodedSlug::Unparseable => {
            return Err(CliError::user(format!("Unparseable slug: {slug}")));
        }
    };

    println!("{}:       {}", "Kind".dimmed(), kind.cyan());
    if let Some(collection) = decoded.collection() {
        println!("{}: {}", "Collection".dimmed(), collection);
    }
    if let Some(variant) = decoded.variant() {
        println!("{}:    {}", "Variant".dimmed(), variant);
    }
    if let Some(file) = decoded.file() {
        println!("{}:       {}", "File".dimmed(), file);
    }
    Ok(())
}
