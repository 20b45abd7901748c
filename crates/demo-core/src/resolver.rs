//! Selection resolution
//!
//! Matches a channel value against every (variant, file) pair of a
//! collection by exact comparison with the pair's encoded slug. The active
//! variant is searched first so an ambiguous value prefers staying put.
//! No match means no opinion: callers leave the selection untouched.

use demo_meta::{Collection, FileRef};
use demo_slug::{DecodedSlug, SEGMENT_DELIMITER, decode_slug};

/// A (variant, file) pair whose slug equals the channel value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub variant: String,
    pub file: String,
}

impl Match {
    /// Whether the match lies in `variant`.
    pub fn is_in(&self, variant: &str) -> bool {
        self.variant == variant
    }

    pub fn into_file_ref(self) -> FileRef {
        FileRef::new(self.variant, self.file)
    }
}

/// Whether a channel value could name a selection of this collection.
///
/// True when the value is the collection slug or starts with
/// `collectionSlug:`. An empty collection slug claims every non-empty value.
pub fn belongs_to(channel_value: &str, collection: &Collection) -> bool {
    let slug = collection.slug();
    if slug.is_empty() {
        return !channel_value.is_empty();
    }
    channel_value == slug
        || channel_value
            .strip_prefix(slug.as_str())
            .is_some_and(|rest| rest.starts_with(SEGMENT_DELIMITER))
}

/// Match `channel_value` against the files of a single variant.
pub fn resolve_in_variant(channel_value: &str, collection: &Collection, variant: &str) -> Option<Match> {
    let files = collection.variant(variant)?;
    files
        .file_names()
        .find(|file| {
            let expected = collection.file_slug(variant, file);
            tracing::trace!(variant, file, %expected, "Comparing candidate slug");
            expected == channel_value
        })
        .map(|file| Match {
            variant: variant.to_string(),
            file: file.to_string(),
        })
}

/// Match `channel_value` against every variant except `active_variant`, in order.
pub fn resolve_elsewhere(
    channel_value: &str,
    collection: &Collection,
    active_variant: &str,
) -> Option<Match> {
    collection
        .variant_names()
        .filter(|name| *name != active_variant)
        .find_map(|name| resolve_in_variant(channel_value, collection, name))
}

/// Match `channel_value` against the whole collection, active variant first.
pub fn resolve(channel_value: &str, collection: &Collection, active_variant: &str) -> Option<Match> {
    if !belongs_to(channel_value, collection) {
        tracing::trace!(channel_value, "Channel value belongs to another collection");
        return None;
    }

    resolve_in_variant(channel_value, collection, active_variant)
        .or_else(|| resolve_elsewhere(channel_value, collection, active_variant))
}

/// Variant named by a variant-only slug (`collection:variant`) of this collection.
///
/// The default variant has no variant-only form other than the bare
/// collection slug, which never selects anything.
pub fn resolve_variant_only<'c>(channel_value: &str, collection: &'c Collection) -> Option<&'c str> {
    match decode_slug(channel_value, collection.variant_names()) {
        DecodedSlug::Variant {
            collection: slug,
            variant,
        } if slug == collection.slug() => collection
            .variant_names()
            .find(|name| *name == variant && collection.variant_slug(name) == channel_value),
        _ => None,
    }
}
