//! Encoding and decoding of selection slugs

use crate::canonical::to_canonical_form;

/// Delimiter between the collection, variant and file segments.
pub const SEGMENT_DELIMITER: char = ':';

/// Result of decoding a slug against a set of known variant names.
///
/// Segments are carried as they appear in the slug. The only exception is
/// [`DecodedSlug::Variant`], which carries the known variant name the segment
/// was matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedSlug {
    /// `collection`, or a two-segment slug whose second segment is ambiguous.
    CollectionOnly { collection: String },

    /// `collection:variant` where `variant` names a known variant.
    Variant { collection: String, variant: String },

    /// `collection:file` where the file belongs to the default variant.
    DefaultVariantFile { collection: String, file: String },

    /// `collection:variant:file`
    VariantFile {
        collection: String,
        variant: String,
        file: String,
    },

    /// Anything with more than three segments.
    Unparseable,
}

impl DecodedSlug {
    /// The collection segment, if the slug could be parsed.
    pub fn collection(&self) -> Option<&str> {
        match self {
            DecodedSlug::CollectionOnly { collection }
            | DecodedSlug::Variant { collection, .. }
            | DecodedSlug::DefaultVariantFile { collection, .. }
            | DecodedSlug::VariantFile { collection, .. } => Some(collection),
            DecodedSlug::Unparseable => None,
        }
    }

    /// The variant segment, if present.
    pub fn variant(&self) -> Option<&str> {
        match self {
            DecodedSlug::Variant { variant, .. } | DecodedSlug::VariantFile { variant, .. } => {
                Some(variant)
            }
            _ => None,
        }
    }

    /// The file segment, if present.
    pub fn file(&self) -> Option<&str> {
        match self {
            DecodedSlug::DefaultVariantFile { file, .. } | DecodedSlug::VariantFile { file, .. } => {
                Some(file)
            }
            _ => None,
        }
    }
}

/// Split a file name at its last `.` into base and extension.
///
/// The extension keeps its leading dot. Without a dot the extension is empty.
/// `MyComponent.test.tsx` -> (`MyComponent.test`, `.tsx`)
pub fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(index) => file_name.split_at(index),
        None => (file_name, ""),
    }
}

/// Encode the file segment: canonical base plus the verbatim extension.
pub fn encode_file_segment(file_name: &str) -> String {
    let (base, extension) = split_extension(file_name);
    let mut segment = to_canonical_form(base);
    segment.push_str(extension);
    segment
}

/// Encode the slug selecting `file_name` in `variant_name`.
///
/// - Empty canonical collection id: just the file segment.
/// - Default variant: `collection:file`.
/// - Otherwise: `collection:variant:file`.
pub fn encode_file_slug(
    collection_id: &str,
    file_name: &str,
    variant_name: &str,
    is_default_variant: bool,
) -> String {
    let collection = to_canonical_form(collection_id);
    let file_segment = encode_file_segment(file_name);

    if collection.is_empty() {
        return file_segment;
    }

    if is_default_variant {
        format!("{collection}{SEGMENT_DELIMITER}{file_segment}")
    } else {
        let variant = to_canonical_form(variant_name);
        format!("{collection}{SEGMENT_DELIMITER}{variant}{SEGMENT_DELIMITER}{file_segment}")
    }
}

/// Encode the bare collection slug. May be empty.
pub fn encode_collection_slug(collection_id: &str) -> String {
    to_canonical_form(collection_id)
}

/// Encode a slug naming a variant but no file.
///
/// The default variant collapses to the collection slug. With an empty
/// collection id there is nothing to anchor the variant to, so the result is
/// empty.
pub fn encode_variant_slug(collection_id: &str, variant_name: &str, is_default_variant: bool) -> String {
    let collection = to_canonical_form(collection_id);
    if collection.is_empty() || is_default_variant {
        return collection;
    }
    let variant = to_canonical_form(variant_name);
    format!("{collection}{SEGMENT_DELIMITER}{variant}")
}

/// Number of colon-delimited segments in a slug.
pub fn segment_count(slug: &str) -> usize {
    slug.split(SEGMENT_DELIMITER).count()
}

/// Decode a slug against the known variant names of a collection.
///
/// - 1 segment: collection only.
/// - 2 segments: a known variant (compared canonically), else a default
///   variant file when the segment contains a `.`, else collection only.
/// - 3 segments: variant and file.
/// - Anything else: unparseable.
pub fn decode_slug<'a, I>(slug: &str, known_variant_names: I) -> DecodedSlug
where
    I: IntoIterator<Item = &'a str>,
{
    let parts: Vec<&str> = slug.split(SEGMENT_DELIMITER).collect();

    match parts.as_slice() {
        [collection] => DecodedSlug::CollectionOnly {
            collection: (*collection).to_string(),
        },
        [collection, second] => {
            let canonical = to_canonical_form(second);
            let known = known_variant_names
                .into_iter()
                .find(|name| to_canonical_form(name) == canonical);

            if let Some(variant) = known {
                DecodedSlug::Variant {
                    collection: (*collection).to_string(),
                    variant: variant.to_string(),
                }
            } else if second.contains('.') {
                DecodedSlug::DefaultVariantFile {
                    collection: (*collection).to_string(),
                    file: (*second).to_string(),
                }
            } else {
                // Ambiguous: neither a variant nor a file
                DecodedSlug::CollectionOnly {
                    collection: (*collection).to_string(),
                }
            }
        }
        [collection, variant, file] => DecodedSlug::VariantFile {
            collection: (*collection).to_string(),
            variant: (*variant).to_string(),
            file: (*file).to_string(),
        },
        _ => DecodedSlug::Unparseable,
    }
}
