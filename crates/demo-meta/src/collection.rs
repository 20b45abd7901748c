//! Collections, variants and file identity
//!
//! A [`Collection`] is one code sample's demo family: an ordered mapping of
//! variant names to [`Variant`]s, one of which is the default. Each variant
//! has a main file and any number of extra files. File names are unique
//! within a variant and are the identity used for selection; contents are
//! only referenced through an opaque [`ContentSource`].

use std::collections::HashMap;
use std::fmt;

use demo_slug::{
    encode_collection_slug, encode_file_segment, encode_file_slug, encode_variant_slug,
    to_canonical_form,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where a file's content comes from. Opaque to the selection logic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentSource(String);

impl ContentSource {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentSource {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for ContentSource {
    fn from(source: String) -> Self {
        Self(source)
    }
}

/// One named alternative implementation of a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    main_file: String,
    main_source: ContentSource,
    extra_files: IndexMap<String, ContentSource>,
}

impl Variant {
    /// Create a variant with only a main file.
    pub fn new(main_file: impl Into<String>, source: impl Into<ContentSource>) -> Self {
        Self {
            main_file: main_file.into(),
            main_source: source.into(),
            extra_files: IndexMap::new(),
        }
    }

    /// Add an extra file. Uniqueness is checked when the collection is built.
    pub fn with_file(mut self, name: impl Into<String>, source: impl Into<ContentSource>) -> Self {
        self.extra_files.insert(name.into(), source.into());
        self
    }

    pub fn main_file(&self) -> &str {
        &self.main_file
    }

    pub fn extra_files(&self) -> &IndexMap<String, ContentSource> {
        &self.extra_files
    }

    /// All file names: main file first, then extra files in insertion order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.main_file.as_str()).chain(self.extra_files.keys().map(String::as_str))
    }

    pub fn contains_file(&self, name: &str) -> bool {
        self.main_file == name || self.extra_files.contains_key(name)
    }

    /// Content source for a file of this variant.
    pub fn source(&self, name: &str) -> Option<&ContentSource> {
        if self.main_file == name {
            Some(&self.main_source)
        } else {
            self.extra_files.get(name)
        }
    }

    pub fn file_count(&self) -> usize {
        1 + self.extra_files.len()
    }
}

/// A (variant, file) pair identifying a selectable unit.
///
/// The file name is always the original name, never a display rename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRef {
    pub variant: String,
    pub file: String,
}

impl FileRef {
    pub fn new(variant: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            file: file.into(),
        }
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.variant, self.file)
    }
}

/// An identified, ordered family of variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    id: String,
    title: Option<String>,
    variants: IndexMap<String, Variant>,
    default_variant: String,
}

impl Collection {
    /// Build a collection whose default variant is the first one inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no variants, a variant name is empty, a
    /// variant lists the same file twice (including an extra file shadowing
    /// the main file), or two names encode to the same slug segment. Slugs
    /// must identify exactly one file, otherwise the engine's own writes
    /// would resolve back to a different selection.
    pub fn new(id: impl Into<String>, variants: IndexMap<String, Variant>) -> Result<Self> {
        let default_variant = variants
            .keys()
            .next()
            .cloned()
            .ok_or(Error::NoVariants)?;

        for (name, variant) in &variants {
            if name.is_empty() {
                return Err(Error::EmptyVariantName);
            }
            if variant.extra_files.contains_key(&variant.main_file) {
                return Err(Error::DuplicateFile {
                    variant: name.clone(),
                    file: variant.main_file.clone(),
                });
            }
            check_unique_segments(name, variant.file_names(), encode_file_segment)?;
        }
        check_unique_segments("", variants.keys().map(String::as_str), to_canonical_form)?;

        Ok(Self {
            id: id.into(),
            title: None,
            variants,
            default_variant,
        })
    }

    /// Designate an explicit default variant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDefaultVariant`] if no variant has that name.
    pub fn with_default_variant(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !self.variants.contains_key(&name) {
            return Err(Error::UnknownDefaultVariant { variant: name });
        }
        self.default_variant = name;
        Ok(self)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human title, falling back to the id.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    pub fn default_variant(&self) -> &str {
        &self.default_variant
    }

    pub fn is_default_variant(&self, name: &str) -> bool {
        self.default_variant == name
    }

    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.get(name)
    }

    pub fn contains_variant(&self, name: &str) -> bool {
        self.variants.contains_key(name)
    }

    /// Variants in insertion order.
    pub fn variants(&self) -> impl Iterator<Item = (&str, &Variant)> {
        self.variants.iter().map(|(name, variant)| (name.as_str(), variant))
    }

    pub fn variant_names(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// The first variant in insertion order.
    pub fn first_variant(&self) -> &str {
        // Construction guarantees at least one variant
        self.variants
            .keys()
            .next()
            .map(String::as_str)
            .unwrap_or(&self.default_variant)
    }

    /// Canonical collection slug.
    pub fn slug(&self) -> String {
        encode_collection_slug(&self.id)
    }

    /// Slug selecting `file` in `variant`.
    pub fn file_slug(&self, variant: &str, file: &str) -> String {
        encode_file_slug(&self.id, file, variant, self.is_default_variant(variant))
    }

    /// Slug naming `variant` without a file.
    pub fn variant_slug(&self, variant: &str) -> String {
        encode_variant_slug(&self.id, variant, self.is_default_variant(variant))
    }

    /// Scope key under which a preferred variant is stored for this family.
    pub fn preference_scope(&self) -> String {
        self.variant_names().collect::<Vec<_>>().join(":")
    }
}

/// Fail on the first pair of `names` sharing an encoded segment.
///
/// `variant` is empty when the names are variant names themselves.
fn check_unique_segments<'a>(
    variant: &str,
    names: impl Iterator<Item = &'a str>,
    encode: fn(&str) -> String,
) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for name in names {
        let segment = encode(name);
        if let Some(first) = seen.insert(segment.clone(), name) {
            return Err(Error::DuplicateSlug {
                variant: variant.to_string(),
                slug: segment,
                first: first.to_string(),
                second: name.to_string(),
            });
        }
    }
    Ok(())
}
