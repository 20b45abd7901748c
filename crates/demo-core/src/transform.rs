//! Display transforms
//!
//! A downstream transform may rename files for display (for example a
//! TypeScript sample shown as JavaScript). Selection identity always uses the
//! original name; the transform only maps names in both directions and
//! optionally supplies the content source to render for a display name.

use std::collections::HashMap;

use demo_meta::ContentSource;
use indexmap::IndexMap;

use crate::{Error, Result};

/// Name mapping between original and displayed file names.
pub trait DisplayTransform {
    /// Display name for an original file name, `None` when not renamed.
    fn display_name(&self, original: &str) -> Option<&str>;

    /// Original name for a display name, `None` when not a renamed file.
    fn original_name(&self, display: &str) -> Option<&str>;

    /// Content to render for a display name, `None` to use the original source.
    fn display_source(&self, _display: &str) -> Option<&ContentSource> {
        None
    }
}

/// Bijective rename table.
#[derive(Debug, Clone, Default)]
pub struct RenameTransform {
    renames: IndexMap<String, String>,
    reverse: HashMap<String, String>,
    sources: HashMap<String, ContentSource>,
}

impl RenameTransform {
    /// Build from an original -> display mapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateDisplayName`] if two originals share a display name.
    pub fn new<I, K, V>(renames: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut transform = Self::default();
        for (original, display) in renames {
            let (original, display) = (original.into(), display.into());
            if transform.reverse.contains_key(&display) {
                return Err(Error::DuplicateDisplayName { display });
            }
            transform.reverse.insert(display.clone(), original.clone());
            transform.renames.insert(original, display);
        }
        Ok(transform)
    }

    /// Render `source` when `display` is shown.
    pub fn with_source(mut self, display: impl Into<String>, source: impl Into<ContentSource>) -> Self {
        self.sources.insert(display.into(), source.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.renames.len()
    }
}

impl DisplayTransform for RenameTransform {
    fn display_name(&self, original: &str) -> Option<&str> {
        self.renames.get(original).map(String::as_str)
    }

    fn original_name(&self, display: &str) -> Option<&str> {
        self.reverse.get(display).map(String::as_str)
    }

    fn display_source(&self, display: &str) -> Option<&ContentSource> {
        self.sources.get(display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_both_directions() {
        let transform = RenameTransform::new([("component.tsx", "component.js")]).unwrap();
        assert_eq!(transform.display_name("component.tsx"), Some("component.js"));
        assert_eq!(transform.original_name("component.js"), Some("component.tsx"));
        assert_eq!(transform.display_name("styles.css"), None);
        assert_eq!(transform.original_name("component.tsx"), None);
    }

    #[test]
    fn test_duplicate_display_name_rejected() {
        let result = RenameTransform::new([("a.tsx", "a.js"), ("a.ts", "a.js")]);
        assert!(matches!(result, Err(Error::DuplicateDisplayName { .. })));
    }

    #[test]
    fn test_display_source() {
        let transform = RenameTransform::new([("a.tsx", "a.js")])
            .unwrap()
            .with_source("a.js", "./compiled/a.js");
        assert_eq!(
            transform.display_source("a.js").map(ContentSource::as_str),
            Some("./compiled/a.js")
        );
        assert_eq!(transform.display_source("b.js"), None);
    }
}
