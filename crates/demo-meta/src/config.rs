//! Viewer configuration manifest
//!
//! A viewer is described by a single TOML document:
//!
//! ```toml
//! [viewer]
//! retention = "remove-after-interaction"
//! initial-variant = "Default"
//!
//! [collection]
//! id = "Basic"
//! title = "Basic demo"
//!
//! [variants.Default]
//! main = { name = "component.tsx", source = "./component.tsx" }
//! files = { "styles.css" = "./styles.css" }
//!
//! [transform]
//! "component.tsx" = "Component.js"
//! ```
//!
//! Table order is preserved, so the first `[variants.*]` table is the
//! default variant unless `collection.default-variant` says otherwise.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::collection::{Collection, ContentSource, Variant};
use crate::error::{Error, Result};
use crate::mode::RetentionMode;

/// `[viewer]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ViewerSection {
    /// How much of the selection the channel retains
    #[serde(default)]
    pub retention: RetentionMode,

    /// Variant to start on when neither the channel nor a stored preference decide
    #[serde(default)]
    pub initial_variant: Option<String>,

    /// Scope key for the stored variant preference
    #[serde(default)]
    pub preference_scope: Option<String>,
}

/// `[collection]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CollectionSection {
    pub id: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub default_variant: Option<String>,
}

/// `main = { name, source }` of a variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainFileSection {
    pub name: String,

    /// Defaults to the file name
    #[serde(default)]
    pub source: Option<ContentSource>,
}

/// `[variants.<name>]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSection {
    pub main: MainFileSection,

    /// Extra files in display order, name -> content source
    #[serde(default)]
    pub files: IndexMap<String, ContentSource>,
}

impl VariantSection {
    fn to_variant(&self) -> Variant {
        let source = self
            .main
            .source
            .clone()
            .unwrap_or_else(|| ContentSource::new(self.main.name.as_str()));

        self.files
            .iter()
            .fold(Variant::new(self.main.name.as_str(), source), |variant, (name, source)| {
                variant.with_file(name.as_str(), source.clone())
            })
    }
}

/// Parsed viewer manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub viewer: ViewerSection,

    pub collection: CollectionSection,

    #[serde(default)]
    pub variants: IndexMap<String, VariantSection>,

    /// Display renames, original file name -> display file name
    #[serde(default)]
    pub transform: IndexMap<String, String>,
}

impl ViewerConfig {
    /// Parse a manifest from TOML content
    ///
    /// # Errors
    ///
    /// Returns [`Error::TomlDe`] if the content is not a valid manifest.
    ///
    /// # Example
    ///
    /// ```
    /// use demo_meta::{RetentionMode, ViewerConfig};
    ///
    /// let config = ViewerConfig::parse(r#"
    /// [viewer]
    /// retention = "demo"
    ///
    /// [collection]
    /// id = "Basic"
    ///
    /// [variants.Default]
    /// main = { name = "index.ts" }
    /// "#).unwrap();
    ///
    /// assert_eq!(config.viewer.retention, RetentionMode::Demo);
    /// assert_eq!(config.collection().unwrap().default_variant(), "Default");
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let config: ViewerConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load and parse a manifest file
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] if the file does not exist, or
    /// [`Error::InvalidConfig`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!(?path, "Loading viewer config");
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| Error::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Build the validated collection described by this manifest
    ///
    /// # Errors
    ///
    /// Returns an error if the collection violates its invariants
    /// (no variants, duplicate file names, unknown default variant).
    pub fn collection(&self) -> Result<Collection> {
        let variants: IndexMap<String, Variant> = self
            .variants
            .iter()
            .map(|(name, section)| (name.clone(), section.to_variant()))
            .collect();

        let mut collection = Collection::new(self.collection.id.as_str(), variants)?;
        if let Some(title) = &self.collection.title {
            collection = collection.with_title(title.as_str());
        }
        if let Some(default_variant) = &self.collection.default_variant {
            collection = collection.with_default_variant(default_variant.as_str())?;
        }
        Ok(collection)
    }
}
