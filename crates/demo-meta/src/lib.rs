//! Collection model and viewer configuration for demo-sync.
//!
//! This crate provides the data model the synchronization engine navigates:
//!
//! - [`Collection`]: an ordered family of [`Variant`]s with one default variant
//! - [`Variant`]: a main file plus extra files, each with a [`ContentSource`]
//! - [`RetentionMode`]: how much of a selection is written back to the channel
//! - [`ViewerConfig`]: the TOML manifest describing a collection and its viewer

pub mod collection;
pub mod config;
pub mod error;
pub mod mode;

pub use collection::{Collection, ContentSource, FileRef, Variant};
pub use config::{CollectionSection, MainFileSection, VariantSection, ViewerConfig, ViewerSection};
pub use error::{Error, Result};
pub use mode::RetentionMode;
