//! Selection synchronization core for demo-sync
//!
//! This crate keeps a viewer's (variant, file) selection consistent with a
//! single shared channel value, implementing:
//!
//! - **Resolver**: exact matching of a channel value against every file slug
//!   of a collection, active variant first
//! - **RetentionPolicy**: what to write back after each transition, per
//!   [`RetentionMode`](demo_meta::RetentionMode)
//! - **SyncEngine**: the stateful core; mount precedence, two-phase
//!   cross-variant resolution and user selection
//! - **Collaborators**: the [`Channel`], [`PreferenceStore`] and
//!   [`DisplayTransform`] seams with in-memory implementations
//!
//! # Architecture
//!
//! ```text
//!                   demo-cli
//!                       |
//!                   demo-core
//!                       |
//!              +--------+--------+
//!              |                 |
//!          demo-meta  -->   demo-slug
//! ```
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use demo_core::{EngineOptions, MemoryChannel, SyncEngine};
//! use demo_meta::{Collection, RetentionMode, Variant};
//! use indexmap::IndexMap;
//!
//! let mut variants = IndexMap::new();
//! variants.insert(
//!     "Default".to_string(),
//!     Variant::new("component.tsx", "./component.tsx").with_file("styles.css", "./styles.css"),
//! );
//! let collection = Collection::new("Demo", variants).unwrap();
//!
//! let channel = MemoryChannel::new(Some("demo:styles.css"));
//! let options = EngineOptions::new().with_retention(RetentionMode::Full);
//! let engine = SyncEngine::mount(collection, Rc::new(channel.clone()), options);
//!
//! assert_eq!(engine.selected_file(), "styles.css");
//! assert_eq!(channel.write_count(), 0);
//! ```

pub mod channel;
pub mod engine;
pub mod error;
pub mod policy;
pub mod preference;
pub mod resolver;
pub mod transform;

pub use channel::{Channel, Listener, MemoryChannel, Subscription};
pub use engine::{
    ChangeOrigin, EngineOptions, Phase, SelectionSnapshot, SelectionState, SyncEngine,
    VariantSwitchRequester, initial_selection,
};
pub use error::{Error, Result};
pub use policy::{ChannelWrite, PolicyContext, PolicyEvent, RetentionPolicy};
pub use preference::{FilePreferences, MemoryPreferences, PreferenceStore};
pub use resolver::{Match, resolve, resolve_elsewhere, resolve_in_variant, resolve_variant_only};
pub use transform::{DisplayTransform, RenameTransform};
