//! Shared test utilities for the demo-sync workspace.
//!
//! This crate provides standardised fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`collection`]: [`TestCollection`] builder and the canonical demo fixture
//! - [`switch`]: [`SwitchRecorder`] standing in for a host's variant switcher

pub mod collection;
pub mod switch;

pub use collection::{TestCollection, demo_collection};
pub use switch::SwitchRecorder;
