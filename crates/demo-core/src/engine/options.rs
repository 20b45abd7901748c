//! Options for mounting a [`SyncEngine`](super::SyncEngine)

use std::fmt;
use std::rc::Rc;

use demo_meta::{RetentionMode, ViewerConfig};

use crate::Result;
use crate::preference::PreferenceStore;
use crate::transform::{DisplayTransform, RenameTransform};

/// Callback asking the host to make a variant active.
///
/// The host answers asynchronously by calling
/// [`SyncEngine::activate_variant`](super::SyncEngine::activate_variant) on a
/// later cycle.
pub type VariantSwitchRequester = Box<dyn FnMut(&str)>;

/// Collaborators and settings for an engine.
#[derive(Default)]
pub struct EngineOptions {
    /// How much of the selection the channel retains
    pub retention: RetentionMode,

    /// Variant to start on when neither the channel nor a stored preference decide
    pub initial_variant: Option<String>,

    /// Scope key for the stored preference; defaults to the collection's
    /// variant names joined with `:`
    pub preference_scope: Option<String>,

    /// Stored variant preference
    pub preferences: Option<Rc<dyn PreferenceStore>>,

    /// Display renames
    pub transform: Option<Box<dyn DisplayTransform>>,

    /// Without a requester, cross-variant matches are treated as unmatched
    pub switch_requester: Option<VariantSwitchRequester>,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options described by a viewer manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest's transform maps two files to the
    /// same display name.
    pub fn from_config(config: &ViewerConfig) -> Result<Self> {
        let mut options = Self::new().with_retention(config.viewer.retention);
        options.initial_variant = config.viewer.initial_variant.clone();
        options.preference_scope = config.viewer.preference_scope.clone();

        if !config.transform.is_empty() {
            let transform = RenameTransform::new(
                config
                    .transform
                    .iter()
                    .map(|(original, display)| (original.as_str(), display.as_str())),
            )?;
            options.transform = Some(Box::new(transform));
        }
        Ok(options)
    }

    pub fn with_retention(mut self, retention: RetentionMode) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_initial_variant(mut self, variant: impl Into<String>) -> Self {
        self.initial_variant = Some(variant.into());
        self
    }

    pub fn with_preference_scope(mut self, scope: impl Into<String>) -> Self {
        self.preference_scope = Some(scope.into());
        self
    }

    pub fn with_preferences(mut self, preferences: Rc<dyn PreferenceStore>) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn with_transform(mut self, transform: impl DisplayTransform + 'static) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    pub fn on_variant_switch(mut self, requester: impl FnMut(&str) + 'static) -> Self {
        self.switch_requester = Some(Box::new(requester));
        self
    }
}

impl fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOptions")
            .field("retention", &self.retention)
            .field("initial_variant", &self.initial_variant)
            .field("preference_scope", &self.preference_scope)
            .field("preferences", &self.preferences.is_some())
            .field("transform", &self.transform.is_some())
            .field("switch_requester", &self.switch_requester.is_some())
            .finish()
    }
}
