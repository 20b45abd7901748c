//! SyncEngine implementation
//!
//! The SyncEngine keeps one viewer's (variant, file) selection consistent
//! with the shared channel. It reacts to three kinds of triggers:
//!
//! - **Channel changes**: the subscription marks a pending notification; the
//!   host runs the cycle with [`SyncEngine::poll`].
//! - **Host re-invocation**: [`SyncEngine::activate_variant`] reports which
//!   variant is now active, completing a pending cross-variant match.
//! - **User selection**: [`SyncEngine::select_file`] and
//!   [`SyncEngine::select_variant`].
//!
//! Every trigger runs to completion and issues at most one channel write,
//! strictly after the selection was updated. The engine observes its own
//! writes like any other change; they resolve to the selection already
//! shown, so the policy has nothing left to write and no loop forms.
//!
//! Only one engine should write to a channel at a time. Several engines
//! sharing one channel end up with last-writer-wins behaviour.

mod options;
mod state;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use demo_meta::{Collection, ContentSource, FileRef, RetentionMode};

use crate::channel::{Channel, Subscription};
use crate::policy::{ChannelWrite, PolicyContext, PolicyEvent, RetentionPolicy};
use crate::preference::PreferenceStore;
use crate::resolver::{self, Match};
use crate::transform::DisplayTransform;

pub use options::{EngineOptions, VariantSwitchRequester};
pub use state::{ChangeOrigin, Phase, SelectionSnapshot, SelectionState};

/// Engine synchronizing a viewer selection with the channel
pub struct SyncEngine {
    /// Variants and files being navigated
    collection: Collection,
    /// Shared channel, never owned
    channel: Rc<dyn Channel>,
    /// Write-back decisions
    policy: RetentionPolicy,
    preferences: Option<Rc<dyn PreferenceStore>>,
    preference_scope: String,
    transform: Option<Box<dyn DisplayTransform>>,
    switch_requester: Option<VariantSwitchRequester>,
    selection: SelectionState,
    phase: Phase,
    /// Whether the user has acted at least once since mount
    has_interacted: bool,
    /// Bumped by the channel subscription
    notifications: Rc<Cell<u64>>,
    /// Last notification count a cycle ran for
    seen_notifications: u64,
    subscription: Option<Subscription>,
}

impl SyncEngine {
    /// Mount an engine on `channel`.
    ///
    /// The initial selection is decided by precedence:
    /// 1. The channel value matches a file of the collection (origin `channel`)
    /// 2. The stored preference names a known variant, its main file
    /// 3. The `initial_variant` option names a known variant, its main file
    /// 4. The first variant's main file
    ///
    /// When the channel decided, the policy runs once for the resolved value.
    /// Otherwise nothing is written.
    pub fn mount(collection: Collection, channel: Rc<dyn Channel>, options: EngineOptions) -> Self {
        let EngineOptions {
            retention,
            initial_variant,
            preference_scope,
            preferences,
            transform,
            switch_requester,
        } = options;

        let preference_scope = preference_scope.unwrap_or_else(|| collection.preference_scope());
        let stored = preferences
            .as_ref()
            .and_then(|store| store.get(&preference_scope));
        let current = channel.get();

        let selection = initial_selection(
            &collection,
            current.as_deref(),
            stored.as_deref(),
            initial_variant.as_deref(),
        );
        tracing::debug!(
            collection = collection.id(),
            variant = %selection.variant,
            file = %selection.file,
            origin = %selection.origin,
            "Mounting sync engine"
        );

        let mut engine = Self {
            collection,
            channel,
            policy: RetentionPolicy::new(retention),
            preferences,
            preference_scope,
            transform,
            switch_requester,
            selection,
            phase: Phase::Idle,
            has_interacted: false,
            notifications: Rc::new(Cell::new(0)),
            seen_notifications: 0,
            subscription: None,
        };

        engine.subscribe();
        engine.phase = Phase::Settled;

        if engine.selection.origin == ChangeOrigin::Channel {
            engine.run_policy(PolicyEvent::HashResolvedSameVariant);
        }
        engine
    }

    fn subscribe(&mut self) {
        let notifications = Rc::clone(&self.notifications);
        self.subscription = Some(self.channel.subscribe(Box::new(move || {
            notifications.set(notifications.get() + 1);
        })));
    }

    /// Drop the channel subscription and go idle.
    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.phase = Phase::Idle;
        tracing::debug!(collection = self.collection.id(), "Unmounted sync engine");
    }

    // =========================================================================
    // Triggers
    // =========================================================================

    /// Run one reactive cycle if the channel changed since the last one.
    ///
    /// Returns whether a cycle ran.
    pub fn poll(&mut self) -> bool {
        if self.phase.is_idle() {
            return false;
        }
        let pending = self.notifications.get();
        if pending == self.seen_notifications {
            return false;
        }
        self.seen_notifications = pending;
        self.handle_channel_change();
        true
    }

    /// Resolve the current channel value against the collection.
    ///
    /// - Match in the active variant: apply the file, run the policy.
    /// - Match in another variant: ask the host to switch and wait; the file
    ///   is applied by [`SyncEngine::activate_variant`].
    /// - No match: nothing changes.
    pub fn handle_channel_change(&mut self) {
        if self.phase.is_idle() {
            return;
        }

        let Some(value) = self.channel.get() else {
            tracing::debug!("Channel empty, keeping selection");
            return;
        };

        let active = self.selection.variant.clone();
        match resolver::resolve(&value, &self.collection, &active) {
            Some(found) if found.is_in(&active) => {
                tracing::debug!(%value, file = %found.file, "Channel resolved in active variant");
                self.phase = Phase::Settled;
                self.apply_file(found.file, ChangeOrigin::Channel);
                self.run_policy(PolicyEvent::HashResolvedSameVariant);
            }
            Some(found) => self.request_variant_switch(found),
            None => {
                tracing::debug!(%value, "Channel value matches nothing, keeping selection");
            }
        }
    }

    fn request_variant_switch(&mut self, found: Match) {
        if self.phase.pending() == Some(&FileRef::new(found.variant.as_str(), found.file.as_str())) {
            tracing::trace!(variant = %found.variant, "Variant switch already requested");
            return;
        }

        let Some(requester) = self.switch_requester.as_mut() else {
            tracing::debug!(
                variant = %found.variant,
                "Cross-variant match ignored without a switch requester"
            );
            return;
        };

        tracing::debug!(variant = %found.variant, file = %found.file, "Requesting variant switch");
        requester(&found.variant);
        self.phase = Phase::AwaitingVariantSwitch {
            pending: found.into_file_ref(),
        };
    }

    /// Host re-invocation: `name` is now the active variant.
    ///
    /// Completes a pending cross-variant match for `name`. Any other variant
    /// change drops a stale pending match and adopts the variant, keeping the
    /// selected file when it exists there.
    pub fn activate_variant(&mut self, name: &str) {
        if self.phase.is_idle() {
            return;
        }
        let Some(variant) = self.collection.variant(name) else {
            tracing::warn!(variant = name, "Host activated unknown variant, ignoring");
            return;
        };

        let phase = std::mem::replace(&mut self.phase, Phase::Settled);
        if let Phase::AwaitingVariantSwitch { pending } = phase {
            if pending.variant == name {
                tracing::debug!(%pending, "Completing cross-variant selection");
                self.selection = SelectionState::new(pending.variant, pending.file, ChangeOrigin::Channel);
                self.run_policy(PolicyEvent::HashResolvedCrossVariantCompleted);
                return;
            }
            tracing::debug!(%pending, activated = name, "Dropping stale variant switch");
        }

        if self.selection.variant == name {
            return;
        }

        let file = if variant.contains_file(&self.selection.file) {
            self.selection.file.clone()
        } else {
            variant.main_file().to_string()
        };
        self.selection = SelectionState::new(name, file, ChangeOrigin::Init);
        self.run_policy(PolicyEvent::HostSelectedVariant);
    }

    /// User selects a file by original or display name.
    ///
    /// Unknown names are ignored.
    pub fn select_file(&mut self, name: &str) {
        if self.phase.is_idle() {
            return;
        }

        let original = self.original_file_name(name).to_string();
        let in_variant = self
            .collection
            .variant(&self.selection.variant)
            .is_some_and(|variant| variant.contains_file(&original));
        if !in_variant {
            tracing::warn!(
                file = name,
                variant = %self.selection.variant,
                "Selected file is not part of the active variant, ignoring"
            );
            return;
        }

        self.phase = Phase::Settled;
        self.has_interacted = true;
        self.apply_file(original, ChangeOrigin::User);
        self.run_policy(PolicyEvent::UserSelectedFile);
    }

    /// User selects a variant.
    ///
    /// The selected file is kept when the new variant has a file with the
    /// same name, otherwise the new variant's main file is selected.
    pub fn select_variant(&mut self, name: &str) {
        if self.phase.is_idle() {
            return;
        }
        let Some(variant) = self.collection.variant(name) else {
            tracing::warn!(variant = name, "Selected unknown variant, ignoring");
            return;
        };

        let file = if variant.contains_file(&self.selection.file) {
            self.selection.file.clone()
        } else {
            variant.main_file().to_string()
        };

        self.phase = Phase::Settled;
        self.has_interacted = true;

        if self.selection.variant != name {
            self.selection = SelectionState::new(name, file, ChangeOrigin::User);
            if let Some(store) = &self.preferences {
                store.set(&self.preference_scope, name);
            }
        }
        self.run_policy(PolicyEvent::UserSelectedVariant);
    }

    /// User selects a variant computed from the current one.
    pub fn update_variant(&mut self, update: impl FnOnce(&str) -> String) {
        let next = update(&self.selection.variant);
        self.select_variant(&next);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn apply_file(&mut self, file: String, origin: ChangeOrigin) {
        if self.selection.file != file {
            self.selection.file = file;
            self.selection.origin = origin;
        } else if origin == ChangeOrigin::User {
            self.selection.origin = origin;
        }
    }

    fn run_policy(&self, event: PolicyEvent) {
        let current = self.channel.get();
        let ctx = PolicyContext {
            collection: &self.collection,
            variant: &self.selection.variant,
            file: &self.selection.file,
            current: current.as_deref(),
            has_interacted: self.has_interacted,
        };

        match self.policy.decide(event, &ctx) {
            ChannelWrite::Keep => {}
            ChannelWrite::Set(value) => {
                tracing::debug!(%value, %event, "Writing channel");
                self.channel.set(Some(&value));
            }
            ChannelWrite::Clear => {
                tracing::debug!(%event, "Clearing channel");
                self.channel.set(None);
            }
        }
    }

    fn original_file_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.transform
            .as_ref()
            .and_then(|transform| transform.original_name(name))
            .unwrap_or(name)
    }

    // =========================================================================
    // Observable outputs
    // =========================================================================

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn retention(&self) -> RetentionMode {
        self.policy.mode()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selected_variant(&self) -> &str {
        &self.selection.variant
    }

    /// Original name of the selected file
    pub fn selected_file(&self) -> &str {
        &self.selection.file
    }

    /// Name the selected file is shown under
    pub fn display_file_name(&self) -> &str {
        self.transform
            .as_ref()
            .and_then(|transform| transform.display_name(&self.selection.file))
            .unwrap_or(&self.selection.file)
    }

    /// Content to render for the selected file
    pub fn display_source(&self) -> Option<&ContentSource> {
        let display = self.display_file_name();
        self.transform
            .as_ref()
            .and_then(|transform| transform.display_source(display))
            .or_else(|| {
                self.collection
                    .variant(&self.selection.variant)
                    .and_then(|variant| variant.source(&self.selection.file))
            })
    }

    pub fn channel_value(&self) -> Option<String> {
        self.channel.get()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn last_change_origin(&self) -> ChangeOrigin {
        self.selection.origin
    }

    /// File waiting for its variant to become active
    pub fn pending_variant_file(&self) -> Option<&FileRef> {
        self.phase.pending()
    }

    pub fn is_awaiting_variant_switch(&self) -> bool {
        self.phase.pending().is_some()
    }

    pub fn has_interacted(&self) -> bool {
        self.has_interacted
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            variant: self.selection.variant.clone(),
            file: self.selection.file.clone(),
            display_file: self.display_file_name().to_string(),
            origin: self.selection.origin,
            phase: self.phase.clone(),
            channel: self.channel_value(),
        }
    }
}

impl fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("collection", &self.collection.id())
            .field("retention", &self.policy.mode())
            .field("selection", &self.selection)
            .field("phase", &self.phase)
            .field("has_interacted", &self.has_interacted)
            .finish_non_exhaustive()
    }
}

/// Decide the selection an engine mounts with.
pub fn initial_selection(
    collection: &Collection,
    channel_value: Option<&str>,
    stored_variant: Option<&str>,
    initial_variant: Option<&str>,
) -> SelectionState {
    let fallback = stored_variant
        .filter(|name| collection.contains_variant(name))
        .or_else(|| initial_variant.filter(|name| collection.contains_variant(name)))
        .unwrap_or_else(|| collection.first_variant());

    if let Some(value) = channel_value {
        if let Some(found) = resolver::resolve(value, collection, fallback) {
            return SelectionState::new(found.variant, found.file, ChangeOrigin::Channel);
        }
        if let Some(variant) = resolver::resolve_variant_only(value, collection)
            && let Some(files) = collection.variant(variant)
        {
            return SelectionState::new(variant, files.main_file(), ChangeOrigin::Channel);
        }
    }

    let main_file = collection
        .variant(fallback)
        .map(|variant| variant.main_file().to_string())
        .unwrap_or_default();
    SelectionState::new(fallback, main_file, ChangeOrigin::Init)
}
