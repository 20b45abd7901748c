//! Retention policy
//!
//! After every transition the engine asks the policy what, if anything, to
//! write back to the channel. The decision keys off two values only: the
//! configured [`RetentionMode`] and the [`PolicyEvent`] that just happened.
//!
//! Two rules hold for every mode:
//!
//! - A value identical to the current channel value is never written.
//! - A non-user event never creates a channel value where none existed.

use std::fmt;

use demo_meta::{Collection, RetentionMode};
use demo_slug::segment_count;

use crate::resolver::belongs_to;

/// The transition the policy is consulted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyEvent {
    /// A channel change matched a file of the active variant.
    HashResolvedSameVariant,
    /// A cross-variant match was applied once its variant became active.
    HashResolvedCrossVariantCompleted,
    /// The user selected a file.
    UserSelectedFile,
    /// The user selected a variant.
    UserSelectedVariant,
    /// The host switched the variant without a pending channel match.
    HostSelectedVariant,
}

impl PolicyEvent {
    pub fn is_user(&self) -> bool {
        matches!(
            self,
            PolicyEvent::UserSelectedFile | PolicyEvent::UserSelectedVariant
        )
    }

    pub fn is_hash_resolved(&self) -> bool {
        matches!(
            self,
            PolicyEvent::HashResolvedSameVariant | PolicyEvent::HashResolvedCrossVariantCompleted
        )
    }
}

impl fmt::Display for PolicyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyEvent::HashResolvedSameVariant => write!(f, "hash-resolved-same-variant"),
            PolicyEvent::HashResolvedCrossVariantCompleted => {
                write!(f, "hash-resolved-cross-variant-completed")
            }
            PolicyEvent::UserSelectedFile => write!(f, "user-selected-file"),
            PolicyEvent::UserSelectedVariant => write!(f, "user-selected-variant"),
            PolicyEvent::HostSelectedVariant => write!(f, "host-selected-variant"),
        }
    }
}

/// What to do with the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelWrite {
    /// Leave the channel as it is.
    Keep,
    /// Replace the value.
    Set(String),
    /// Clear the channel.
    Clear,
}

impl ChannelWrite {
    /// A non-empty slug is written, an empty one clears.
    fn slug(slug: String) -> Self {
        if slug.is_empty() {
            ChannelWrite::Clear
        } else {
            ChannelWrite::Set(slug)
        }
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, ChannelWrite::Keep)
    }
}

/// State the policy decides on.
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a> {
    pub collection: &'a Collection,
    /// Selected variant after the transition
    pub variant: &'a str,
    /// Selected original file name after the transition
    pub file: &'a str,
    /// Channel value before the write
    pub current: Option<&'a str>,
    /// Whether the user has acted at least once this session.
    ///
    /// [`SyncEngine`](crate::SyncEngine) records a user action before running
    /// the policy for it, so engine-driven user events always see `true` here
    /// and `full` mode writes on the first action even into an empty channel.
    /// Only direct callers can ask about a user event without interaction.
    pub has_interacted: bool,
}

impl PolicyContext<'_> {
    /// Whether the channel already holds a value of this collection.
    pub fn has_relevant_value(&self) -> bool {
        self.current
            .is_some_and(|value| belongs_to(value, self.collection))
    }

    fn full_slug(&self) -> String {
        self.collection.file_slug(self.variant, self.file)
    }

    fn variant_slug(&self) -> String {
        self.collection.variant_slug(self.variant)
    }

    fn collection_slug(&self) -> String {
        self.collection.slug()
    }
}

/// Decides channel write-back for a [`RetentionMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetentionPolicy {
    mode: RetentionMode,
}

impl RetentionPolicy {
    pub fn new(mode: RetentionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> RetentionMode {
        self.mode
    }

    /// Decide the write for `event`. Never proposes the current value.
    pub fn decide(&self, event: PolicyEvent, ctx: &PolicyContext<'_>) -> ChannelWrite {
        let proposal = self.propose(event, ctx);
        let decision = match proposal {
            ChannelWrite::Set(value) if ctx.current == Some(value.as_str()) => ChannelWrite::Keep,
            ChannelWrite::Clear if ctx.current.is_none() => ChannelWrite::Keep,
            other => other,
        };

        tracing::debug!(
            mode = %self.mode,
            %event,
            current = ?ctx.current,
            ?decision,
            "Retention decision"
        );
        decision
    }

    fn propose(&self, event: PolicyEvent, ctx: &PolicyContext<'_>) -> ChannelWrite {
        let relevant = ctx.has_relevant_value();

        match self.mode {
            RetentionMode::Full => {
                if event.is_hash_resolved() {
                    // Only normalize an existing value whose shape is off
                    let full = ctx.full_slug();
                    match ctx.current {
                        Some(current)
                            if relevant && segment_count(current) != segment_count(&full) =>
                        {
                            ChannelWrite::slug(full)
                        }
                        _ => ChannelWrite::Keep,
                    }
                } else if relevant || (event.is_user() && ctx.has_interacted) {
                    ChannelWrite::slug(ctx.full_slug())
                } else {
                    ChannelWrite::Keep
                }
            }

            RetentionMode::Demo => {
                if relevant {
                    ChannelWrite::slug(ctx.collection_slug())
                } else {
                    ChannelWrite::Keep
                }
            }

            RetentionMode::Remove => {
                if !event.is_hash_resolved() && relevant {
                    ChannelWrite::Clear
                } else {
                    ChannelWrite::Keep
                }
            }

            RetentionMode::RemoveAfterInteraction => {
                if event.is_user() && relevant {
                    ChannelWrite::Clear
                } else {
                    ChannelWrite::Keep
                }
            }

            RetentionMode::RemoveFilename => {
                if event.is_hash_resolved() {
                    ChannelWrite::Keep
                } else if event.is_user() || relevant {
                    ChannelWrite::slug(ctx.variant_slug())
                } else {
                    ChannelWrite::Keep
                }
            }
        }
    }
}
