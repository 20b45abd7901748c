//! Engine state: selection, change origin and phase

use std::fmt;

use demo_meta::FileRef;
use serde::{Deserialize, Serialize};

/// What caused the last change of the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOrigin {
    /// `select_file` / `select_variant`
    User,
    /// A channel value resolved to the selection
    Channel,
    /// Mount defaults, stored preference or a host-driven variant change
    Init,
}

impl fmt::Display for ChangeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeOrigin::User => write!(f, "user"),
            ChangeOrigin::Channel => write!(f, "channel"),
            ChangeOrigin::Init => write!(f, "init"),
        }
    }
}

/// The (variant, file) pair currently shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub variant: String,
    /// Original file name
    pub file: String,
    pub origin: ChangeOrigin,
}

impl SelectionState {
    pub fn new(variant: impl Into<String>, file: impl Into<String>, origin: ChangeOrigin) -> Self {
        Self {
            variant: variant.into(),
            file: file.into(),
            origin,
        }
    }

    pub fn file_ref(&self) -> FileRef {
        FileRef::new(self.variant.as_str(), self.file.as_str())
    }
}

/// Lifecycle phase of the engine.
///
/// Transitions only happen through the engine's trigger methods:
///
/// ```text
/// Idle --mount--> Settled --cross-variant match--> AwaitingVariantSwitch
///   ^                ^                                    |
///   |                +------ host activates variant ------+
///   +---- unmount ---+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "kebab-case")]
pub enum Phase {
    /// Not subscribed; every trigger is ignored.
    Idle,
    /// Selection applied, nothing pending.
    Settled,
    /// A channel value matched a file of another variant. The host was asked
    /// to switch; the file is applied once that variant becomes active.
    AwaitingVariantSwitch { pending: FileRef },
}

impl Phase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }

    pub fn pending(&self) -> Option<&FileRef> {
        match self {
            Phase::AwaitingVariantSwitch { pending } => Some(pending),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Settled => write!(f, "settled"),
            Phase::AwaitingVariantSwitch { pending } => {
                write!(f, "awaiting-variant-switch({pending})")
            }
        }
    }
}

/// Observable outputs of the engine at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub variant: String,
    pub file: String,
    pub display_file: String,
    pub origin: ChangeOrigin,
    pub phase: Phase,
    pub channel: Option<String>,
}

impl SelectionSnapshot {
    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
