//! Retention mode for the shared channel
//!
//! The retention mode decides how much of a resolved selection is written
//! back to the channel after a transition. It is the single switch all
//! write-back branching keys off.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How much of the selection the channel retains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetentionMode {
    /// Keep the channel in step with the full `collection[:variant]:file` slug.
    #[default]
    Full,

    /// Consume the file segment, then collapse the channel to the collection slug.
    Demo,

    /// Clear the channel on any user action.
    Remove,

    /// Leave the channel alone until the user acts, then clear it.
    RemoveAfterInteraction,

    /// Keep `collection[:variant]` without the file segment.
    RemoveFilename,
}

impl RetentionMode {
    /// All modes, in declaration order.
    pub const ALL: [RetentionMode; 5] = [
        RetentionMode::Full,
        RetentionMode::Demo,
        RetentionMode::Remove,
        RetentionMode::RemoveAfterInteraction,
        RetentionMode::RemoveFilename,
    ];

    /// Whether this mode ever writes a non-empty value to the channel.
    pub fn writes_values(&self) -> bool {
        matches!(
            self,
            RetentionMode::Full | RetentionMode::Demo | RetentionMode::RemoveFilename
        )
    }
}

impl FromStr for RetentionMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "full" => Ok(RetentionMode::Full),
            "demo" => Ok(RetentionMode::Demo),
            "remove" => Ok(RetentionMode::Remove),
            "remove-after-interaction" => Ok(RetentionMode::RemoveAfterInteraction),
            "remove-filename" => Ok(RetentionMode::RemoveFilename),
            _ => Err(Error::InvalidRetentionMode {
                mode: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RetentionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionMode::Full => write!(f, "full"),
            RetentionMode::Demo => write!(f, "demo"),
            RetentionMode::Remove => write!(f, "remove"),
            RetentionMode::RemoveAfterInteraction => write!(f, "remove-after-interaction"),
            RetentionMode::RemoveFilename => write!(f, "remove-filename"),
        }
    }
}
