//! CLI argument parsing using clap derive

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

/// demo-sync - Keep a demo viewer's selection in sync with a URL hash
#[derive(Parser, Debug)]
#[command(name = "demo-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Encode and decode slugs
    Slug {
        #[command(subcommand)]
        action: SlugAction,
    },

    /// Resolve a hash value against a viewer config
    ///
    /// Examples:
    ///   demo-sync resolve --config demo.toml demo:styles.css
    ///   demo-sync resolve --config demo.toml demo:premium:helper.ts --active Premium
    Resolve {
        /// Path to the viewer config
        #[arg(short, long, env = "DEMO_SYNC_CONFIG")]
        config: PathBuf,

        /// Hash value without the leading `#`
        hash: String,

        /// Active variant (defaults to the collection's first variant)
        #[arg(long)]
        active: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Validate a viewer config and list every slug it produces
    Check {
        /// Path to the viewer config
        #[arg(short, long, env = "DEMO_SYNC_CONFIG")]
        config: PathBuf,
    },

    /// Mount an engine and replay a script of events against it
    ///
    /// Steps:
    ///   navigate=VALUE        external hash change (back/forward, pasted link)
    ///   clear                 external hash removal
    ///   select-file=NAME      user picks a file
    ///   select-variant=NAME   user picks a variant
    ///   activate=VARIANT      host reports a new active variant
    ///
    /// Examples:
    ///   demo-sync simulate --config demo.toml --hash demo:styles.css select-file=component.tsx
    ///   demo-sync simulate --config demo.toml --manual-switch navigate=demo:premium:helper.ts activate=Premium
    Simulate {
        /// Path to the viewer config
        #[arg(short, long, env = "DEMO_SYNC_CONFIG")]
        config: PathBuf,

        /// Hash value at mount
        #[arg(long)]
        hash: Option<String>,

        /// Stored variant preference at mount
        #[arg(long)]
        stored: Option<String>,

        /// Leave variant switch requests unanswered until an `activate` step
        #[arg(long)]
        manual_switch: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        /// Events to replay, in order
        steps: Vec<Step>,
    },
}

/// Slug subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SlugAction {
    /// Encode a file, variant or collection slug
    ///
    /// Without --file a variant slug is printed, without --variant the
    /// collection slug (or the default-variant file slug).
    Encode {
        /// Collection identifier
        #[arg(long)]
        collection: String,

        /// File name
        #[arg(long)]
        file: Option<String>,

        /// Variant name
        #[arg(long)]
        variant: Option<String>,

        /// The variant is the collection's default variant
        #[arg(long)]
        default: bool,
    },

    /// Decode a slug into its segments
    Decode {
        /// Slug to decode
        slug: String,

        /// Known variant names, used to tell variants from files
        #[arg(long = "variant")]
        variants: Vec<String>,
    },
}

/// One scripted event for `simulate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Navigate(String),
    Clear,
    SelectFile(String),
    SelectVariant(String),
    Activate(String),
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "clear" {
            return Ok(Step::Clear);
        }

        let Some((kind, value)) = s.split_once('=') else {
            return Err(format!("Invalid step '{s}', expected KIND=VALUE or 'clear'"));
        };

        match kind {
            "navigate" => Ok(Step::Navigate(value.to_string())),
            "select-file" => Ok(Step::SelectFile(value.to_string())),
            "select-variant" => Ok(Step::SelectVariant(value.to_string())),
            "activate" => Ok(Step::Activate(value.to_string())),
            _ => Err(format!(
                "Unknown step kind '{kind}', expected one of: navigate, clear, select-file, select-variant, activate"
            )),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Navigate(value) => write!(f, "navigate={value}"),
            Step::Clear => write!(f, "clear"),
            Step::SelectFile(name) => write!(f, "select-file={name}"),
            Step::SelectVariant(name) => write!(f, "select-variant={name}"),
            Step::Activate(name) => write!(f, "activate={name}"),
        }
    }
}
