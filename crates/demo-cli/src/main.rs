//! demo-sync CLI
//!
//! Inspect slugs, resolve hash values against a viewer config and replay
//! event scripts against a live synchronization engine.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands, SlugAction};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: logging disabled: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} hash-synchronized demo selection", "demo-sync".green().bold());
            println!();
            println!("Run {} for available commands.", "demo-sync --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Slug { action } => match action {
            SlugAction::Encode {
                collection,
                file,
                variant,
                default,
            } => commands::run_slug_encode(&collection, file.as_deref(), variant.as_deref(), default),
            SlugAction::Decode { slug, variants } => commands::run_slug_decode(&slug, &variants),
        },
        Commands::Resolve {
            config,
            hash,
            active,
            json,
        } => commands::run_resolve(&config, &hash, active.as_deref(), json),
        Commands::Check { config } => commands::run_check(&config),
        Commands::Simulate {
            config,
            hash,
            stored,
            manual_switch,
            json,
            steps,
        } => commands::run_simulate(
            &config,
            hash.as_deref(),
            stored.as_deref(),
            manual_switch,
            json,
            &steps,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_user() {
        let error = crate::error::CliError::user("test error");
        assert_eq!(format!("{}", error), "test error");
    }

    #[test]
    fn test_execute_slug_encode() {
        let cmd = Commands::Slug {
            action: SlugAction::Encode {
                collection: "Demo".to_string(),
                file: Some("styles.css".to_string()),
                variant: None,
                default: false,
            },
        };
        assert!(execute_command(cmd).is_ok());
    }

    #[test]
    fn test_execute_missing_config_fails() {
        let cmd = Commands::Check {
            config: "does-not-exist/demo.toml".into(),
        };
        assert!(execute_command(cmd).is_err());
    }
}
