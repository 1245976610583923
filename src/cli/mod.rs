//! Command-line entry point: argument parsing, configuration assembly and
//! command dispatch.

pub mod handlers;
pub mod parser;
pub mod validation;

pub use parser::{Cli, Commands, EnvironmentArg, LogLevel};

use crate::config::{ConfigLoader, Settings};
use crate::logger::init_logger;
use handlers::{MigrateCommandHandler, ServeCommandHandler};

/// Loads configuration for `cli` without validating it.
///
/// `--config` replaces the layered config directory and `--env` picks the overlay.
pub fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut loader = ConfigLoader::new()?;
    if let Some(path) = &cli.config {
        loader = loader.with_file(path.clone());
    }
    if let Some(env) = cli.env {
        loader = loader.with_environment(env.into());
    }

    let mut settings = loader.load_unvalidated()?;
    apply_overrides(&mut settings, cli);
    Ok(settings)
}

/// Applies command-line overrides on top of loaded settings.
///
/// `serve --log-level` beats `--verbose`/`--quiet`, which beat the file.
pub fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if cli.verbose {
        settings.logger.level = "debug".to_string();
    } else if cli.quiet {
        settings.logger.level = "error".to_string();
    }

    if let Some(Commands::Serve {
        host,
        port,
        log_level,
        ..
    }) = &cli.command
    {
        if let Some(host) = host {
            settings.server.host = host.clone();
        }
        if let Some(port) = port {
            settings.server.port = *port;
        }
        if let Some(level) = log_level {
            settings.logger.level = level.as_str().to_string();
        }
    }
}

/// Runs the parsed command to completion.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings(&cli)?;
    settings.validate()?;
    init_logger(&settings.logger)?;

    match cli.command_or_default() {
        Commands::Serve { dry_run, .. } => ServeCommandHandler::new(settings).execute(dry_run).await,
        Commands::Migrate { dry_run, rollback } => {
            MigrateCommandHandler::new(settings)
                .execute(dry_run, rollback)
                .await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn overridden(args: &[&str]) -> Settings {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut settings = Settings::default();
        apply_overrides(&mut settings, &cli);
        settings
    }

    #[test]
    fn test_verbose_and_quiet() {
        assert_eq!(overridden(&["finance-tracker", "--verbose"]).logger.level, "debug");
        assert_eq!(overridden(&["finance-tracker", "--quiet"]).logger.level, "error");
        assert_eq!(overridden(&["finance-tracker"]).logger.level, "info");
    }

    #[test]
    fn test_serve_overrides() {
        let settings = overridden(&["finance-tracker", "serve", "--host", "0.0.0.0", "-p", "9000"]);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 9000);
    }

    #[test]
    fn test_log_level_beats_verbose() {
        let settings = overridden(&["finance-tracker", "--verbose", "serve", "--log-level", "warn"]);
        assert_eq!(settings.logger.level, "warn");
    }
}
