//! Migrate command handler

use crate::config::Settings;
use crate::db::{MigrationAction, run_migrations};
use crate::error::AppResult;

/// Handler for the migrate command
pub struct MigrateCommandHandler {
    settings: Settings,
}

impl MigrateCommandHandler {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Chooses the migration action from the command flags.
    pub fn action(dry_run: bool, rollback: Option<usize>) -> MigrationAction {
        match (dry_run, rollback) {
            (true, _) => MigrationAction::DryRun,
            (false, Some(steps)) => MigrationAction::Rollback(steps),
            (false, None) => MigrationAction::Apply,
        }
    }

    pub async fn execute(&self, dry_run: bool, rollback: Option<usize>) -> AppResult<()> {
        self.settings.database.validate()?;

        let action = Self::action(dry_run, rollback);
        tracing::info!(?action, "Running database migrations");
        let report = run_migrations(&self.settings.database.url, action).await?;

        match action {
            MigrationAction::DryRun if report.pending.is_empty() => {
                println!("✓ No pending migrations - database is up to date");
            }
            MigrationAction::DryRun => {
                println!("Found {} pending migration(s):", report.pending.len());
                for version in &report.pending {
                    println!("  - {}", version);
                }
            }
            MigrationAction::Apply if report.versions.is_empty() => {
                println!("✓ No migrations to apply - database is already up to date");
            }
            MigrationAction::Apply => {
                println!("✓ Applied {} migration(s):", report.versions.len());
                for version in &report.versions {
                    println!("  - {}", version);
                }
            }
            MigrationAction::Rollback(_) => {
                println!("✓ Rolled back {} migration(s):", report.versions.len());
                for version in &report.versions {
                    println!("  - {}", version);
                }
            }
        }

        Ok(())
    }
}
