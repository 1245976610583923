//! Serve command handler

use crate::config::Settings;
use crate::server::Server;

/// Handler for the serve command
pub struct ServeCommandHandler {
    settings: Settings,
}

impl ServeCommandHandler {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Runs the server, or only validates the configuration when `dry_run` is set.
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            return self.validate_only();
        }
        Server::new(self.settings).run().await
    }

    /// Validates everything the server needs at startup without opening sockets
    /// or database connections.
    pub fn validate_only(&self) -> anyhow::Result<()> {
        self.settings.validate()?;
        self.settings.jwt.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.settings.server.address());
        println!("✓ Token issuer: {}", self.settings.jwt.issuer);
        println!("Dry run completed successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.database.url = "postgres://localhost/finance".to_string();
        settings.jwt.secret = "an-hmac-secret-of-at-least-32-chars".to_string();
        settings
    }

    #[tokio::test]
    async fn test_dry_run_accepts_valid_settings() {
        let handler = ServeCommandHandler::new(valid_settings());
        assert!(handler.execute(true).await.is_ok());
    }

    #[tokio::test]
    async fn test_dry_run_rejects_short_jwt_secret() {
        let mut settings = valid_settings();
        settings.jwt.secret = "short".to_string();

        let handler = ServeCommandHandler::new(settings);
        assert!(handler.execute(true).await.is_err());
    }

    #[tokio::test]
    async fn test_dry_run_rejects_invalid_port() {
        let mut settings = valid_settings();
        settings.server.port = 0;

        assert!(ServeCommandHandler::new(settings).execute(true).await.is_err());
    }
}
