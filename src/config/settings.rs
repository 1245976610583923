//! Configuration settings structures for finance-tracker
//!
//! Every section deserializes with defaults so a partial TOML file (or none
//! beyond `default.toml`) yields a complete `Settings`.

use serde::{Deserialize, Serialize};

use crate::logger::LoggerConfig;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "finance-tracker".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_jwt_issuer() -> String {
    "Finantial Control".to_string()
}

fn default_jwt_expiration_minutes() -> i64 {
    15
}

// ============================================================================
// Application Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Origins allowed by CORS; empty allows any origin
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,

    /// Serve Swagger UI and the OpenAPI document
    #[serde(default = "default_true")]
    pub api_docs: bool,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            cors_allowed_origins: Vec::new(),
            api_docs: true,
        }
    }
}

// ============================================================================
// Database Configuration
// ============================================================================

/// Diesel database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,

    /// Run pending migrations before the server starts accepting requests
    #[serde(default)]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout: default_connection_timeout(),
            auto_migrate: false,
        }
    }
}

// ============================================================================
// JWT Configuration
// ============================================================================

/// Token signing configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HMAC secret; supply it through `FINANCE_JWT__SECRET` outside development
    #[serde(default)]
    pub secret: String,

    /// `iss` claim written at login and required on every request
    #[serde(default = "default_jwt_issuer")]
    pub issuer: String,

    /// Token lifetime in minutes
    #[serde(default = "default_jwt_expiration_minutes")]
    pub expiration_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            issuer: default_jwt_issuer(),
            expiration_minutes: default_jwt_expiration_minutes(),
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

// ============================================================================
// Root
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub jwt: JwtConfig,

    #[serde(default)]
    pub logger: LoggerConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::LogFormat;
    use proptest::prelude::*;

    fn arb_jwt_config() -> impl Strategy<Value = JwtConfig> {
        (
            "[a-zA-Z0-9]{32,64}",
            "[A-Za-z][A-Za-z ]{0,23}",
            1i64..=24 * 60,
        )
            .prop_map(|(secret, issuer, expiration_minutes)| JwtConfig {
                secret,
                issuer,
                expiration_minutes,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_well_formed_jwt_config_validates(config in arb_jwt_config()) {
            prop_assert!(config.validate().is_ok());
        }

        #[test]
        fn prop_blank_issuer_is_rejected(issuer in "[ \t]{0,8}") {
            let config = JwtConfig {
                secret: "0123456789abcdef0123456789abcdef".to_string(),
                issuer,
                ..JwtConfig::default()
            };
            prop_assert!(config.validate().is_err());
        }

        #[test]
        fn prop_short_secret_is_rejected(secret in "[a-z]{0,31}") {
            let config = JwtConfig { secret, ..JwtConfig::default() };
            prop_assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.application.name, "finance-tracker");
        assert_eq!(settings.application.version, crate::pkg_version());
        assert_eq!(settings.server.address(), "127.0.0.1:8080");
        assert!(settings.server.api_docs);
        assert_eq!(settings.jwt.issuer, "Finantial Control");
        assert_eq!(settings.jwt.expiration_minutes, 15);
        assert!(!settings.database.auto_migrate);
        assert_eq!(settings.logger.level, "info");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: Settings = toml_from_str(
            r#"
            [server]
            port = 9000

            [logger.file]
            enabled = true
            format = "compact"
            "#,
        );

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert!(settings.logger.file.enabled);
        assert_eq!(settings.logger.file.format, LogFormat::Compact);
        assert!(settings.logger.console.enabled);
    }

    #[test]
    fn test_jwt_debug_redacts_secret() {
        let config = JwtConfig {
            secret: "super-secret-value-that-is-long-enough".to_string(),
            ..JwtConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    fn toml_from_str(source: &str) -> Settings {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("settings should deserialize")
    }
}
