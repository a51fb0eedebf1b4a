use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use thiserror::Error;

/// Minimum accepted length for a configured session secret
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SESSION_SECRET must be set in production")]
    MissingSessionSecret,

    #[error("SESSION_SECRET must be at least {MIN_SECRET_BYTES} bytes long")]
    WeakSessionSecret,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    #[serde(skip)]
    pub secret: Option<Secret>,
    pub max_age_secs: i64,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Value of the Content-Security-Policy header; empty disables the header
    pub content_security_policy: String,
    pub enable_request_logging: bool,
    pub password_memory_kib: u32,
    pub password_iterations: u32,
}

/// Secret value whose Debug output never shows the content.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

const DEFAULT_CSP: &str = "default-src 'self'; script-src 'self'; style-src 'self'; img-src 'self';";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("TODO_HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("TODO_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("TODO_STATIC_DIR") {
            self.server.static_dir = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Session overrides
        if let Ok(v) = env::var("SESSION_SECRET") {
            if !v.is_empty() {
                self.session.secret = Some(Secret::new(v));
            }
        }
        if let Ok(v) = env::var("SESSION_COOKIE_NAME") {
            self.session.cookie_name = v;
        }
        if let Ok(v) = env::var("SESSION_MAX_AGE_SECS") {
            self.session.max_age_secs = v.parse().unwrap_or(self.session.max_age_secs);
        }
        if let Ok(v) = env::var("SESSION_COOKIE_SECURE") {
            self.session.cookie_secure = v.parse().unwrap_or(self.session.cookie_secure);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CSP") {
            self.security.content_security_policy = v;
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_REQUEST_LOGGING") {
            self.security.enable_request_logging = v.parse().unwrap_or(self.security.enable_request_logging);
        }
        if let Ok(v) = env::var("HASH_MEMORY_KIB") {
            self.security.password_memory_kib = v.parse().unwrap_or(self.security.password_memory_kib);
        }
        if let Ok(v) = env::var("HASH_ITERATIONS") {
            self.security.password_iterations = v.parse().unwrap_or(self.security.password_iterations);
        }

        self
    }

    /// Rejects configurations that must not be used to serve traffic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (&self.session.secret, self.environment) {
            (None, Environment::Production) => Err(ConfigError::MissingSessionSecret),
            (Some(secret), _) if secret.expose().len() < MIN_SECRET_BYTES => {
                Err(ConfigError::WeakSessionSecret)
            }
            _ => Ok(()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                static_dir: "static".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://todo.db?mode=rwc".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            session: SessionConfig {
                cookie_name: "session".to_string(),
                secret: None,
                max_age_secs: 7 * 24 * 60 * 60,
                cookie_secure: false,
            },
            security: SecurityConfig {
                content_security_policy: DEFAULT_CSP.to_string(),
                enable_request_logging: true,
                password_memory_kib: 19456,
                password_iterations: 2,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                static_dir: "static".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://todo.db?mode=rwc".to_string(),
                max_connections: 10,
                connection_timeout: 10,
            },
            session: SessionConfig {
                cookie_name: "session".to_string(),
                secret: None,
                max_age_secs: 24 * 60 * 60,
                cookie_secure: true,
            },
            security: SecurityConfig {
                content_security_policy: DEFAULT_CSP.to_string(),
                enable_request_logging: true,
                password_memory_kib: 19456,
                password_iterations: 2,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                static_dir: "static".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://todo.db?mode=rwc".to_string(),
                max_connections: 20,
                connection_timeout: 5,
            },
            session: SessionConfig {
                cookie_name: "session".to_string(),
                secret: None,
                max_age_secs: 8 * 60 * 60,
                cookie_secure: true,
            },
            security: SecurityConfig {
                content_security_policy: DEFAULT_CSP.to_string(),
                enable_request_logging: false,
                password_memory_kib: 65536,
                password_iterations: 3,
            },
        }
    }
}
