use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown storage backend: {0}")]
    UnknownBackend(String),

    #[error("{0} must be set when using the postgres backend")]
    MissingDatabaseUrl(&'static str),

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageBackend::Memory),
            "postgres" | "postgresql" | "pg" => Ok(StorageBackend::Postgres),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    /// Deadline applied to every individual store operation
    pub operation_timeout_ms: u64,
    pub seed_sample_data: bool,
    pub drop_on_shutdown: bool,
    /// Unparseable `DATABASE_BACKEND` value, reported by `validate()`
    #[serde(skip)]
    rejected_backend: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
    /// Upper bound on (field, value) pairs a single search request may fan out to
    pub max_search_terms: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
    pub argon2_parallelism: u32,
    /// User names granted administrator rights at startup
    pub bootstrap_admins: Vec<String>,
}

impl DatabaseConfig {
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

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

    /// Rejects combinations the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.database.rejected_backend {
            return Err(ConfigError::UnknownBackend(name.clone()));
        }
        if self.database.backend == StorageBackend::Postgres && self.database.url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl("DATABASE_URL"));
        }
        if self.api.max_search_terms == 0 {
            return Err(ConfigError::NotPositive { field: "api.max_search_terms" });
        }
        if self.database.operation_timeout_ms == 0 {
            return Err(ConfigError::NotPositive {
                field: "database.operation_timeout_ms",
            });
        }
        Ok(())
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("REDOOT_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("REDOOT_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_BACKEND") {
            self.set_backend(&v);
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_OPERATION_TIMEOUT_MS") {
            self.database.operation_timeout_ms = v.parse().unwrap_or(self.database.operation_timeout_ms);
        }
        if let Ok(v) = env::var("DATABASE_SEED_SAMPLE_DATA") {
            self.database.seed_sample_data = v.parse().unwrap_or(self.database.seed_sample_data);
        }
        if let Ok(v) = env::var("DATABASE_DROP_ON_SHUTDOWN") {
            self.database.drop_on_shutdown = v.parse().unwrap_or(self.database.drop_on_shutdown);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }
        if let Ok(v) = env::var("API_MAX_SEARCH_TERMS") {
            self.api.max_search_terms = v.parse().unwrap_or(self.api.max_search_terms);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_ARGON2_MEMORY_KIB") {
            self.security.argon2_memory_kib = v.parse().unwrap_or(self.security.argon2_memory_kib);
        }
        if let Ok(v) = env::var("SECURITY_ARGON2_ITERATIONS") {
            self.security.argon2_iterations = v.parse().unwrap_or(self.security.argon2_iterations);
        }
        if let Ok(v) = env::var("SECURITY_ARGON2_PARALLELISM") {
            self.security.argon2_parallelism = v.parse().unwrap_or(self.security.argon2_parallelism);
        }
        if let Ok(v) = env::var("SECURITY_BOOTSTRAP_ADMINS") {
            self.security.bootstrap_admins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    fn set_backend(&mut self, value: &str) {
        match value.parse() {
            Ok(backend) => {
                self.database.backend = backend;
                self.database.rejected_backend = None;
            }
            Err(_) => self.database.rejected_backend = Some(value.to_string()),
        }
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Memory,
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                operation_timeout_ms: 200,
                seed_sample_data: true,
                drop_on_shutdown: true,
                rejected_backend: None,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
                max_search_terms: 16,
            },
            security: SecurityConfig {
                enable_cors: true,
                // Cheap hashing keeps local runs and tests fast
                argon2_memory_kib: 4096,
                argon2_iterations: 1,
                argon2_parallelism: 1,
                bootstrap_admins: vec!["Administrator".to_string()],
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Postgres,
                url: None,
                max_connections: 20,
                connection_timeout: 10,
                operation_timeout_ms: 200,
                seed_sample_data: false,
                drop_on_shutdown: false,
                rejected_backend: None,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
                max_search_terms: 16,
            },
            security: SecurityConfig {
                enable_cors: true,
                argon2_memory_kib: 19456,
                argon2_iterations: 2,
                argon2_parallelism: 1,
                bootstrap_admins: Vec::new(),
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Postgres,
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                operation_timeout_ms: 200,
                seed_sample_data: false,
                drop_on_shutdown: false,
                rejected_backend: None,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
                max_search_terms: 8,
            },
            security: SecurityConfig {
                enable_cors: true,
                argon2_memory_kib: 19456,
                argon2_iterations: 2,
                argon2_parallelism: 1,
                bootstrap_admins: Vec::new(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
