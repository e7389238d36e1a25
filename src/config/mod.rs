use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub validation: ValidationConfig,
    pub api: ApiConfig,
    pub docs: DocsConfig,
    pub contract: ContractConfig,
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
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub validate_requests: bool,
    pub validate_responses: bool,
    pub allow_unknown_query_parameters: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub enable_cors: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    pub enabled: bool,
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractConfig {
    /// External OpenAPI document; the embedded one is used when unset
    pub path: Option<PathBuf>,
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

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("STOREFRONT_API_HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("STOREFRONT_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Validation overrides
        if let Ok(v) = env::var("VALIDATION_VALIDATE_REQUESTS") {
            self.validation.validate_requests = v.parse().unwrap_or(self.validation.validate_requests);
        }
        if let Ok(v) = env::var("VALIDATION_VALIDATE_RESPONSES") {
            self.validation.validate_responses = v.parse().unwrap_or(self.validation.validate_responses);
        }
        if let Ok(v) = env::var("VALIDATION_ALLOW_UNKNOWN_QUERY_PARAMETERS") {
            self.validation.allow_unknown_query_parameters =
                v.parse().unwrap_or(self.validation.allow_unknown_query_parameters);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_ENABLE_CORS") {
            self.api.enable_cors = v.parse().unwrap_or(self.api.enable_cors);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Docs overrides
        if let Ok(v) = env::var("DOCS_ENABLED") {
            self.docs.enabled = v.parse().unwrap_or(self.docs.enabled);
        }

        // Contract overrides
        if let Ok(v) = env::var("STOREFRONT_CONTRACT_PATH") {
            if !v.is_empty() {
                self.contract.path = Some(PathBuf::from(v));
            }
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            validation: ValidationConfig {
                validate_requests: true,
                validate_responses: true,
                allow_unknown_query_parameters: false,
            },
            api: ApiConfig {
                enable_request_logging: true,
                enable_cors: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            docs: DocsConfig::default(),
            contract: ContractConfig::default(),
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig::default(),
            validation: ValidationConfig {
                validate_requests: true,
                validate_responses: false,
                allow_unknown_query_parameters: false,
            },
            api: ApiConfig {
                enable_request_logging: true,
                enable_cors: true,
                max_request_size_bytes: 512 * 1024,
            },
            docs: DocsConfig::default(),
            contract: ContractConfig::default(),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::default(),
            validation: ValidationConfig {
                validate_requests: true,
                validate_responses: false,
                allow_unknown_query_parameters: false,
            },
            api: ApiConfig {
                enable_request_logging: false,
                enable_cors: false,
                max_request_size_bytes: 256 * 1024,
            },
            docs: DocsConfig::default(),
            contract: ContractConfig::default(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/docs".to_string(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
