//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file (path in
//! `TENT_HOUSE_CONFIG`, default `tent-house.yaml`) with a handful of
//! environment overrides applied on top. Every section has defaults; only
//! the owner credentials must be supplied.

use crate::core::error::ConfigError;
use crate::entities::ServiceType;
use argon2::password_hash::PasswordHash;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "TENT_HOUSE_CONFIG";

/// Config file used when `TENT_HOUSE_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "tent-house.yaml";

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub business: BusinessConfig,
    pub owner: OwnerConfig,
    pub catalog: CatalogConfig,
    pub storage: StorageConfig,
}

/// HTTP listener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// `host:port`, ready for `TcpListener::bind`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Business identity printed on exported bills and share messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessConfig {
    pub name: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: "JATA SHANKAR TENT HOUSE".to_string(),
        }
    }
}

/// The single owner account
///
/// When `password_hash` (an argon2 PHC string) is set it is checked instead
/// of the plaintext `password`.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnerConfig {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl fmt::Debug for OwnerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnerConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Service-type vocabulary for bill tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub service_types: Vec<String>,
    /// Tag applied to detailed (itemized) owner bills
    pub default_service_type: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            service_types: ["Tent", "Palace", "DJ", "Roadlight"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_service_type: "Tent".to_string(),
        }
    }
}

impl CatalogConfig {
    pub fn vocabulary(&self) -> Vec<ServiceType> {
        self.service_types.iter().map(|s| ServiceType::new(s.as_str())).collect()
    }

    pub fn default_tag(&self) -> ServiceType {
        ServiceType::new(self.default_service_type.as_str())
    }

    /// Canonical vocabulary entry for `label`, matched case-insensitively
    pub fn resolve(&self, label: &str) -> Option<ServiceType> {
        let label = label.trim();
        self.service_types
            .iter()
            .find(|known| known.eq_ignore_ascii_case(label))
            .map(|known| ServiceType::new(known.as_str()))
    }
}

/// Which document store backs the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Mongodb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub uri: String,
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            uri: "mongodb://localhost:27017".to_string(),
            database: "tent_house".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })
    }

    /// Load from the process environment: file first, then overrides, then
    /// validation
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with an injectable environment lookup
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let explicit = env(CONFIG_PATH_ENV);
        let path = explicit.clone().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            Self::from_yaml_file(&path)?
        } else if explicit.is_some() {
            return Err(ConfigError::FileNotFound { path });
        } else {
            Self::default()
        };

        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `TENT_HOUSE_*` overrides
    pub fn apply_env_overrides(
        &mut self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(email) = env("TENT_HOUSE_OWNER_EMAIL") {
            self.owner.email = email;
        }
        if let Some(password) = env("TENT_HOUSE_OWNER_PASSWORD") {
            self.owner.password = password;
        }
        if let Some(hash) = env("TENT_HOUSE_OWNER_PASSWORD_HASH") {
            self.owner.password_hash = Some(hash);
        }
        if let Some(port) = env("TENT_HOUSE_PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "server.port".to_string(),
                value: port.clone(),
                message: "expected a port number".to_string(),
            })?;
        }
        if let Some(uri) = env("TENT_HOUSE_MONGODB_URI") {
            self.storage.uri = uri;
            self.storage.backend = StorageBackend::Mongodb;
        }
        Ok(())
    }

    /// Reject configurations the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.email.trim().is_empty() {
            return Err(invalid("owner.email", "", "owner email is required"));
        }
        match &self.owner.password_hash {
            Some(hash) => {
                if PasswordHash::new(hash).is_err() {
                    return Err(invalid(
                        "owner.password_hash",
                        "<redacted>",
                        "expected an argon2 PHC string",
                    ));
                }
            }
            None if self.owner.password.is_empty() => {
                return Err(invalid("owner.password", "", "owner password is required"));
            }
            None => {}
        }
        if self.catalog.service_types.is_empty() {
            return Err(invalid(
                "catalog.service_types",
                "[]",
                "at least one service type is required",
            ));
        }
        if self.catalog.resolve(&self.catalog.default_service_type).is_none() {
            return Err(invalid(
                "catalog.default_service_type",
                &self.catalog.default_service_type,
                "must be one of catalog.service_types",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}
