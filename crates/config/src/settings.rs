//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{ClassifierConfig, ConfigError, DispositionConfig, LlmConfig, SessionConfig};

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Intent classifier thresholds and weights
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Session lifecycle
    #[serde(default)]
    pub session: SessionConfig,

    /// Chat completion backend
    #[serde(default)]
    pub llm: LlmConfig,

    /// Disposition model backend
    #[serde(default)]
    pub disposition: DispositionConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.classifier.validate()?;
        self.session.validate()?;
        self.validate_server()?;
        self.validate_collaborators()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "Port cannot be 0"));
        }
        Ok(())
    }

    fn validate_collaborators(&self) -> Result<(), ConfigError> {
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::invalid("llm.model", "Must not be empty"));
        }
        if self.llm.timeout_seconds == 0 {
            return Err(ConfigError::invalid("llm.timeout_seconds", "Must be at least 1"));
        }
        if self.disposition.model.trim().is_empty() {
            return Err(ConfigError::invalid("disposition.model", "Must not be empty"));
        }
        if self.disposition.timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "disposition.timeout_seconds",
                "Must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS restrictions; when disabled every origin is allowed
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins (empty allows any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from `config/default`, `config/{env}` and the environment
///
/// Priority: env vars > config/{env}.* > config/default.* > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("EMI_ASSIST")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

/// Load settings from a single explicit file
pub fn load_settings_from(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config = Config::builder()
        .add_source(File::from(path))
        .build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;
    tracing::debug!(path = %path.display(), "Loaded settings file");

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.llm.model, "gemma3");
        assert_eq!(settings.disposition.model, "disposition-model");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());

        settings.server.port = 9000;
        settings.classifier.ambiguity_delta = -0.1;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_settings_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[classifier]
ambiguity_delta = 0.1

[llm]
model = "llama3"
"#
        )
        .unwrap();

        let settings = load_settings_from(file.path()).unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.classifier.ambiguity_delta, 0.1);
        assert_eq!(settings.classifier.max_score_threshold, 0.60);
        assert_eq!(settings.llm.model, "llama3");
    }

    #[test]
    fn test_load_settings_missing_file() {
        let result = load_settings_from("/nonexistent/emi-assist.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_settings_rejects_invalid_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[classifier]\nmax_weight = 0.9").unwrap();

        let result = load_settings_from(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
