use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;
use tracing::{event, Level};

use crate::{
    client::{Client, ConsoleOptions},
    error::{Error, Result},
    resources::{
        DataSource, Diagnostic, DynamicConfigModel, Record, Resource, TagModel, TargetAppModel,
    },
};

/// Fallback source for the console api key.
pub const CONSOLE_KEY_ENV: &str = "STATSIG_CONSOLE_KEY";

const CONSOLE_KEY_PATTERN: &str = "^console-[a-zA-Z0-9]{3,}";

/// Provider configuration block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfig {
    pub console_api_key: Option<String>,
}

impl ProviderConfig {
    /// The configured key, falling back to `STATSIG_CONSOLE_KEY`.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_with(std::env::var(CONSOLE_KEY_ENV).ok())
    }

    fn resolve_api_key_with(&self, env_key: Option<String>) -> Result<String> {
        let key = self
            .console_api_key
            .clone()
            .or(env_key)
            .unwrap_or_default();
        if key.is_empty() {
            return Err(Error::Config(format!(
                "missing statsig console api key, set console_api_key or the {} environment variable",
                CONSOLE_KEY_ENV
            )));
        }
        validate_api_key(&key)?;
        Ok(key)
    }
}

pub fn validate_api_key(key: &str) -> Result<()> {
    let pattern = Regex::new(CONSOLE_KEY_PATTERN)
        .map_err(|e| Error::Config(format!("invalid console key pattern: {}", e)))?;
    if !pattern.is_match(key) {
        return Err(Error::Config(
            "provided key is not a valid console api key".to_string(),
        ));
    }
    Ok(())
}

/// Holds the shared console client and hands it to every resource and data source.
pub struct Provider {
    client: Arc<Client>,
}

impl Provider {
    pub const TYPE_NAME: &'static str = "statsig";

    pub fn configure(
        config: &ProviderConfig,
        options: ConsoleOptions,
    ) -> std::result::Result<Self, Diagnostic> {
        event!(Level::INFO, "Configuring statsig provider");
        let api_key = config
            .resolve_api_key()
            .map_err(|e| Diagnostic::from_error("Invalid Statsig Console API Key", &e))?;

        let client = Client::new(&api_key, options)
            .map_err(|e| Diagnostic::from_error("Unable to create Statsig API Client", &e))?;

        event!(Level::INFO, "Configured statsig provider");
        Ok(Self { client })
    }

    pub fn client(&self) -> Arc<Client> {
        self.client.clone()
    }

    pub fn resources() -> Vec<String> {
        vec![
            resource_type_name::<TagModel>(),
            resource_type_name::<TargetAppModel>(),
            resource_type_name::<DynamicConfigModel>(),
        ]
    }

    pub fn data_sources() -> Vec<String> {
        vec![
            data_source_type_name::<TagModel>(),
            data_source_type_name::<TargetAppModel>(),
            data_source_type_name::<DynamicConfigModel>(),
        ]
    }

    pub fn resource<R: Record>(&self) -> Resource<R> {
        Resource::new(self.client())
    }

    pub fn data_source<R: Record>(&self) -> DataSource<R> {
        DataSource::new(self.client())
    }
}

pub fn resource_type_name<R: Record>() -> String {
    format!("{}_{}", Provider::TYPE_NAME, R::RESOURCE_TYPE)
}

pub fn data_source_type_name<R: Record>() -> String {
    format!("{}_{}", Provider::TYPE_NAME, R::DATA_SOURCE_TYPE)
}

#[cfg(test)]
mod test {
    use crate::error::ErrorKind;

    use super::*;

    #[test]
    fn test_validate_api_key() {
        assert!(validate_api_key("console-abc").is_ok());
        assert!(validate_api_key("console-AbC123xyz").is_ok());
        assert!(validate_api_key("console-ab").is_err());
        assert!(validate_api_key("secret-abc123").is_err());
        assert!(validate_api_key("").is_err());
    }

    #[test]
    fn test_explicit_key_wins_over_env() -> anyhow::Result<()> {
        let config = ProviderConfig {
            console_api_key: Some("console-explicit".to_string()),
        };
        let key = config.resolve_api_key_with(Some("console-fromenv".to_string()))?;
        assert_eq!("console-explicit", key);
        Ok(())
    }

    #[test]
    fn test_env_key_fallback() -> anyhow::Result<()> {
        let config = ProviderConfig::default();
        let key = config.resolve_api_key_with(Some("console-fromenv".to_string()))?;
        assert_eq!("console-fromenv", key);
        Ok(())
    }

    #[test]
    fn test_missing_key() {
        let err = ProviderConfig::default()
            .resolve_api_key_with(None)
            .err()
            .expect("should fail");
        assert_eq!(ErrorKind::Config, err.kind());
        assert!(err.to_string().contains(CONSOLE_KEY_ENV));

        let config = ProviderConfig {
            console_api_key: Some("".to_string()),
        };
        assert!(config.resolve_api_key_with(None).is_err());
    }

    #[test]
    fn test_configure_rejects_invalid_key() {
        let config = ProviderConfig {
            console_api_key: Some("client-abc123".to_string()),
        };
        let diag = Provider::configure(&config, ConsoleOptions::default())
            .err()
            .expect("should fail");
        assert_eq!(ErrorKind::Config, diag.kind);
        assert_eq!("Invalid Statsig Console API Key", diag.summary);
    }

    #[test]
    fn test_registered_types() {
        assert_eq!(
            vec![
                "statsig_tag".to_string(),
                "statsig_target_app".to_string(),
                "statsig_dynamic_config".to_string()
            ],
            Provider::resources()
        );
        assert_eq!(
            vec![
                "statsig_tags".to_string(),
                "statsig_target_apps".to_string(),
                "statsig_dynamic_configs".to_string()
            ],
            Provider::data_sources()
        );
    }
}
