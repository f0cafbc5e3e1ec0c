//! Client configuration: credentials, environment, and pass-through metadata.
//!
//! A configuration can be assembled in code, loaded from YAML, or read from
//! `PATTERNOS_*` environment variables. Validation happens when the client is
//! built, so every source fails the same way.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use url::Url;

/// Base URL used when `environment` is `development` and no `api_url` is set.
pub const DEVELOPMENT_API_URL: &str = "http://localhost:8000";
/// Base URL used for `production` and `staging` when no `api_url` is set.
pub const PRODUCTION_API_URL: &str = "https://api.patternos.ai";
/// Default bound on every remote call.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Staging,
    Development,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Development => "development",
        }
    }

    /// Base URL selected when the configuration carries no override.
    pub fn default_api_url(&self) -> &'static str {
        match self {
            Environment::Development => DEVELOPMENT_API_URL,
            Environment::Production | Environment::Staging => PRODUCTION_API_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "staging" | "stage" => Ok(Environment::Staging),
            "development" | "dev" => Ok(Environment::Development),
            other => Err(Error::configuration_with_context(
                format!("unknown environment '{}'", other),
                ErrorContext::new()
                    .with_field_path("config.environment")
                    .with_details("expected production, staging or development"),
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display hints for widgets rendered by the integrating storefront.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    #[serde(default, alias = "logoUrl", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, alias = "primaryColor", skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, alias = "poweredBy", skip_serializing_if = "Option::is_none")]
    pub powered_by: Option<String>,
}

/// Revenue split in percent. The service validates the split; the client does not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenueShare {
    pub aggregator: f64,
    pub platform: f64,
}

impl RevenueShare {
    pub fn total(&self) -> f64 {
        self.aggregator + self.platform
    }
}

/// Privacy flags carried as configuration metadata only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivacySettings {
    #[serde(default, alias = "storeImages")]
    pub store_images: bool,
    #[serde(default, alias = "anonymizeUsers")]
    pub anonymize_users: bool,
    #[serde(default, alias = "gdprCompliant")]
    pub gdpr_compliant: bool,
    #[serde(default, alias = "dataRetentionDays", skip_serializing_if = "Option::is_none")]
    pub data_retention_days: Option<u32>,
}

/// Client settings. The API key is read but never written back out.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AdClientConfig {
    #[serde(default, alias = "apiKey", skip_serializing)]
    pub api_key: String,
    #[serde(default)]
    pub aggregator: String,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default, alias = "apiUrl", skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
    #[serde(default, alias = "revenueShare", skip_serializing_if = "Option::is_none")]
    pub revenue_share: Option<RevenueShare>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<PrivacySettings>,
    #[serde(default = "default_timeout_ms", alias = "timeoutMs")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl AdClientConfig {
    pub fn new(api_key: impl Into<String>, aggregator: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            aggregator: aggregator.into(),
            environment: Environment::default(),
            api_url: None,
            branding: None,
            revenue_share: None,
            privacy: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// Read the configuration from `PATTERNOS_*` environment variables.
    ///
    /// - `PATTERNOS_API_KEY`, `PATTERNOS_AGGREGATOR` (required)
    /// - `PATTERNOS_ENVIRONMENT` (default `production`)
    /// - `PATTERNOS_API_URL`
    /// - `PATTERNOS_TIMEOUT_MS` (default 5000)
    pub fn from_env() -> Result<Self> {
        let api_key = required_env("PATTERNOS_API_KEY")?;
        let aggregator = required_env("PATTERNOS_AGGREGATOR")?;
        let mut config = Self::new(api_key, aggregator);

        if let Ok(env) = std::env::var("PATTERNOS_ENVIRONMENT") {
            config.environment = env.parse()?;
        }
        config.api_url = std::env::var("PATTERNOS_API_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        if let Some(ms) = std::env::var("PATTERNOS_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.timeout_ms = ms;
        }
        Ok(config)
    }

    /// The base URL every endpoint path is joined onto.
    ///
    /// `api_url` always wins over the environment default.
    pub fn base_url(&self) -> String {
        let url = self
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.environment.default_api_url());
        url.trim_end_matches('/').to_string()
    }

    /// Strip surrounding whitespace from credentials and `api_url` so every
    /// header, body and query carries the same value.
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.api_key);
        trim_in_place(&mut self.aggregator);
        if let Some(url) = self.api_url.as_mut() {
            trim_in_place(url);
        }
        if self.api_url.as_deref() == Some("") {
            self.api_url = None;
        }
    }

    /// Parse [`base_url`](Self::base_url), accepting only absolute `http(s)` URLs.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let raw = self.base_url();
        let invalid = |reason: String| {
            Error::configuration_with_context(
                format!("api_url '{}' {}", raw, reason),
                ErrorContext::new()
                    .with_field_path("config.api_url")
                    .with_source("config_validator"),
            )
        };
        let url = Url::parse(&raw).map_err(|e| invalid(format!("is not a valid URL: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "must use http or https, got scheme '{}'",
                url.scheme()
            )));
        }
        if url.cannot_be_a_base() || url.host().is_none() {
            return Err(invalid("cannot be used as a base URL".to_string()));
        }
        Ok(url)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "api_key is required",
                ErrorContext::new()
                    .with_field_path("config.api_key")
                    .with_source("config_validator"),
            ));
        }
        if self.aggregator.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "aggregator is required",
                ErrorContext::new()
                    .with_field_path("config.aggregator")
                    .with_source("config_validator"),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(Error::configuration_with_context(
                "timeout_ms must be greater than zero",
                ErrorContext::new()
                    .with_field_path("config.timeout_ms")
                    .with_source("config_validator"),
            ));
        }
        self.parsed_base_url()?;
        Ok(())
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

// The API key never shows up in logs.
impl fmt::Debug for AdClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdClientConfig")
            .field("api_key", &"<redacted>")
            .field("aggregator", &self.aggregator)
            .field("environment", &self.environment)
            .field("api_url", &self.api_url)
            .field("branding", &self.branding)
            .field("revenue_share", &self.revenue_share)
            .field("privacy", &self.privacy)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn required_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            Error::configuration_with_context(
                format!("{} is not set", name),
                ErrorContext::new().with_source("env"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ENVIRONMENTS: [Environment; 3] = [
        Environment::Production,
        Environment::Staging,
        Environment::Development,
    ];

    #[test]
    fn test_blank_credentials_rejected_for_every_environment() {
        for env in ALL_ENVIRONMENTS {
            for (key, aggregator) in [("", "shop"), ("key", ""), ("  ", "shop"), ("key", " ")] {
                let mut config = AdClientConfig::new(key, aggregator);
                config.environment = env;
                let err = config.validate().unwrap_err();
                assert!(err.is_configuration(), "{env}: {err}");
            }
        }
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = AdClientConfig::new("key", "shop");
        config.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_url_per_environment() {
        let mut config = AdClientConfig::new("key", "shop");
        assert_eq!(config.base_url(), PRODUCTION_API_URL);
        config.environment = Environment::Staging;
        assert_eq!(config.base_url(), PRODUCTION_API_URL);
        config.environment = Environment::Development;
        assert_eq!(config.base_url(), DEVELOPMENT_API_URL);
    }

    #[test]
    fn test_api_url_overrides_every_environment() {
        for env in ALL_ENVIRONMENTS {
            let mut config = AdClientConfig::new("key", "shop");
            config.environment = env;
            config.api_url = Some("https://ads.example.com/".into());
            assert_eq!(config.base_url(), "https://ads.example.com");
        }
    }

    #[test]
    fn test_invalid_api_url_rejected() {
        let mut config = AdClientConfig::new("key", "shop");
        config.api_url = Some("not a url".into());
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_api_url_without_http_scheme_rejected() {
        for raw in ["localhost:8000", "ftp://ads.example.com", "mailto:ads@example.com"] {
            let mut config = AdClientConfig::new("key", "shop");
            config.api_url = Some(raw.into());
            let err = config.validate().unwrap_err();
            assert!(err.is_configuration(), "{raw}: {err}");
            assert_eq!(
                err.context().and_then(|c| c.field_path.as_deref()),
                Some("config.api_url"),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_parsed_base_url_keeps_path_prefix() {
        let mut config = AdClientConfig::new("key", "shop");
        config.api_url = Some(" http://127.0.0.1:8000/gateway/ ".into());
        let url = config.parsed_base_url().unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/gateway");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_normalize_trims_credentials() {
        let mut config = AdClientConfig::new(" pk_test\n", "\tfreshmart ");
        config.api_url = Some("   ".into());
        config.normalize();
        assert_eq!(config.api_key, "pk_test");
        assert_eq!(config.aggregator, "freshmart");
        assert_eq!(config.api_url, None);
    }

    #[test]
    fn test_serialized_config_omits_api_key() {
        let config = AdClientConfig::new("pk_secret", "shop");
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("pk_secret"), "{yaml}");
        assert!(yaml.contains("shop"));
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("api_key").is_none());
    }

    #[test]
    fn test_yaml_accepts_camel_case_keys() {
        let config = AdClientConfig::from_yaml_str(
            r#"
apiKey: pk_test
aggregator: freshmart
environment: development
revenueShare:
  aggregator: 70
  platform: 30
privacy:
  gdprCompliant: true
  dataRetentionDays: 90
"#,
        )
        .unwrap();
        assert_eq!(config.api_key, "pk_test");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.revenue_share.unwrap().total(), 100.0);
        let privacy = config.privacy.unwrap();
        assert!(privacy.gdpr_compliant);
        assert!(!privacy.store_images);
        assert_eq!(privacy.data_retention_days, Some(90));
    }

    #[test]
    fn test_revenue_share_sum_not_enforced() {
        let mut config = AdClientConfig::new("key", "shop");
        config.revenue_share = Some(RevenueShare {
            aggregator: 80.0,
            platform: 40.0,
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("Production".parse::<Environment>().unwrap(), Environment::Production);
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AdClientConfig::new("pk_secret", "shop");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("pk_secret"));
        assert!(rendered.contains("shop"));
    }
}
