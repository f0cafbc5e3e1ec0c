use crate::client::core::AdClient;
use crate::config::{AdClientConfig, Branding, Environment, PrivacySettings, RevenueShare};
use crate::Result;
use std::time::Duration;

/// Builder for creating clients with custom configuration.
///
/// `api_key` and `aggregator` fall back to `PATTERNOS_API_KEY` and
/// `PATTERNOS_AGGREGATOR` when they are not set explicitly.
pub struct AdClientBuilder {
    api_key: Option<String>,
    aggregator: Option<String>,
    environment: Environment,
    api_url: Option<String>,
    branding: Option<Branding>,
    revenue_share: Option<RevenueShare>,
    privacy: Option<PrivacySettings>,
    timeout: Duration,
    auto_tracking: bool,
}

impl AdClientBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            aggregator: None,
            environment: Environment::default(),
            api_url: None,
            branding: None,
            revenue_share: None,
            privacy: None,
            timeout: Duration::from_millis(crate::config::DEFAULT_TIMEOUT_MS),
            auto_tracking: false,
        }
    }

    /// Start from an existing configuration (e.g. loaded from YAML).
    pub fn from_config(config: AdClientConfig) -> Self {
        Self {
            api_key: Some(config.api_key),
            aggregator: Some(config.aggregator),
            environment: config.environment,
            api_url: config.api_url,
            branding: config.branding,
            revenue_share: config.revenue_share,
            privacy: config.privacy,
            timeout: Duration::from_millis(config.timeout_ms),
            auto_tracking: false,
        }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn aggregator(mut self, aggregator: impl Into<String>) -> Self {
        self.aggregator = Some(aggregator.into());
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Override the environment's default base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn branding(mut self, branding: Branding) -> Self {
        self.branding = Some(branding);
        self
    }

    pub fn revenue_share(mut self, aggregator: f64, platform: f64) -> Self {
        self.revenue_share = Some(RevenueShare {
            aggregator,
            platform,
        });
        self
    }

    pub fn privacy(mut self, privacy: PrivacySettings) -> Self {
        self.privacy = Some(privacy);
        self
    }

    /// Bound on every remote call (default 5 s). Precision is one
    /// millisecond; a non-zero sub-millisecond value rounds up to 1 ms.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn auto_tracking(mut self, enable: bool) -> Self {
        self.auto_tracking = enable;
        self
    }

    pub fn build(self) -> Result<AdClient> {
        let config = AdClientConfig {
            api_key: self
                .api_key
                .or_else(|| std::env::var("PATTERNOS_API_KEY").ok())
                .unwrap_or_default(),
            aggregator: self
                .aggregator
                .or_else(|| std::env::var("PATTERNOS_AGGREGATOR").ok())
                .unwrap_or_default(),
            environment: self.environment,
            api_url: self.api_url,
            branding: self.branding,
            revenue_share: self.revenue_share,
            privacy: self.privacy,
            timeout_ms: whole_millis(self.timeout),
        };

        let mut client = AdClient::new(config)?;
        if self.auto_tracking {
            client.enable_auto_tracking();
        }
        Ok(client)
    }
}

fn whole_millis(timeout: Duration) -> u64 {
    let millis = timeout.as_nanos().div_ceil(1_000_000);
    u64::try_from(millis).unwrap_or(u64::MAX)
}

impl Default for AdClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
