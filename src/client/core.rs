use crate::client::validation::{
    recommendation_limit, require_user_id, retain_requested_slots, validate_ad_request,
    DEFAULT_RECOMMENDATION_LIMIT,
};
use crate::config::AdClientConfig;
use crate::transport::HttpTransport;
use crate::types::intelligence::RecommendationsBody;
use crate::types::{
    AdRequest, AdResponse, CampaignListResult, IntentResult, Recommendation, TrackingEvent,
    TrackingPayload,
};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Typed, authenticated client for the ad-decisioning and tracking API.
///
/// Cloning is cheap and shares the connection pool and the immutable
/// configuration. Separately built clients share nothing.
#[derive(Clone)]
pub struct AdClient {
    config: Arc<AdClientConfig>,
    transport: HttpTransport,
    auto_tracking: bool,
}

impl AdClient {
    /// Validate `config` and set up the transport. Fails with a
    /// configuration error when the API key or aggregator is blank.
    ///
    /// Surrounding whitespace is stripped from the credentials first.
    pub fn new(mut config: AdClientConfig) -> Result<Self> {
        config.normalize();
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        debug!(
            aggregator = config.aggregator.as_str(),
            environment = config.environment.as_str(),
            base_url = transport.base_url().as_str(),
            "patternos client configured"
        );
        Ok(Self {
            config: Arc::new(config),
            transport,
            auto_tracking: false,
        })
    }

    pub fn builder() -> crate::client::builder::AdClientBuilder {
        crate::client::builder::AdClientBuilder::new()
    }

    /// Build a client from `PATTERNOS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(AdClientConfig::from_env()?)
    }

    pub fn config(&self) -> &AdClientConfig {
        &self.config
    }

    pub fn aggregator(&self) -> &str {
        &self.config.aggregator
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url().as_str()
    }

    /// Bound applied to every remote call.
    pub fn timeout(&self) -> Duration {
        self.transport.timeout()
    }

    /// Ask the RTB endpoint to fill the request's slots.
    ///
    /// An empty `ads` list is a successful answer. Network errors, timeouts
    /// and non-2xx statuses come back as `Error::RequestFailed`; nothing is
    /// retried.
    pub async fn request_ads(&self, request: &AdRequest) -> Result<AdResponse> {
        self.request_ads_inner(request, None).await
    }

    pub async fn request_ads_with_cancel(
        &self,
        request: &AdRequest,
        cancel: &CancellationToken,
    ) -> Result<AdResponse> {
        self.request_ads_inner(request, Some(cancel)).await
    }

    async fn request_ads_inner(
        &self,
        request: &AdRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<AdResponse> {
        validate_ad_request(request)?;

        let mut wire = request.clone();
        if !wire.aggregator.is_empty() && wire.aggregator != self.config.aggregator {
            warn!(
                requested = wire.aggregator.as_str(),
                configured = self.config.aggregator.as_str(),
                "request aggregator replaced by the configured one"
            );
        }
        wire.aggregator = self.config.aggregator.clone();

        let url = self.transport.endpoint(&["v1", "rtb", "request-ads"])?;
        let mut response: AdResponse = self
            .transport
            .post_json("request_ads", url, &wire, cancel)
            .await?;
        retain_requested_slots(request, &mut response);
        Ok(response)
    }

    /// Post a tracking event. Best-effort: failures are logged, never returned.
    pub async fn track_event(&self, event: &TrackingEvent) {
        self.track_event_inner(event, None).await
    }

    pub async fn track_event_with_cancel(&self, event: &TrackingEvent, cancel: &CancellationToken) {
        self.track_event_inner(event, Some(cancel)).await
    }

    /// Fire-and-forget variant: the event is sent on a background task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn_track_event(&self, event: TrackingEvent) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move { client.track_event(&event).await })
    }

    async fn track_event_inner(&self, event: &TrackingEvent, cancel: Option<&CancellationToken>) {
        if event.user_id.trim().is_empty() {
            warn!(
                event_type = event.event_type.as_str(),
                "tracking event without user_id dropped"
            );
            return;
        }

        let payload = TrackingPayload::new(event, &self.config.aggregator);
        if let Err(e) = self.post_tracking(&payload, cancel).await {
            warn!(
                event_type = event.event_type.as_str(),
                error = %e,
                "tracking event not delivered"
            );
        }
    }

    async fn post_tracking(
        &self,
        payload: &TrackingPayload<'_>,
        cancel: Option<&CancellationToken>,
    ) -> Result<()> {
        let url = self.transport.endpoint(&["v1", "events", "track"])?;
        self.transport
            .post_discard("track_event", url, payload, cancel)
            .await
    }

    pub async fn get_user_intent(&self, user_id: &str) -> Result<IntentResult> {
        self.get_user_intent_inner(user_id, None).await
    }

    pub async fn get_user_intent_with_cancel(
        &self,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> Result<IntentResult> {
        self.get_user_intent_inner(user_id, Some(cancel)).await
    }

    async fn get_user_intent_inner(
        &self,
        user_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<IntentResult> {
        require_user_id(user_id, "user_id")?;
        let url = self
            .transport
            .endpoint(&["v1", "intelligence", "predictive", "intent", user_id])?;
        self.transport.get_json("get_user_intent", url, cancel).await
    }

    /// Product recommendations for a user. `limit` must be positive and is
    /// clamped to [`MAX_RECOMMENDATIONS`](crate::client::MAX_RECOMMENDATIONS).
    pub async fn get_recommendations(&self, user_id: &str, limit: u32) -> Result<Vec<Recommendation>> {
        self.get_recommendations_inner(user_id, limit, None).await
    }

    pub async fn get_default_recommendations(&self, user_id: &str) -> Result<Vec<Recommendation>> {
        self.get_recommendations_inner(user_id, DEFAULT_RECOMMENDATION_LIMIT, None)
            .await
    }

    pub async fn get_recommendations_with_cancel(
        &self,
        user_id: &str,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<Recommendation>> {
        self.get_recommendations_inner(user_id, limit, Some(cancel))
            .await
    }

    async fn get_recommendations_inner(
        &self,
        user_id: &str,
        limit: u32,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<Recommendation>> {
        require_user_id(user_id, "user_id")?;
        let limit = recommendation_limit(limit)?;
        let mut url = self.transport.endpoint(&[
            "v1",
            "intelligence",
            "predictive",
            "recommendations",
            user_id,
        ])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        let body: RecommendationsBody = self
            .transport
            .get_json("get_recommendations", url, cancel)
            .await?;
        Ok(body.into_vec())
    }

    /// Campaigns visible to the configured aggregator.
    pub async fn list_campaigns(&self) -> Result<CampaignListResult> {
        self.list_campaigns_inner(None).await
    }

    pub async fn list_campaigns_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<CampaignListResult> {
        self.list_campaigns_inner(Some(cancel)).await
    }

    async fn list_campaigns_inner(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<CampaignListResult> {
        let mut url = self.transport.endpoint(&["v1", "campaigns", "list"])?;
        url.query_pairs_mut()
            .append_pair("aggregator", &self.config.aggregator);
        self.transport.get_json("list_campaigns", url, cancel).await
    }

    /// Reserved flag. Nothing reads it yet and no events are captured
    /// automatically.
    pub fn enable_auto_tracking(&mut self) {
        self.auto_tracking = true;
    }

    pub fn auto_tracking_enabled(&self) -> bool {
        self.auto_tracking
    }
}

impl std::fmt::Debug for AdClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdClient")
            .field("config", &self.config)
            .field("base_url", &self.base_url())
            .field("auto_tracking", &self.auto_tracking)
            .finish()
    }
}
