use crate::config::AdClientConfig;
use crate::error::RequestFailure;
use crate::{Error, ErrorContext, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Proxy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::env;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const AGGREGATOR_HEADER: &str = "x-aggregator";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Owns the HTTP connection pool of one client and stamps every call with
/// the configured credentials.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &AdClientConfig) -> Result<Self> {
        let base_url = config.parsed_base_url()?;
        let timeout = Duration::from_millis(config.timeout_ms);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut api_key = header_value("config.api_key", &config.api_key)?;
        api_key.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);
        headers.insert(
            HeaderName::from_static(AGGREGATOR_HEADER),
            header_value("config.aggregator", &config.aggregator)?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("patternos-sdk/", env!("CARGO_PKG_VERSION"))),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .pool_max_idle_per_host(
                env::var("PATTERNOS_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(16),
            )
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Ok(proxy_url) = env::var("PATTERNOS_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder.build().map_err(|e| {
            Error::configuration_with_context(
                format!("failed to create HTTP client: {}", e),
                ErrorContext::new().with_source("http_transport"),
            )
        })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::configuration_with_context(
                    format!("base URL '{}' cannot carry a path", self.base_url),
                    ErrorContext::new()
                        .with_field_path("config.api_url")
                        .with_source("http_transport"),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: Url,
        cancel: Option<&CancellationToken>,
    ) -> Result<T> {
        let request = self.client.get(url);
        self.send_json(operation, request, cancel).await
    }

    pub async fn post_json<B, T>(
        &self,
        operation: &'static str,
        url: Url,
        body: &B,
        cancel: Option<&CancellationToken>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(url).json(body);
        self.send_json(operation, request, cancel).await
    }

    /// POST and ignore whatever the service answers on success.
    pub async fn post_discard<B: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        url: Url,
        body: &B,
        cancel: Option<&CancellationToken>,
    ) -> Result<()> {
        let request_id = Uuid::new_v4().to_string();
        let request = self.client.post(url).json(body);
        self.send(operation, &request_id, request, cancel).await?;
        Ok(())
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
        cancel: Option<&CancellationToken>,
    ) -> Result<T> {
        let request_id = Uuid::new_v4().to_string();
        let body = self.send(operation, &request_id, request, cancel).await?;
        serde_json::from_str(&body).map_err(|e| {
            info!(
                operation,
                request_id = request_id.as_str(),
                error = %e,
                "patternos response body could not be decoded"
            );
            Error::request_failed(operation, request_id, RequestFailure::Decode(e))
        })
    }

    /// Single attempt, bounded by the configured timeout and the optional
    /// cancellation token. Dropping the in-flight future aborts the call.
    async fn send(
        &self,
        operation: &'static str,
        request_id: &str,
        request: reqwest::RequestBuilder,
        cancel: Option<&CancellationToken>,
    ) -> Result<String> {
        let request = request.header(REQUEST_ID_HEADER, request_id);
        let start = Instant::now();
        debug!(operation, request_id, "patternos request");

        let exchange = async {
            let resp = request.send().await.map_err(RequestFailure::Transport)?;
            let status = resp.status();
            let body = resp.text().await.map_err(RequestFailure::Transport)?;
            if !status.is_success() {
                return Err(RequestFailure::Status {
                    status: status.as_u16(),
                    body,
                });
            }
            Ok::<String, RequestFailure>(body)
        };
        let bounded = tokio::time::timeout(self.timeout, exchange);

        let outcome = match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(RequestFailure::Cancelled),
                res = bounded => res.unwrap_or_else(|_| Err(self.timeout_failure())),
            },
            None => bounded
                .await
                .unwrap_or_else(|_| Err(self.timeout_failure())),
        };

        outcome.map_err(|failure| {
            let status = match &failure {
                RequestFailure::Status { status, .. } => Some(*status),
                _ => None,
            };
            info!(
                operation,
                request_id,
                http_status = status,
                failure_class = failure.class().name(),
                duration_ms = start.elapsed().as_millis() as u64,
                "patternos request failed"
            );
            Error::request_failed(operation, request_id, failure)
        })
    }

    fn timeout_failure(&self) -> RequestFailure {
        RequestFailure::Timeout {
            timeout_ms: self.timeout.as_millis() as u64,
        }
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        Error::configuration_with_context(
            "value cannot be sent as an HTTP header",
            ErrorContext::new()
                .with_field_path(field)
                .with_source("http_transport"),
        )
    })
}
