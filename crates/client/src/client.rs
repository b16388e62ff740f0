//! The shared client instance and its request plumbing.

use std::future::Future;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use fieldserve_events::{DataEvent, Event, EventBus, InMemoryEventBus, Subscription, ViewKey};

use crate::concurrency::{MutationGate, MutationGuard, RequestTracker};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http;

/// Correlation header attached to every request.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Typed client over the backend's REST surface.
///
/// One instance serves the whole application. It owns the connection pool,
/// the duplicate-submission gate, the stale-fetch tracker, and the bus that
/// announces accepted mutations. Resource methods live in [`crate::api`];
/// everything here is shared plumbing.
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    bus: InMemoryEventBus<DataEvent>,
    tracker: RequestTracker,
    gate: MutationGate,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http,
            config,
            bus: InMemoryEventBus::new(),
            tracker: RequestTracker::new(),
            gate: MutationGate::new(),
        })
    }

    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Subscribe to mutation announcements. Consumers refetch the views
    /// named by [`fieldserve_events::invalidated_views`].
    pub fn events(&self) -> Subscription<DataEvent> {
        self.bus.subscribe()
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// Run a fetch under stale-response tracking. `Ok(None)` means a newer
    /// fetch for the same view started while this one was in flight and
    /// this response must not be applied.
    pub async fn fetch_view<T, Fut>(
        &self,
        key: ViewKey,
        fetch: impl FnOnce() -> Fut,
    ) -> ClientResult<Option<T>>
    where
        Fut: Future<Output = ClientResult<T>>,
    {
        let ticket = self.tracker.begin(key);
        let value = fetch().await?;
        if self.tracker.is_current(&ticket) {
            Ok(Some(value))
        } else {
            tracing::debug!(view = ?key, "discarding stale response");
            Ok(None)
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let request_id = Uuid::now_v7();
        tracing::debug!(%method, path, %request_id, "api request");
        self.http
            .request(method, self.url(path))
            .header(REQUEST_ID_HEADER, request_id.to_string())
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.request(reqwest::Method::GET, path)
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.request(reqwest::Method::POST, path)
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.request(reqwest::Method::PUT, path)
    }

    pub(crate) fn patch(&self, path: &str) -> RequestBuilder {
        self.request(reqwest::Method::PATCH, path)
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.request(reqwest::Method::DELETE, path)
    }

    /// Idempotent GET with a single retry when the connection failed before
    /// any response was seen. Mutations never retry.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.get_with_retry(path, None).await
    }

    pub(crate) async fn get_json_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        self.get_with_retry(path, Some(query)).await
    }

    async fn get_with_retry<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&[(&str, String)]>,
    ) -> ClientResult<T> {
        let build = || {
            let mut request = self.get(path);
            if let Some(query) = query {
                request = request.query(query);
            }
            request
        };

        match build().send().await {
            Ok(response) => http::decode(response).await,
            Err(error) if http::retryable(&error) => {
                tracing::debug!(path, error = %error, "retrying idempotent request");
                let response = build().send().await.map_err(http::network)?;
                http::decode(response).await
            }
            Err(error) => Err(http::network(error)),
        }
    }

    /// Send a prepared mutation request and decode the response body.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let response = request.send().await.map_err(http::network)?;
        http::decode(response).await
    }

    /// Send a prepared mutation request that answers with no body.
    pub(crate) async fn execute_empty(&self, request: RequestBuilder) -> ClientResult<()> {
        let response = request.send().await.map_err(http::network)?;
        http::expect_success(response).await
    }

    /// Claim the duplicate-submission slot for a mutation.
    pub(crate) fn begin_mutation(
        &self,
        operation: impl Into<String>,
    ) -> ClientResult<MutationGuard> {
        let operation = operation.into();
        self.gate
            .try_begin(operation.clone())
            .ok_or(ClientError::DuplicateSubmission(operation))
    }

    /// Announce an accepted mutation. The mutation itself already succeeded,
    /// so a failed publish is logged and swallowed; subscribers recover by
    /// refetching.
    pub(crate) fn publish(&self, event: DataEvent) {
        let event_type = event.event_type();
        if let Err(error) = self.bus.publish(event) {
            tracing::warn!(event = event_type, ?error, "event publish failed");
        } else {
            tracing::debug!(event = event_type, "mutation announced");
        }
    }
}
