//! HTTP client for the checkout backend's delivery endpoints.
//!
//! Wraps `reqwest` with bearer-token handling, endpoint resolution against a
//! base URL, and typed response deserialization. List endpoints check the
//! `"success"` flag of the envelope and surface failures as
//! [`ClientError::Unsuccessful`].

use std::time::Duration;

use relaypick_core::{AppConfig, DeliveryMode, Location};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::types::{ApiEnvelope, FeeRequest, FeeResponse};

/// Paths of the endpoints used by the delivery flow, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub stores: String,
    pub relay_points: String,
    pub delivery_modes: String,
    pub fee: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            stores: "api/stores".to_owned(),
            relay_points: "api/relay-points".to_owned(),
            delivery_modes: "api/delivery-modes".to_owned(),
            fee: "api/delivery-fees/calculate".to_owned(),
        }
    }
}

impl Endpoints {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            stores: config.stores_path.clone(),
            relay_points: config.relay_points_path.clone(),
            delivery_modes: config.delivery_modes_path.clone(),
            fee: config.fee_path.clone(),
        }
    }
}

/// Client for the delivery endpoints of the checkout backend.
///
/// Use [`DeliveryClient::from_app_config`] in the binary or
/// [`DeliveryClient::with_base_url`] to point at a mock server in tests.
pub struct DeliveryClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    endpoints: Endpoints,
}

impl std::fmt::Debug for DeliveryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl DeliveryClient {
    /// Builds a client from the loaded application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidUrl`] if the base URL
    /// does not parse.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ClientError> {
        Ok(Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.auth_token.as_deref(),
        )?
        .with_endpoints(Endpoints::from_app_config(config)))
    }

    /// Creates a client with a custom base URL and the default endpoint paths.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidUrl`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        token: Option<&str>,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so `Url::join` appends endpoint paths
        // instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            token: token.map(str::to_owned),
            endpoints: Endpoints::default(),
        })
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Fetches the stores available for in-store pickup.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Status`] on a non-2xx status.
    /// - [`ClientError::Unsuccessful`] if the envelope reports failure.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body does not match the expected shape.
    pub async fn list_stores(&self) -> Result<Vec<Location>, ClientError> {
        self.get_list(&self.endpoints.stores, "stores").await
    }

    /// Fetches the relay points.
    ///
    /// # Errors
    ///
    /// Same as [`DeliveryClient::list_stores`].
    pub async fn list_relay_points(&self) -> Result<Vec<Location>, ClientError> {
        self.get_list(&self.endpoints.relay_points, "relay points")
            .await
    }

    /// Fetches the delivery modes offered at checkout.
    ///
    /// # Errors
    ///
    /// Same as [`DeliveryClient::list_stores`].
    pub async fn list_delivery_modes(&self) -> Result<Vec<DeliveryMode>, ClientError> {
        self.get_list(&self.endpoints.delivery_modes, "delivery modes")
            .await
    }

    /// Submits one fee calculation. No retry happens here; see
    /// [`DeliveryClient::quote_fee`] for the store fallback.
    ///
    /// # Errors
    ///
    /// - [`ClientError::MissingToken`] if no token is configured; nothing is sent.
    /// - [`ClientError::Status`] on a non-2xx status.
    /// - [`ClientError::Http`] on network failure.
    ///
    /// A 2xx body that is empty or not a fee object yields a response with no
    /// fee.
    pub async fn calculate_fee(&self, request: &FeeRequest) -> Result<FeeResponse, ClientError> {
        if self.token.is_none() {
            return Err(ClientError::MissingToken);
        }
        let url = self.endpoint_url(&self.endpoints.fee)?;
        tracing::debug!(
            url = %url,
            store_id = ?request.store_id,
            mode = %request.mode_livraison_id,
            "requesting delivery fee"
        );
        let response = self
            .authorized(self.client.post(url.clone()))
            .json(request)
            .send()
            .await?;
        let body = Self::success_body(response, &url).await?;
        // A 2xx without a readable fee object still succeeded; the fee is unknown.
        Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
            tracing::debug!(
                store_id = ?request.store_id,
                error = %e,
                "fee response body unreadable, treating fee as absent"
            );
            FeeResponse::default()
        }))
    }

    /// Resolves `path` against the base URL.
    pub(crate) fn endpoint_url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(reqwest::header::ACCEPT, "application/json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        context: &str,
    ) -> Result<Vec<T>, ClientError> {
        let url = self.endpoint_url(path)?;
        tracing::debug!(url = %url, "fetching {context}");
        let response = self.authorized(self.client.get(url.clone())).send().await?;
        let body = Self::success_body(response, &url).await?;
        let envelope: ApiEnvelope<Vec<T>> =
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: context.to_owned(),
                source: e,
            })?;
        if !envelope.success {
            return Err(ClientError::Unsuccessful(context.to_owned()));
        }
        Ok(envelope.data)
    }

    /// Asserts a 2xx status and returns the body text.
    async fn success_body(response: reqwest::Response, url: &Url) -> Result<String, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
