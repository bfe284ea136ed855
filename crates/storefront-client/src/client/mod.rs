//! HTTP client for the Storefront GraphQL API.

mod cart;
mod catalog;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use storefront_core::AppConfig;

use crate::error::ClientError;
use crate::retry::retry_with_backoff;
use crate::types::{GraphQlRequest, GraphQlResponse};

/// Header carrying the public Storefront access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Transport settings shared by [`StorefrontClient`] and
/// [`crate::CartSubmitter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for transient errors.
    pub max_retries: u32,
    /// Base delay for exponential back-off: `backoff_base_ms * 2^(n-1)`.
    pub backoff_base_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "storefront/0.1 (headless)".to_owned(),
            max_retries: 3,
            backoff_base_ms: 500,
        }
    }
}

impl From<&AppConfig> for ClientOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

impl ClientOptions {
    pub(crate) fn build_http_client(&self, headers: HeaderMap) -> Result<Client, ClientError> {
        Ok(Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&self.user_agent)
            .default_headers(headers)
            .build()?)
    }
}

/// Client for one shop's Storefront GraphQL endpoint.
///
/// Transient errors (429, 5xx, network failures) are retried with jittered
/// exponential back-off. GraphQL `errors` are not retried.
pub struct StorefrontClient {
    client: Client,
    endpoint: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl StorefrontClient {
    /// Creates a client for the endpoint and credentials in `config`.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::with_endpoint`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_endpoint(
            &config.graphql_endpoint(),
            &config.api_token,
            &ClientOptions::from(config),
        )
    }

    /// Creates a client for an explicit GraphQL endpoint URL (tests point
    /// this at a mock server).
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidConfig`] if the token is not a valid header
    ///   value or the endpoint is not a URL.
    /// - [`ClientError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_endpoint(
        endpoint: &str,
        access_token: &str,
        options: &ClientOptions,
    ) -> Result<Self, ClientError> {
        reqwest::Url::parse(endpoint).map_err(|e| ClientError::InvalidConfig {
            reason: format!("endpoint \"{endpoint}\" is not a valid URL: {e}"),
        })?;

        let mut token =
            HeaderValue::from_str(access_token).map_err(|e| ClientError::InvalidConfig {
                reason: format!("access token is not a valid header value: {e}"),
            })?;
        token.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_TOKEN_HEADER, token);

        Ok(Self {
            client: options.build_http_client(headers)?,
            endpoint: endpoint.to_owned(),
            max_retries: options.max_retries,
            backoff_base_ms: options.backoff_base_ms,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one GraphQL query and decodes its `data`, retrying transient
    /// failures with back-off.
    ///
    /// When the response carries `errors` alongside `data`, the errors are
    /// logged and the data is returned.
    ///
    /// # Errors
    ///
    /// - [`ClientError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ClientError::UnexpectedStatus`]: any other non-2xx status (5xx retried).
    /// - [`ClientError::Http`]: network or TLS failure after all retries.
    /// - [`ClientError::Deserialize`]: the body is not the expected envelope.
    /// - [`ClientError::GraphQl`]: `errors` present and `data` absent.
    /// - [`ClientError::MissingData`]: neither `data` nor `errors`.
    pub async fn execute<V, T>(
        &self,
        operation: &str,
        query: &str,
        variables: &V,
    ) -> Result<T, ClientError>
    where
        V: Serialize + Sync,
        T: DeserializeOwned,
    {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.send_graphql(operation, query, variables)
        })
        .await
    }

    /// Sends one GraphQL mutation exactly once.
    ///
    /// Cart mutations are not idempotent, so a timeout or 5xx is returned to
    /// the caller instead of being replayed.
    ///
    /// # Errors
    ///
    /// Same variants as [`StorefrontClient::execute`], after a single attempt.
    pub async fn execute_mutation<V, T>(
        &self,
        operation: &str,
        query: &str,
        variables: &V,
    ) -> Result<T, ClientError>
    where
        V: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.send_graphql(operation, query, variables).await
    }

    async fn send_graphql<V, T>(
        &self,
        operation: &str,
        query: &str,
        variables: &V,
    ) -> Result<T, ClientError>
    where
        V: Serialize + Sync,
        T: DeserializeOwned,
    {
        let body = GraphQlRequest { query, variables };
        let endpoint = self.endpoint.as_str();
        let response = self.client.post(endpoint).json(&body).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ClientError::RateLimited {
                endpoint: endpoint.to_owned(),
                retry_after_secs,
            });
        }

        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: endpoint.to_owned(),
            });
        }

        let text = response.text().await?;
        let envelope: GraphQlResponse<T> =
            serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
                context: format!("{operation} response"),
                source: e,
            })?;

        let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
        match envelope.data {
            Some(data) => {
                if !messages.is_empty() {
                    tracing::warn!(
                        operation,
                        errors = ?messages,
                        "GraphQL response carried errors alongside data"
                    );
                }
                Ok(data)
            }
            None if !messages.is_empty() => Err(ClientError::GraphQl {
                operation: operation.to_owned(),
                messages,
            }),
            None => Err(ClientError::MissingData {
                operation: operation.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
