//! Form-encoded submissions to the storefront's `/cart` endpoint.
//!
//! This is the browser-side half of the cart flow: the server executes the
//! matching GraphQL mutation and answers with the resulting snapshot. The
//! cart id travels in the `cart` cookie.

use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::Client;
use serde::Deserialize;
use storefront_core::{CartMutation, CartPlan, CartSnapshot};

use crate::client::ClientOptions;
use crate::error::ClientError;
use crate::retry::retry_with_backoff;

/// Name of the cookie holding the cart id.
pub const CART_COOKIE: &str = "cart";

#[derive(Deserialize)]
struct Envelope {
    data: CartSnapshot,
}

/// Submits cart actions to a storefront server.
pub struct CartSubmitter {
    client: Client,
    endpoint: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl CartSubmitter {
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] if `endpoint` is not a URL, or
    /// [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(endpoint: &str, options: &ClientOptions) -> Result<Self, ClientError> {
        reqwest::Url::parse(endpoint).map_err(|e| ClientError::InvalidConfig {
            reason: format!("cart endpoint \"{endpoint}\" is not a valid URL: {e}"),
        })?;
        Ok(Self {
            client: options.build_http_client(HeaderMap::new())?,
            endpoint: endpoint.to_owned(),
            max_retries: options.max_retries,
            backoff_base_ms: options.backoff_base_ms,
        })
    }

    fn cookie(cart_id: Option<&str>) -> Result<Option<HeaderValue>, ClientError> {
        cart_id
            .map(|id| {
                HeaderValue::from_str(&format!("{CART_COOKIE}={id}")).map_err(|e| {
                    ClientError::InvalidConfig {
                        reason: format!("cart id is not a valid cookie value: {e}"),
                    }
                })
            })
            .transpose()
    }

    async fn decode(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<CartSnapshot, ClientError> {
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited {
                endpoint: self.endpoint.clone(),
                retry_after_secs: 1,
            });
        }
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }
        let text = response.text().await?;
        let envelope: Envelope =
            serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
                context: context.to_owned(),
                source: e,
            })?;
        Ok(envelope.data)
    }

    /// Posts one action with its `inputs` JSON and returns the updated cart.
    ///
    /// The POST is sent once; a failed submission is returned to the caller
    /// and never replayed.
    ///
    /// # Errors
    ///
    /// Transport errors, non-2xx statuses, or an unexpected response body.
    pub async fn submit(
        &self,
        mutation: &CartMutation,
        cart_id: Option<&str>,
    ) -> Result<CartSnapshot, ClientError> {
        let action = mutation.action();
        let inputs = mutation.inputs_json();
        let form: &[(&str, &str)] = &[("action", action.as_str()), ("inputs", inputs.as_str())];

        let mut request = self.client.post(&self.endpoint).form(form);
        if let Some(cookie) = Self::cookie(cart_id)? {
            request = request.header(COOKIE, cookie);
        }
        let response = request.send().await?;
        self.decode(response, &format!("{action} response")).await
    }

    /// Submits every mutation in `plan`, adds first, threading the cart id
    /// from each response into the next request.
    ///
    /// Returns the last snapshot, or `None` when the plan is empty.
    ///
    /// # Errors
    ///
    /// Stops at the first failed submission.
    pub async fn submit_plan(
        &self,
        plan: CartPlan,
        cart_id: Option<&str>,
    ) -> Result<Option<CartSnapshot>, ClientError> {
        let mut current_id = cart_id.map(str::to_owned);
        let mut last = None;
        for mutation in plan.into_mutations() {
            let snapshot = self.submit(&mutation, current_id.as_deref()).await?;
            tracing::info!(
                action = %mutation.action(),
                cart_id = %snapshot.id,
                total_quantity = snapshot.total_quantity,
                "cart updated"
            );
            current_id = Some(snapshot.id.clone());
            last = Some(snapshot);
        }
        Ok(last)
    }

    /// Fetches the current snapshot of `cart_id`.
    ///
    /// # Errors
    ///
    /// Transport errors, non-2xx statuses (404 for unknown carts), or an
    /// unexpected response body.
    pub async fn fetch(&self, cart_id: &str) -> Result<CartSnapshot, ClientError> {
        let cookie = Self::cookie(Some(cart_id))?;
        let cookie = cookie.as_ref();
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let mut request = self.client.get(&self.endpoint);
            if let Some(cookie) = cookie {
                request = request.header(COOKIE, cookie.clone());
            }
            let response = request.send().await?;
            self.decode(response, "cart response").await
        })
        .await
    }
}
