//! Cart query and mutations.

use serde_json::json;
use storefront_core::{CartLineAdd, CartLineUpdate, CartMutation, CartSnapshot};

use super::StorefrontClient;
use crate::error::ClientError;
use crate::normalize::normalize_cart;
use crate::queries::{
    CART_CREATE_MUTATION, CART_LINES_ADD_MUTATION, CART_LINES_UPDATE_MUTATION, CART_QUERY,
};
use crate::types::{
    CartCreateData, CartData, CartLinesAddData, CartLinesUpdateData, CartMutationPayload,
};

fn unwrap_payload(
    operation: &str,
    payload: Option<CartMutationPayload>,
) -> Result<CartSnapshot, ClientError> {
    let payload = payload.ok_or_else(|| ClientError::MissingData {
        operation: operation.to_owned(),
    })?;
    if !payload.user_errors.is_empty() {
        return Err(ClientError::UserErrors {
            operation: operation.to_owned(),
            messages: payload
                .user_errors
                .into_iter()
                .map(|e| match e.field {
                    Some(field) if !field.is_empty() => {
                        format!("{}: {}", field.join("."), e.message)
                    }
                    _ => e.message,
                })
                .collect(),
        });
    }
    let cart = payload.cart.ok_or_else(|| ClientError::MissingData {
        operation: operation.to_owned(),
    })?;
    normalize_cart(cart)
}

impl StorefrontClient {
    /// Loads a cart snapshot. Returns `None` for unknown or expired carts.
    ///
    /// # Errors
    ///
    /// Any transport error from [`StorefrontClient::execute`].
    pub async fn cart(&self, cart_id: &str) -> Result<Option<CartSnapshot>, ClientError> {
        let data: CartData = self
            .execute("cart", CART_QUERY, &json!({ "cartId": cart_id }))
            .await?;
        data.cart.map(normalize_cart).transpose()
    }

    /// Creates a cart holding `lines`.
    ///
    /// # Errors
    ///
    /// [`ClientError::UserErrors`] when the platform rejects the lines.
    pub async fn cart_create(&self, lines: &[CartLineAdd]) -> Result<CartSnapshot, ClientError> {
        let data: CartCreateData = self
            .execute_mutation(
                "cartCreate",
                CART_CREATE_MUTATION,
                &json!({ "input": { "lines": lines } }),
            )
            .await?;
        unwrap_payload("cartCreate", data.cart_create)
    }

    /// # Errors
    ///
    /// [`ClientError::UserErrors`] when the platform rejects the lines.
    pub async fn cart_lines_add(
        &self,
        cart_id: &str,
        lines: &[CartLineAdd],
    ) -> Result<CartSnapshot, ClientError> {
        let data: CartLinesAddData = self
            .execute_mutation(
                "cartLinesAdd",
                CART_LINES_ADD_MUTATION,
                &json!({ "cartId": cart_id, "lines": lines }),
            )
            .await?;
        unwrap_payload("cartLinesAdd", data.cart_lines_add)
    }

    /// Updates existing lines by line id.
    ///
    /// # Errors
    ///
    /// [`ClientError::UserErrors`] when the platform rejects the lines.
    pub async fn cart_lines_update(
        &self,
        cart_id: &str,
        lines: &[CartLineUpdate],
    ) -> Result<CartSnapshot, ClientError> {
        let data: CartLinesUpdateData = self
            .execute_mutation(
                "cartLinesUpdate",
                CART_LINES_UPDATE_MUTATION,
                &json!({ "cartId": cart_id, "lines": lines }),
            )
            .await?;
        unwrap_payload("cartLinesUpdate", data.cart_lines_update)
    }

    /// Runs a cart form action against `cart_id`.
    ///
    /// `LinesAdd` without a cart creates one; `LinesUpdate` without a cart
    /// fails with [`ClientError::NoCart`].
    ///
    /// # Errors
    ///
    /// See the individual mutation methods.
    pub async fn apply_cart_mutation(
        &self,
        cart_id: Option<&str>,
        mutation: &CartMutation,
    ) -> Result<CartSnapshot, ClientError> {
        match (mutation, cart_id) {
            (CartMutation::LinesAdd(lines), Some(id)) => self.cart_lines_add(id, lines).await,
            (CartMutation::LinesAdd(lines), None) => {
                tracing::info!(lines = lines.len(), "creating cart");
                self.cart_create(lines).await
            }
            (CartMutation::LinesUpdate(lines), Some(id)) => {
                self.cart_lines_update(id, lines).await
            }
            (CartMutation::LinesUpdate(_), None) => Err(ClientError::NoCart {
                action: mutation.action().to_string(),
            }),
        }
    }
}
