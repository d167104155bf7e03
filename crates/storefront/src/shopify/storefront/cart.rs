//! Cart operations over the Storefront API. Never cached.

use async_trait::async_trait;
use tracing::instrument;

use shopfront_core::{CartId, CartLineId};

use crate::shopify::api::CartApi;
use crate::shopify::types::{Cart, CartLineInput, CartLineUpdateInput};
use crate::shopify::ShopifyError;

use super::StorefrontClient;
use super::conversions::{convert_cart, user_errors_to_error};
use super::queries::{
    CartDiscountCodesUpdate, CartLinesAdd, CartLinesRemove, CartLinesUpdate, CartMutationPayload,
    CartNoteUpdate, CreateCart, GetCart, cart_discount_codes_update, cart_lines_add,
    cart_lines_remove, cart_lines_update, cart_note_update, create_cart, get_cart,
};

/// Check a cart mutation payload for user errors and a returned cart.
fn check_payload(
    payload: Option<CartMutationPayload>,
    action: &str,
) -> Result<(), ShopifyError> {
    let payload = payload.ok_or_else(|| ShopifyError::message(format!("Failed to {action}")))?;

    if let Some(err) = user_errors_to_error(payload.user_errors) {
        return Err(err);
    }

    if payload.cart.is_none() {
        return Err(ShopifyError::message(format!("Failed to {action}")));
    }

    Ok(())
}

#[async_trait]
impl CartApi for StorefrontClient {
    #[instrument(skip(self, buyer_access_token), fields(customer = buyer_access_token.is_some()))]
    async fn create_cart(&self, buyer_access_token: Option<&str>) -> Result<Cart, ShopifyError> {
        let variables = create_cart::Variables {
            input: create_cart::CartInput {
                buyer_identity: buyer_access_token.map(|token| create_cart::BuyerIdentityInput {
                    customer_access_token: token.to_string(),
                }),
            },
        };

        let data = self.execute::<CreateCart>(variables).await?;
        let payload = data
            .cart_create
            .ok_or_else(|| ShopifyError::message("Failed to create cart"))?;

        if let Some(err) = user_errors_to_error(payload.user_errors) {
            return Err(err);
        }

        payload
            .cart
            .map(convert_cart)
            .ok_or_else(|| ShopifyError::message("Failed to create cart"))
    }

    #[instrument(skip(self), fields(cart_id = %cart_id))]
    async fn fetch_cart(&self, cart_id: &CartId) -> Result<Option<Cart>, ShopifyError> {
        let data = self
            .execute::<GetCart>(get_cart::Variables {
                cart_id: cart_id.clone(),
            })
            .await?;

        Ok(data.cart.map(convert_cart))
    }

    #[instrument(skip(self, lines), fields(cart_id = %cart_id, lines = lines.len()))]
    async fn add_lines(
        &self,
        cart_id: &CartId,
        lines: &[CartLineInput],
    ) -> Result<(), ShopifyError> {
        let data = self
            .execute::<CartLinesAdd>(cart_lines_add::Variables {
                cart_id: cart_id.clone(),
                lines: lines.to_vec(),
            })
            .await?;

        check_payload(data.cart_lines_add, "add to cart")
    }

    #[instrument(skip(self, lines), fields(cart_id = %cart_id, lines = lines.len()))]
    async fn update_lines(
        &self,
        cart_id: &CartId,
        lines: &[CartLineUpdateInput],
    ) -> Result<(), ShopifyError> {
        let data = self
            .execute::<CartLinesUpdate>(cart_lines_update::Variables {
                cart_id: cart_id.clone(),
                lines: lines.to_vec(),
            })
            .await?;

        check_payload(data.cart_lines_update, "update cart")
    }

    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id, lines = line_ids.len()))]
    async fn remove_lines(
        &self,
        cart_id: &CartId,
        line_ids: &[CartLineId],
    ) -> Result<(), ShopifyError> {
        let data = self
            .execute::<CartLinesRemove>(cart_lines_remove::Variables {
                cart_id: cart_id.clone(),
                line_ids: line_ids.to_vec(),
            })
            .await?;

        check_payload(data.cart_lines_remove, "remove from cart")
    }

    #[instrument(skip(self), fields(cart_id = %cart_id))]
    async fn update_discount_codes(
        &self,
        cart_id: &CartId,
        codes: &[String],
    ) -> Result<(), ShopifyError> {
        let data = self
            .execute::<CartDiscountCodesUpdate>(cart_discount_codes_update::Variables {
                cart_id: cart_id.clone(),
                discount_codes: codes.to_vec(),
            })
            .await?;

        check_payload(data.cart_discount_codes_update, "update discount codes")
    }

    #[instrument(skip(self, note), fields(cart_id = %cart_id))]
    async fn update_note(&self, cart_id: &CartId, note: &str) -> Result<(), ShopifyError> {
        let data = self
            .execute::<CartNoteUpdate>(cart_note_update::Variables {
                cart_id: cart_id.clone(),
                note: note.to_string(),
            })
            .await?;

        check_payload(data.cart_note_update, "update cart note")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shopify::storefront::queries::{CartRef, UserErrorNode};

    #[test]
    fn test_missing_payload_fails() {
        let err = check_payload(None, "update cart").unwrap_err();
        assert_eq!(err.to_string(), "GraphQL errors: Failed to update cart");
    }

    #[test]
    fn test_payload_user_errors_fail() {
        let payload = CartMutationPayload {
            cart: Some(CartRef {
                id: CartId::new("gid://shopify/Cart/1"),
            }),
            user_errors: vec![UserErrorNode {
                code: Some("INVALID".to_string()),
                field: Some(vec!["lines".to_string()]),
                message: "The merchandise does not exist".to_string(),
            }],
        };
        let err = check_payload(Some(payload), "add to cart").unwrap_err();
        assert!(matches!(err, ShopifyError::UserError(_)));
    }

    #[test]
    fn test_payload_with_cart_succeeds() {
        let payload = CartMutationPayload {
            cart: Some(CartRef {
                id: CartId::new("gid://shopify/Cart/1"),
            }),
            user_errors: vec![],
        };
        assert!(check_payload(Some(payload), "add to cart").is_ok());
    }
}
