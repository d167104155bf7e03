//! Cart conversions and mutation user-error handling.

use crate::shopify::ShopifyError;
use crate::shopify::types::{
    Cart, CartCost, CartDiscountCode, CartLine, CartLineCost, CartMerchandise,
    CartMerchandiseProduct, CartUserError,
};

use super::super::queries::{CartLineNode, CartNode, UserErrorNode};
use super::{convert_image, convert_selected_options};

pub fn convert_cart(cart: CartNode) -> Cart {
    Cart {
        id: cart.id,
        checkout_url: cart.checkout_url,
        note: cart.note,
        total_quantity: cart.total_quantity,
        cost: CartCost {
            subtotal: cart.cost.subtotal_amount,
            total: cart.cost.total_amount,
        },
        discount_codes: cart
            .discount_codes
            .into_iter()
            .map(|d| CartDiscountCode {
                code: d.code,
                applicable: d.applicable,
            })
            .collect(),
        lines: cart.lines.nodes.into_iter().map(convert_cart_line).collect(),
        updated_at: cart.updated_at,
    }
}

fn convert_cart_line(line: CartLineNode) -> CartLine {
    let merchandise = line.merchandise;
    CartLine {
        id: line.id,
        quantity: line.quantity,
        merchandise: CartMerchandise {
            id: merchandise.id,
            title: merchandise.title,
            product: CartMerchandiseProduct {
                id: merchandise.product.id,
                handle: merchandise.product.handle,
                title: merchandise.product.title,
            },
            image: merchandise.image.map(convert_image),
            selected_options: convert_selected_options(merchandise.selected_options),
        },
        cost: CartLineCost {
            amount_per_quantity: line.cost.amount_per_quantity,
            total_amount: line.cost.total_amount,
        },
    }
}

fn convert_user_error(error: UserErrorNode) -> CartUserError {
    CartUserError {
        code: error.code,
        field: error.field,
        message: error.message,
    }
}

/// Collapse a mutation's user errors into one error, or `None` if there are none.
///
/// Customer mutations report bad credentials as `UNIDENTIFIED_CUSTOMER` and
/// duplicate registrations as `TAKEN`; those map to their own variants.
pub fn user_errors_to_error(errors: Vec<UserErrorNode>) -> Option<ShopifyError> {
    if errors.is_empty() {
        return None;
    }

    let errors: Vec<CartUserError> = errors.into_iter().map(convert_user_error).collect();
    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    let has_code = |code: &str| errors.iter().any(|e| e.code.as_deref() == Some(code));

    Some(if has_code("UNIDENTIFIED_CUSTOMER") {
        ShopifyError::Unauthorized(message)
    } else if has_code("TAKEN") || has_code("CUSTOMER_DISABLED") {
        ShopifyError::Conflict(message)
    } else {
        ShopifyError::UserError(message)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(code: Option<&str>, message: &str) -> UserErrorNode {
        UserErrorNode {
            code: code.map(str::to_string),
            field: None,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_no_user_errors() {
        assert!(user_errors_to_error(vec![]).is_none());
    }

    #[test]
    fn test_user_errors_joined() {
        let err = user_errors_to_error(vec![
            error(Some("INVALID"), "Merchandise does not exist"),
            error(None, "Quantity is invalid"),
        ]);
        assert!(matches!(
            err,
            Some(ShopifyError::UserError(ref m)) if m == "Merchandise does not exist; Quantity is invalid"
        ));
    }

    #[test]
    fn test_unidentified_customer_is_unauthorized() {
        let err = user_errors_to_error(vec![error(
            Some("UNIDENTIFIED_CUSTOMER"),
            "Unidentified customer",
        )]);
        assert!(matches!(err, Some(ShopifyError::Unauthorized(_))));
    }

    #[test]
    fn test_taken_is_conflict() {
        let err = user_errors_to_error(vec![error(Some("TAKEN"), "Email has already been taken")]);
        assert!(matches!(err, Some(ShopifyError::Conflict(_))));
    }
}
