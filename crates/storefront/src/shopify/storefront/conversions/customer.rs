//! Customer, address and order conversions.

use tracing::warn;

use shopfront_core::Email;

use crate::shopify::types::{Customer, MailingAddress, Order, OrderLineItem, TrackingInfo};

use super::super::queries::{AddressNode, CustomerNode, get_customer_orders};
use super::convert_image;

pub fn convert_address(address: AddressNode) -> MailingAddress {
    MailingAddress {
        id: address.id,
        name: address.name,
        company: address.company,
        address1: address.address1,
        address2: address.address2,
        city: address.city,
        province_code: address.province_code,
        zip: address.zip,
        country: address.country,
        phone: address.phone,
    }
}

pub fn convert_customer(customer: CustomerNode) -> Customer {
    let email = customer.email.and_then(|raw| match Email::parse(&raw) {
        Ok(email) => Some(email),
        Err(e) => {
            warn!(customer_id = %customer.id, error = %e, "Customer has an unparseable email");
            None
        }
    });

    Customer {
        id: customer.id,
        email,
        first_name: customer.first_name,
        last_name: customer.last_name,
        phone: customer.phone,
        accepts_marketing: customer.accepts_marketing,
        default_address: customer.default_address.map(convert_address),
    }
}

pub fn convert_order(order: get_customer_orders::OrderNode) -> Order {
    let tracking = order
        .successful_fulfillments
        .unwrap_or_default()
        .into_iter()
        .flat_map(|fulfillment| {
            let company = fulfillment.tracking_company;
            fulfillment
                .tracking_info
                .into_iter()
                .map(move |info| TrackingInfo {
                    company: company.clone(),
                    number: info.number,
                    url: info.url,
                })
        })
        .collect();

    Order {
        id: order.id,
        name: order.name,
        order_number: order.order_number,
        processed_at: order.processed_at,
        financial_status: order.financial_status,
        fulfillment_status: order.fulfillment_status,
        subtotal: order.subtotal_price,
        total: order.total_price,
        shipping_address: order.shipping_address.map(convert_address),
        line_items: order
            .line_items
            .nodes
            .into_iter()
            .map(|item| {
                let (variant_id, variant_title, image) = match item.variant {
                    Some(v) => (Some(v.id), Some(v.title), v.image.map(convert_image)),
                    None => (None, None, None),
                };
                OrderLineItem {
                    title: item.title,
                    quantity: item.quantity,
                    variant_id,
                    variant_title,
                    original_total: item.original_total_price,
                    image,
                }
            })
            .collect(),
        tracking,
        status_url: order.status_url,
    }
}
