//! Conversions from GraphQL wire nodes to domain types.

mod cart;
mod catalog;
mod customer;

pub use cart::{convert_cart, user_errors_to_error};
pub use catalog::{
    convert_collection, convert_collection_connection, convert_product,
    convert_product_connection,
};
pub use customer::{convert_address, convert_customer, convert_order};

use crate::shopify::types::{Image, PageInfo, SelectedOption};

use super::queries::{ImageNode, PageInfoNode, SelectedOptionNode};

fn convert_image(image: ImageNode) -> Image {
    Image {
        url: image.url,
        alt_text: image.alt_text,
        width: image.width,
        height: image.height,
    }
}

fn convert_selected_options(options: Vec<SelectedOptionNode>) -> Vec<SelectedOption> {
    options
        .into_iter()
        .map(|o| SelectedOption {
            name: o.name,
            value: o.value,
        })
        .collect()
}

fn convert_page_info(page_info: PageInfoNode) -> PageInfo {
    PageInfo {
        has_next_page: page_info.has_next_page,
        end_cursor: page_info.end_cursor,
    }
}
