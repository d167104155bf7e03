//! Product and collection conversions.

use crate::shopify::types::{
    Collection, CollectionConnection, PriceRange, Product, ProductConnection, ProductOption,
    ProductVariant,
};

use super::super::queries::{
    PagedNodes, ProductNode, VariantNode, get_collection_by_handle, get_collections,
};
use super::{convert_image, convert_page_info, convert_selected_options};

pub fn convert_product(product: ProductNode) -> Product {
    Product {
        id: product.id,
        handle: product.handle,
        title: product.title,
        description: product.description,
        available_for_sale: product.available_for_sale,
        vendor: product.vendor,
        product_type: product.product_type,
        tags: product.tags,
        price_range: PriceRange {
            min_variant_price: product.price_range.min_variant_price,
            max_variant_price: product.price_range.max_variant_price,
        },
        featured_image: product.featured_image.map(convert_image),
        images: product.images.nodes.into_iter().map(convert_image).collect(),
        options: product
            .options
            .into_iter()
            .map(|o| ProductOption {
                name: o.name,
                values: o.values,
            })
            .collect(),
        variants: product
            .variants
            .nodes
            .into_iter()
            .map(convert_variant)
            .collect(),
    }
}

fn convert_variant(variant: VariantNode) -> ProductVariant {
    ProductVariant {
        id: variant.id,
        title: variant.title,
        available_for_sale: variant.available_for_sale,
        sku: variant.sku,
        price: variant.price,
        compare_at_price: variant.compare_at_price,
        selected_options: convert_selected_options(variant.selected_options),
        image: variant.image.map(convert_image),
    }
}

pub fn convert_product_connection(connection: PagedNodes<ProductNode>) -> ProductConnection {
    ProductConnection {
        products: connection.nodes.into_iter().map(convert_product).collect(),
        page_info: convert_page_info(connection.page_info),
    }
}

pub fn convert_collection(collection: get_collection_by_handle::CollectionNode) -> Collection {
    Collection {
        id: collection.id,
        handle: collection.handle,
        title: collection.title,
        description: collection.description,
        image: collection.image.map(convert_image),
        products: collection
            .products
            .nodes
            .into_iter()
            .map(convert_product)
            .collect(),
        products_page_info: Some(convert_page_info(collection.products.page_info)),
    }
}

pub fn convert_collection_connection(
    connection: PagedNodes<get_collections::CollectionSummaryNode>,
) -> CollectionConnection {
    CollectionConnection {
        collections: connection
            .nodes
            .into_iter()
            .map(|c| Collection {
                id: c.id,
                handle: c.handle,
                title: c.title,
                description: c.description,
                image: c.image.map(convert_image),
                products: vec![],
                products_page_info: None,
            })
            .collect(),
        page_info: convert_page_info(connection.page_info),
    }
}
