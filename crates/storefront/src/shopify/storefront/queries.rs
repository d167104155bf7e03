//! GraphQL operations for the Shopify Storefront API.
//!
//! Each operation is a unit struct implementing [`GraphQLQuery`] with a
//! sibling module holding its `Variables` and `ResponseData`. Documents are
//! assembled from shared fragments at compile time; the node types the
//! fragments select are defined once and reused by every operation.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

use shopfront_core::{
    AddressId, CartId, CartLineId, CollectionId, CustomerId, FinancialStatus, FulfillmentStatus,
    OrderId, Price, ProductId, VariantId,
};

// =============================================================================
// Fragments
// =============================================================================

macro_rules! money_fragment {
    () => {
        "fragment MoneyFields on MoneyV2 { amount currencyCode }\n"
    };
}

macro_rules! image_fragment {
    () => {
        "fragment ImageFields on Image { url altText width height }\n"
    };
}

macro_rules! product_fragment {
    () => {
        concat!(
            "fragment ProductFields on Product {
              id handle title description availableForSale vendor productType tags
              priceRange {
                minVariantPrice { ...MoneyFields }
                maxVariantPrice { ...MoneyFields }
              }
              featuredImage { ...ImageFields }
              images(first: 10) { nodes { ...ImageFields } }
              options { name values }
              variants(first: 50) {
                nodes {
                  id title availableForSale sku
                  price { ...MoneyFields }
                  compareAtPrice { ...MoneyFields }
                  selectedOptions { name value }
                  image { ...ImageFields }
                }
              }
            }\n",
            money_fragment!(),
            image_fragment!(),
        )
    };
}

macro_rules! cart_fragment {
    () => {
        concat!(
            "fragment CartFields on Cart {
              id checkoutUrl note totalQuantity updatedAt
              cost {
                subtotalAmount { ...MoneyFields }
                totalAmount { ...MoneyFields }
              }
              discountCodes { code applicable }
              lines(first: 100) {
                nodes {
                  id quantity
                  cost {
                    amountPerQuantity { ...MoneyFields }
                    totalAmount { ...MoneyFields }
                  }
                  merchandise {
                    ... on ProductVariant {
                      id title
                      image { ...ImageFields }
                      selectedOptions { name value }
                      product { id handle title }
                    }
                  }
                }
              }
            }\n",
            money_fragment!(),
            image_fragment!(),
        )
    };
}

macro_rules! address_fragment {
    () => {
        "fragment AddressFields on MailingAddress {
          id name company address1 address2 city provinceCode zip country phone
        }\n"
    };
}

macro_rules! customer_fragment {
    () => {
        concat!(
            "fragment CustomerFields on Customer {
              id email firstName lastName phone acceptsMarketing
              defaultAddress { ...AddressFields }
            }\n",
            address_fragment!(),
        )
    };
}

/// Implements [`GraphQLQuery`] for an operation whose name matches its struct.
macro_rules! storefront_operation {
    ($operation:ident, $module:ident, $document:expr) => {
        pub struct $operation;

        impl GraphQLQuery for $operation {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $document,
                    operation_name: stringify!($operation),
                }
            }
        }
    };
}

// =============================================================================
// Shared Nodes
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nodes<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoNode {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedNodes<T> {
    pub nodes: Vec<T>,
    pub page_info: PageInfoNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedOptionNode {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeNode {
    pub min_variant_price: Price,
    pub max_variant_price: Price,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductOptionNode {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: VariantId,
    pub title: String,
    pub available_for_sale: bool,
    pub sku: Option<String>,
    pub price: Price,
    pub compare_at_price: Option<Price>,
    pub selected_options: Vec<SelectedOptionNode>,
    pub image: Option<ImageNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub available_for_sale: bool,
    pub vendor: String,
    pub product_type: String,
    pub tags: Vec<String>,
    pub price_range: PriceRangeNode,
    pub featured_image: Option<ImageNode>,
    pub images: Nodes<ImageNode>,
    pub options: Vec<ProductOptionNode>,
    pub variants: Nodes<VariantNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCostNode {
    pub subtotal_amount: Price,
    pub total_amount: Price,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartDiscountCodeNode {
    pub code: String,
    pub applicable: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCostNode {
    pub amount_per_quantity: Price,
    pub total_amount: Price,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MerchandiseProductNode {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseNode {
    pub id: VariantId,
    pub title: String,
    pub image: Option<ImageNode>,
    pub selected_options: Vec<SelectedOptionNode>,
    pub product: MerchandiseProductNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartLineNode {
    pub id: CartLineId,
    pub quantity: i64,
    pub cost: CartLineCostNode,
    pub merchandise: MerchandiseNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartNode {
    pub id: CartId,
    pub checkout_url: String,
    pub note: Option<String>,
    pub total_quantity: i64,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub cost: CartCostNode,
    pub discount_codes: Vec<CartDiscountCodeNode>,
    pub lines: Nodes<CartLineNode>,
}

/// Cart ID echoed back by cart mutations.
#[derive(Debug, Clone, Deserialize)]
pub struct CartRef {
    pub id: CartId,
}

/// `userErrors` / `customerUserErrors` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct UserErrorNode {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    pub cart: Option<CartRef>,
    pub user_errors: Vec<UserErrorNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressNode {
    pub id: AddressId,
    pub name: Option<String>,
    pub company: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub province_code: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerNode {
    pub id: CustomerId,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub accepts_marketing: bool,
    pub default_address: Option<AddressNode>,
}

// =============================================================================
// Catalog Operations
// =============================================================================

storefront_operation!(
    GetProducts,
    get_products,
    concat!(
        "query GetProducts($first: Int!, $after: String, $query: String, $sortKey: ProductSortKeys, $reverse: Boolean) {
          products(first: $first, after: $after, query: $query, sortKey: $sortKey, reverse: $reverse) {
            nodes { ...ProductFields }
            pageInfo { hasNextPage endCursor }
          }
        }\n",
        product_fragment!(),
    )
);

pub mod get_products {
    use super::{Deserialize, PagedNodes, ProductNode, Serialize};
    use crate::shopify::types::ProductSortKey;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub first: i64,
        pub after: Option<String>,
        pub query: Option<String>,
        pub sort_key: Option<ProductSortKey>,
        pub reverse: Option<bool>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: PagedNodes<ProductNode>,
    }
}

storefront_operation!(
    GetProductByHandle,
    get_product_by_handle,
    concat!(
        "query GetProductByHandle($handle: String!) {
          product(handle: $handle) { ...ProductFields }
        }\n",
        product_fragment!(),
    )
);

pub mod get_product_by_handle {
    use super::{Deserialize, ProductNode, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ProductNode>,
    }
}

storefront_operation!(
    GetProductRecommendations,
    get_product_recommendations,
    concat!(
        "query GetProductRecommendations($productId: ID!) {
          productRecommendations(productId: $productId) { ...ProductFields }
        }\n",
        product_fragment!(),
    )
);

pub mod get_product_recommendations {
    use super::{Deserialize, ProductId, ProductNode, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: ProductId,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_recommendations: Option<Vec<ProductNode>>,
    }
}

storefront_operation!(
    GetCollections,
    get_collections,
    concat!(
        "query GetCollections($first: Int!, $after: String) {
          collections(first: $first, after: $after) {
            nodes { id handle title description image { ...ImageFields } }
            pageInfo { hasNextPage endCursor }
          }
        }\n",
        image_fragment!(),
    )
);

pub mod get_collections {
    use super::{CollectionId, Deserialize, ImageNode, PagedNodes, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub after: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CollectionSummaryNode {
        pub id: CollectionId,
        pub handle: String,
        pub title: String,
        pub description: String,
        pub image: Option<ImageNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collections: PagedNodes<CollectionSummaryNode>,
    }
}

storefront_operation!(
    GetCollectionByHandle,
    get_collection_by_handle,
    concat!(
        "query GetCollectionByHandle($handle: String!, $first: Int!, $after: String) {
          collection(handle: $handle) {
            id handle title description
            image { ...ImageFields }
            products(first: $first, after: $after) {
              nodes { ...ProductFields }
              pageInfo { hasNextPage endCursor }
            }
          }
        }\n",
        product_fragment!(),
    )
);

pub mod get_collection_by_handle {
    use super::{CollectionId, Deserialize, ImageNode, PagedNodes, ProductNode, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
        pub first: i64,
        pub after: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CollectionNode {
        pub id: CollectionId,
        pub handle: String,
        pub title: String,
        pub description: String,
        pub image: Option<ImageNode>,
        pub products: PagedNodes<ProductNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collection: Option<CollectionNode>,
    }
}

// =============================================================================
// Cart Operations
// =============================================================================

storefront_operation!(
    CreateCart,
    create_cart,
    concat!(
        "mutation CreateCart($input: CartInput!) {
          cartCreate(input: $input) {
            cart { ...CartFields }
            userErrors { code field message }
          }
        }\n",
        cart_fragment!(),
    )
);

pub mod create_cart {
    use super::{CartNode, Deserialize, Serialize, UserErrorNode};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BuyerIdentityInput {
        pub customer_access_token: String,
    }

    #[derive(Debug, Clone, Default, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartInput {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub buyer_identity: Option<BuyerIdentityInput>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CartInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartCreatePayload {
        pub cart: Option<CartNode>,
        pub user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<CartCreatePayload>,
    }
}

storefront_operation!(
    GetCart,
    get_cart,
    concat!(
        "query GetCart($cartId: ID!) {
          cart(id: $cartId) { ...CartFields }
        }\n",
        cart_fragment!(),
    )
);

pub mod get_cart {
    use super::{CartId, CartNode, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<CartNode>,
    }
}

storefront_operation!(
    CartLinesAdd,
    cart_lines_add,
    "mutation CartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!) {
      cartLinesAdd(cartId: $cartId, lines: $lines) {
        cart { id }
        userErrors { code field message }
      }
    }\n"
);

pub mod cart_lines_add {
    use super::{CartId, CartMutationPayload, Deserialize, Serialize};
    use crate::shopify::types::CartLineInput;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<CartMutationPayload>,
    }
}

storefront_operation!(
    CartLinesUpdate,
    cart_lines_update,
    "mutation CartLinesUpdate($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
      cartLinesUpdate(cartId: $cartId, lines: $lines) {
        cart { id }
        userErrors { code field message }
      }
    }\n"
);

pub mod cart_lines_update {
    use super::{CartId, CartMutationPayload, Deserialize, Serialize};
    use crate::shopify::types::CartLineUpdateInput;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub lines: Vec<CartLineUpdateInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_update: Option<CartMutationPayload>,
    }
}

storefront_operation!(
    CartLinesRemove,
    cart_lines_remove,
    "mutation CartLinesRemove($cartId: ID!, $lineIds: [ID!]!) {
      cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
        cart { id }
        userErrors { code field message }
      }
    }\n"
);

pub mod cart_lines_remove {
    use super::{CartId, CartLineId, CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub line_ids: Vec<CartLineId>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_remove: Option<CartMutationPayload>,
    }
}

storefront_operation!(
    CartDiscountCodesUpdate,
    cart_discount_codes_update,
    "mutation CartDiscountCodesUpdate($cartId: ID!, $discountCodes: [String!]!) {
      cartDiscountCodesUpdate(cartId: $cartId, discountCodes: $discountCodes) {
        cart { id }
        userErrors { code field message }
      }
    }\n"
);

pub mod cart_discount_codes_update {
    use super::{CartId, CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub discount_codes: Vec<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_discount_codes_update: Option<CartMutationPayload>,
    }
}

storefront_operation!(
    CartNoteUpdate,
    cart_note_update,
    "mutation CartNoteUpdate($cartId: ID!, $note: String!) {
      cartNoteUpdate(cartId: $cartId, note: $note) {
        cart { id }
        userErrors { code field message }
      }
    }\n"
);

pub mod cart_note_update {
    use super::{CartId, CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub note: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_note_update: Option<CartMutationPayload>,
    }
}

// =============================================================================
// Customer Operations
// =============================================================================

storefront_operation!(
    CustomerAccessTokenCreate,
    customer_access_token_create,
    "mutation CustomerAccessTokenCreate($input: CustomerAccessTokenCreateInput!) {
      customerAccessTokenCreate(input: $input) {
        customerAccessToken { accessToken expiresAt }
        customerUserErrors { code field message }
      }
    }\n"
);

pub mod customer_access_token_create {
    use super::{Deserialize, Serialize, UserErrorNode};
    use crate::shopify::types::CustomerAccessToken;

    #[derive(Clone, Serialize)]
    pub struct CustomerAccessTokenCreateInput {
        pub email: String,
        pub password: String,
    }

    impl std::fmt::Debug for CustomerAccessTokenCreateInput {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("CustomerAccessTokenCreateInput")
                .field("email", &self.email)
                .field("password", &"[REDACTED]")
                .finish()
        }
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CustomerAccessTokenCreateInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub customer_access_token: Option<CustomerAccessToken>,
        pub customer_user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub customer_access_token_create: Option<Payload>,
    }
}

storefront_operation!(
    CustomerAccessTokenDelete,
    customer_access_token_delete,
    "mutation CustomerAccessTokenDelete($customerAccessToken: String!) {
      customerAccessTokenDelete(customerAccessToken: $customerAccessToken) {
        deletedAccessToken
        userErrors { field message }
      }
    }\n"
);

pub mod customer_access_token_delete {
    use super::{Deserialize, Serialize, UserErrorNode};

    #[derive(Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub customer_access_token: String,
    }

    impl std::fmt::Debug for Variables {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Variables")
                .field("customer_access_token", &"[REDACTED]")
                .finish()
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub deleted_access_token: Option<String>,
        pub user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub customer_access_token_delete: Option<Payload>,
    }
}

storefront_operation!(
    CustomerCreate,
    customer_create,
    concat!(
        "mutation CustomerCreate($input: CustomerCreateInput!) {
          customerCreate(input: $input) {
            customer { ...CustomerFields }
            customerUserErrors { code field message }
          }
        }\n",
        customer_fragment!(),
    )
);

pub mod customer_create {
    use super::{CustomerNode, Deserialize, Serialize, UserErrorNode};
    use crate::shopify::types::CustomerCreateInput;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CustomerCreateInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub customer: Option<CustomerNode>,
        pub customer_user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub customer_create: Option<Payload>,
    }
}

storefront_operation!(
    GetCustomer,
    get_customer,
    concat!(
        "query GetCustomer($customerAccessToken: String!) {
          customer(customerAccessToken: $customerAccessToken) { ...CustomerFields }
        }\n",
        customer_fragment!(),
    )
);

/// Variables shared by every query authorized by a customer access token.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerVariables {
    pub customer_access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<i64>,
}

impl std::fmt::Debug for CustomerVariables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerVariables")
            .field("customer_access_token", &"[REDACTED]")
            .field("first", &self.first)
            .finish()
    }
}

pub mod get_customer {
    use super::{CustomerNode, Deserialize};

    pub type Variables = super::CustomerVariables;

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub customer: Option<CustomerNode>,
    }
}

storefront_operation!(
    GetCustomerOrders,
    get_customer_orders,
    concat!(
        "query GetCustomerOrders($customerAccessToken: String!, $first: Int!) {
          customer(customerAccessToken: $customerAccessToken) {
            orders(first: $first, sortKey: PROCESSED_AT, reverse: true) {
              nodes {
                id name orderNumber processedAt statusUrl
                financialStatus fulfillmentStatus
                subtotalPrice { ...MoneyFields }
                totalPrice { ...MoneyFields }
                shippingAddress { ...AddressFields }
                lineItems(first: 50) {
                  nodes {
                    title quantity
                    originalTotalPrice { ...MoneyFields }
                    variant { id title image { ...ImageFields } }
                  }
                }
                successfulFulfillments(first: 10) {
                  trackingCompany
                  trackingInfo(first: 5) { number url }
                }
              }
            }
          }
        }\n",
        money_fragment!(),
        image_fragment!(),
        address_fragment!(),
    )
);

pub mod get_customer_orders {
    use super::{
        AddressNode, Deserialize, FinancialStatus, FulfillmentStatus, ImageNode, Nodes, OrderId,
        Price, VariantId,
    };

    pub type Variables = super::CustomerVariables;

    #[derive(Debug, Clone, Deserialize)]
    pub struct LineItemVariantNode {
        pub id: VariantId,
        pub title: String,
        pub image: Option<ImageNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LineItemNode {
        pub title: String,
        pub quantity: i64,
        pub original_total_price: Price,
        pub variant: Option<LineItemVariantNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct TrackingInfoNode {
        pub number: Option<String>,
        pub url: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FulfillmentNode {
        pub tracking_company: Option<String>,
        pub tracking_info: Vec<TrackingInfoNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OrderNode {
        pub id: OrderId,
        pub name: String,
        pub order_number: i64,
        pub processed_at: chrono::DateTime<chrono::Utc>,
        pub status_url: Option<String>,
        pub financial_status: Option<FinancialStatus>,
        pub fulfillment_status: Option<FulfillmentStatus>,
        pub subtotal_price: Option<Price>,
        pub total_price: Price,
        pub shipping_address: Option<AddressNode>,
        pub line_items: Nodes<LineItemNode>,
        #[serde(default)]
        pub successful_fulfillments: Option<Vec<FulfillmentNode>>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CustomerOrdersNode {
        pub orders: Nodes<OrderNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub customer: Option<CustomerOrdersNode>,
    }
}

storefront_operation!(
    GetCustomerAddresses,
    get_customer_addresses,
    concat!(
        "query GetCustomerAddresses($customerAccessToken: String!, $first: Int!) {
          customer(customerAccessToken: $customerAccessToken) {
            addresses(first: $first) { nodes { ...AddressFields } }
          }
        }\n",
        address_fragment!(),
    )
);

pub mod get_customer_addresses {
    use super::{AddressNode, Deserialize, Nodes};

    pub type Variables = super::CustomerVariables;

    #[derive(Debug, Clone, Deserialize)]
    pub struct CustomerAddressesNode {
        pub addresses: Nodes<AddressNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub customer: Option<CustomerAddressesNode>,
    }
}
