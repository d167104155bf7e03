//! Domain types for the Shopify Storefront API.
//!
//! These types provide a flat, ergonomic API separate from the connection
//! and edge shapes of the GraphQL wire types in `storefront::queries`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopfront_core::{
    AddressId, CartId, CartLineId, CollectionId, CustomerId, Email, FinancialStatus,
    FulfillmentStatus, OrderDisplayStatus, OrderId, Price, ProductId, VariantId,
    resolve_display_status,
};

// =============================================================================
// Catalog Types
// =============================================================================

/// Price range for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Price,
    /// Maximum price among all variants.
    pub max_variant_price: Price,
}

/// Product or collection image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// Image width in pixels.
    pub width: Option<i64>,
    /// Image height in pixels.
    pub height: Option<i64>,
}

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Selected value (e.g., "Large", "Blue").
    pub value: String,
}

/// Product option definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Available values (e.g., `["Small", "Medium", "Large"]`).
    pub values: Vec<String>,
}

/// A product variant (specific combination of options).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    /// Variant title (combination of option values).
    pub title: String,
    pub available_for_sale: bool,
    pub sku: Option<String>,
    pub price: Price,
    /// Original price if on sale.
    pub compare_at_price: Option<Price>,
    pub selected_options: Vec<SelectedOption>,
    pub image: Option<Image>,
}

/// A product in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// URL handle.
    pub handle: String,
    pub title: String,
    /// Plain text description.
    pub description: String,
    pub available_for_sale: bool,
    pub vendor: String,
    pub product_type: String,
    pub tags: Vec<String>,
    pub price_range: PriceRange,
    pub featured_image: Option<Image>,
    pub images: Vec<Image>,
    pub options: Vec<ProductOption>,
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// The variant to add when the shopper has not picked one.
    ///
    /// Prefers the first variant available for sale.
    #[must_use]
    pub fn default_variant(&self) -> Option<&ProductVariant> {
        self.variants
            .iter()
            .find(|v| v.available_for_sale)
            .or_else(|| self.variants.first())
    }

    /// Find a variant by ID.
    #[must_use]
    pub fn variant(&self, id: &VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.id == id)
    }
}

/// A collection of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    /// URL handle.
    pub handle: String,
    pub title: String,
    pub description: String,
    pub image: Option<Image>,
    /// First page of products in this collection (empty in listings).
    pub products: Vec<Product>,
    /// Pagination for `products`.
    pub products_page_info: Option<PageInfo>,
}

/// Pagination information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next_page: bool,
    /// Cursor for the last item.
    pub end_cursor: Option<String>,
}

/// Paginated list of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConnection {
    pub products: Vec<Product>,
    pub page_info: PageInfo,
}

/// Paginated list of collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConnection {
    pub collections: Vec<Collection>,
    pub page_info: PageInfo,
}

/// Sort keys for product queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSortKey {
    Title,
    ProductType,
    Vendor,
    UpdatedAt,
    CreatedAt,
    BestSelling,
    Price,
    Id,
    /// Sort by relevance (for search).
    Relevance,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Product summary on a cart line's merchandise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartMerchandiseProduct {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
}

/// The variant a cart line refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartMerchandise {
    pub id: VariantId,
    /// Variant title ("Default Title" for single-variant products).
    pub title: String,
    pub product: CartMerchandiseProduct,
    pub image: Option<Image>,
    pub selected_options: Vec<SelectedOption>,
}

/// Cost for a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineCost {
    /// Price per unit.
    pub amount_per_quantity: Price,
    /// Total for the line (after line discounts).
    pub total_amount: Price,
}

/// A line item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub quantity: i64,
    pub merchandise: CartMerchandise,
    pub cost: CartLineCost,
}

impl CartLine {
    /// Product title with the variant title appended when it is meaningful.
    #[must_use]
    pub fn display_title(&self) -> String {
        let variant = self.merchandise.title.as_str();
        if variant.is_empty() || variant == "Default Title" {
            self.merchandise.product.title.clone()
        } else {
            format!("{} - {variant}", self.merchandise.product.title)
        }
    }
}

/// Cart cost summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCost {
    /// Subtotal before tax and shipping.
    pub subtotal: Price,
    pub total: Price,
}

/// Discount code applied to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartDiscountCode {
    pub code: String,
    /// Whether the code currently applies to the cart.
    pub applicable: bool,
}

/// A shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    /// Hosted checkout URL.
    pub checkout_url: String,
    pub note: Option<String>,
    /// Sum of all line quantities.
    pub total_quantity: i64,
    pub cost: CartCost,
    pub discount_codes: Vec<CartDiscountCode>,
    pub lines: Vec<CartLine>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cart {
    /// Find the line holding a variant.
    #[must_use]
    pub fn line_for_variant(&self, variant_id: &VariantId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.merchandise.id == variant_id)
    }

    /// Find a line by ID.
    #[must_use]
    pub fn line(&self, line_id: &CartLineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.id == line_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Input for adding a line to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Product variant ID.
    pub merchandise_id: VariantId,
    pub quantity: i64,
}

/// Input for changing a line's quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    pub id: CartLineId,
    pub quantity: i64,
}

/// User error returned by a cart or customer mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUserError {
    /// Error code (e.g., `INVALID`, `TAKEN`).
    #[serde(default)]
    pub code: Option<String>,
    /// Field path that caused the error.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    /// Human-readable error message.
    pub message: String,
}

// =============================================================================
// Customer Types
// =============================================================================

/// Storefront API customer access token.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAccessToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for CustomerAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerAccessToken")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl CustomerAccessToken {
    /// Whether the token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Input for registering a customer.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreateInput {
    pub email: Email,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepts_marketing: Option<bool>,
}

impl std::fmt::Debug for CustomerCreateInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerCreateInput")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("accepts_marketing", &self.accepts_marketing)
            .finish()
    }
}

/// A customer's postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailingAddress {
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

impl MailingAddress {
    /// The non-empty address parts joined with commas.
    #[must_use]
    pub fn formatted_single_line(&self) -> String {
        let city_line = [
            self.city.as_deref(),
            self.province_code.as_deref(),
            self.zip.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        [
            self.name.as_deref(),
            self.company.as_deref(),
            self.address1.as_deref(),
            self.address2.as_deref(),
            Some(city_line.as_str()),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// A signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub email: Option<Email>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub accepts_marketing: bool,
    pub default_address: Option<MailingAddress>,
}

impl Customer {
    /// Full name, or `None` when neither name part is set.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!name.is_empty()).then_some(name)
    }
}

// =============================================================================
// Order Types
// =============================================================================

/// A line item on a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub title: String,
    pub quantity: i64,
    pub variant_id: Option<VariantId>,
    pub variant_title: Option<String>,
    pub original_total: Price,
    pub image: Option<Image>,
}

/// Carrier tracking for a fulfillment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingInfo {
    pub company: Option<String>,
    pub number: Option<String>,
    pub url: Option<String>,
}

/// A customer's order (read-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Display name (e.g., "#1001").
    pub name: String,
    pub order_number: i64,
    pub processed_at: DateTime<Utc>,
    /// `None` when Shopify omits it.
    pub financial_status: Option<FinancialStatus>,
    pub fulfillment_status: Option<FulfillmentStatus>,
    pub subtotal: Option<Price>,
    pub total: Price,
    pub shipping_address: Option<MailingAddress>,
    pub line_items: Vec<OrderLineItem>,
    pub tracking: Vec<TrackingInfo>,
    /// Order status page URL.
    pub status_url: Option<String>,
}

impl Order {
    /// Progress label, tone and step derived from the two remote statuses.
    #[must_use]
    pub const fn display_status(&self) -> OrderDisplayStatus {
        resolve_display_status(self.fulfillment_status, self.financial_status)
    }

    /// Whether `reference` names this order: `1001`, `#1001` or the full name.
    #[must_use]
    pub fn matches_reference(&self, reference: &str) -> bool {
        let reference = reference.trim();
        if reference.eq_ignore_ascii_case(&self.name) {
            return true;
        }
        reference
            .trim_start_matches('#')
            .parse::<i64>()
            .is_ok_and(|n| n == self.order_number)
    }
}
