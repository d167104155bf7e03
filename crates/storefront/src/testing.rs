//! In-memory commerce backend for tests.
//!
//! [`FakeCommerce`] implements [`CartApi`] and [`CustomerApi`] against local
//! state, mimicking the Storefront API's observable behavior: same-variant
//! lines merge, a zero quantity update removes the line, unknown carts read
//! as `null`, and bad credentials come back as unauthorized.
//!
//! Available to downstream crates through the `test-support` feature.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use shopfront_core::{
    AddressId, CartId, CartLineId, CurrencyCode, CustomerId, Email, Price, ProductId, VariantId,
};

use crate::shopify::{
    Cart, CartApi, CartCost, CartLine, CartLineCost, CartLineInput, CartLineUpdateInput,
    CartMerchandise, CartMerchandiseProduct, Customer, CustomerAccessToken, CustomerApi,
    CustomerCreateInput, MailingAddress, Order, ShopifyError,
};

/// Catalog entry a fake cart line can point at.
#[derive(Debug, Clone)]
pub struct FakeVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub handle: String,
    pub product_title: String,
    pub title: String,
    pub price: Price,
}

#[derive(Debug)]
struct FakeCustomer {
    customer: Customer,
    password: String,
    orders: Vec<Order>,
    addresses: Vec<MailingAddress>,
}

#[derive(Debug)]
struct FakeCart {
    owner: Option<CustomerId>,
    note: Option<String>,
    discount_codes: Vec<String>,
    lines: Vec<(CartLineId, VariantId, i64)>,
}

#[derive(Debug, Default)]
struct FakeState {
    variants: HashMap<VariantId, FakeVariant>,
    carts: HashMap<CartId, FakeCart>,
    customers: Vec<FakeCustomer>,
    tokens: HashMap<String, CustomerId>,
    deleted_tokens: Vec<String>,
    next_id: u64,
    fail_next: Option<String>,
    calls: HashMap<&'static str, usize>,
}

impl FakeState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Count a call and consume a pending injected failure.
    fn enter(&mut self, operation: &'static str) -> Result<(), ShopifyError> {
        *self.calls.entry(operation).or_default() += 1;
        match self.fail_next.take() {
            Some(message) => Err(ShopifyError::message(message)),
            None => Ok(()),
        }
    }

    fn cart_mut(&mut self, cart_id: &CartId) -> Result<&mut FakeCart, ShopifyError> {
        self.carts
            .get_mut(cart_id)
            .ok_or_else(|| ShopifyError::UserError("The specified cart does not exist.".to_string()))
    }

    fn customer_for_token(&self, token: &str) -> Option<&FakeCustomer> {
        let id = self.tokens.get(token)?;
        self.customers.iter().find(|c| &c.customer.id == id)
    }

    fn render(&self, cart_id: &CartId, cart: &FakeCart) -> Cart {
        let mut subtotal: Option<Price> = None;
        let lines: Vec<CartLine> = cart
            .lines
            .iter()
            .filter_map(|(line_id, variant_id, quantity)| {
                let variant = self.variants.get(variant_id)?;
                let total = variant.price.times(*quantity);
                subtotal = Some(match subtotal.take() {
                    Some(sum) => sum.checked_add(&total).unwrap_or(sum),
                    None => total.clone(),
                });
                Some(CartLine {
                    id: line_id.clone(),
                    quantity: *quantity,
                    merchandise: CartMerchandise {
                        id: variant.id.clone(),
                        title: variant.title.clone(),
                        product: CartMerchandiseProduct {
                            id: variant.product_id.clone(),
                            handle: variant.handle.clone(),
                            title: variant.product_title.clone(),
                        },
                        image: None,
                        selected_options: vec![],
                    },
                    cost: CartLineCost {
                        amount_per_quantity: variant.price.clone(),
                        total_amount: total,
                    },
                })
            })
            .collect();

        let subtotal = subtotal.unwrap_or_else(|| Price::zero(CurrencyCode::default()));

        Cart {
            id: cart_id.clone(),
            checkout_url: format!("https://fake-shop.myshopify.com/cart/c/{}", cart_id.tail()),
            note: cart.note.clone(),
            total_quantity: cart.lines.iter().map(|(_, _, q)| q).sum(),
            cost: CartCost {
                subtotal: subtotal.clone(),
                total: subtotal,
            },
            discount_codes: cart
                .discount_codes
                .iter()
                .map(|code| crate::shopify::CartDiscountCode {
                    code: code.clone(),
                    applicable: true,
                })
                .collect(),
            lines,
            updated_at: Some(Utc::now()),
        }
    }
}

/// In-memory stand-in for the Storefront API.
#[derive(Debug, Default)]
pub struct FakeCommerce {
    state: Mutex<FakeState>,
}

impl FakeCommerce {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a purchasable variant priced in USD. Returns its ID.
    ///
    /// An unparseable `price` is stored as zero.
    pub fn add_variant(&self, product_title: &str, variant_title: &str, price: &str) -> VariantId {
        let mut state = self.state();
        let n = state.next_id();
        let variant = FakeVariant {
            id: VariantId::new(format!("gid://shopify/ProductVariant/{n}")),
            product_id: ProductId::new(format!("gid://shopify/Product/{n}")),
            handle: product_title.to_lowercase().replace(' ', "-"),
            product_title: product_title.to_string(),
            title: variant_title.to_string(),
            price: Price::parse(price, "USD").unwrap_or_else(|_| Price::zero(CurrencyCode::default())),
        };
        let id = variant.id.clone();
        state.variants.insert(id.clone(), variant);
        id
    }

    /// Register a customer who can log in with `password`.
    pub fn add_customer(&self, email: &Email, password: &str, first_name: Option<&str>) -> CustomerId {
        let mut state = self.state();
        let n = state.next_id();
        let id = CustomerId::new(format!("gid://shopify/Customer/{n}"));
        state.customers.push(FakeCustomer {
            customer: Customer {
                id: id.clone(),
                email: Some(email.clone()),
                first_name: first_name.map(str::to_string),
                last_name: None,
                phone: None,
                accepts_marketing: false,
                default_address: None,
            },
            password: password.to_string(),
            orders: vec![],
            addresses: vec![],
        });
        id
    }

    /// Attach an order to a customer's history.
    pub fn add_order(&self, customer_id: &CustomerId, order: Order) {
        let mut state = self.state();
        if let Some(customer) = state.customers.iter_mut().find(|c| &c.customer.id == customer_id) {
            customer.orders.push(order);
        }
    }

    /// Attach a saved address to a customer.
    pub fn add_address(&self, customer_id: &CustomerId, mut address: MailingAddress) {
        let mut state = self.state();
        let n = state.next_id();
        if address.id.as_str().is_empty() {
            address.id = AddressId::new(format!("gid://shopify/MailingAddress/{n}"));
        }
        if let Some(customer) = state.customers.iter_mut().find(|c| &c.customer.id == customer_id) {
            customer.addresses.push(address);
        }
    }

    /// Make the next call of any operation fail with a GraphQL error.
    pub fn fail_next(&self, message: &str) {
        self.state().fail_next = Some(message.to_string());
    }

    /// Drop a cart, as Shopify does once a cart expires or is checked out.
    pub fn forget_cart(&self, cart_id: &CartId) {
        self.state().carts.remove(cart_id);
    }

    /// Invalidate every issued access token.
    pub fn revoke_tokens(&self) {
        self.state().tokens.clear();
    }

    /// The cart as the remote currently holds it.
    #[must_use]
    pub fn cart(&self, cart_id: &CartId) -> Option<Cart> {
        let state = self.state();
        state.carts.get(cart_id).map(|cart| state.render(cart_id, cart))
    }

    /// The customer a cart was created for.
    #[must_use]
    pub fn cart_owner(&self, cart_id: &CartId) -> Option<CustomerId> {
        self.state().carts.get(cart_id).and_then(|c| c.owner.clone())
    }

    /// Number of remote carts created so far.
    #[must_use]
    pub fn cart_count(&self) -> usize {
        self.state().carts.len()
    }

    /// How many times an operation was called (e.g., `"fetch_cart"`).
    #[must_use]
    pub fn calls(&self, operation: &str) -> usize {
        self.state().calls.get(operation).copied().unwrap_or(0)
    }

    /// Tokens passed to `delete_access_token`.
    #[must_use]
    pub fn deleted_tokens(&self) -> Vec<String> {
        self.state().deleted_tokens.clone()
    }
}

#[async_trait]
impl CartApi for FakeCommerce {
    async fn create_cart(&self, buyer_access_token: Option<&str>) -> Result<Cart, ShopifyError> {
        let mut state = self.state();
        state.enter("create_cart")?;

        let owner = match buyer_access_token {
            Some(token) => Some(
                state
                    .tokens
                    .get(token)
                    .cloned()
                    .ok_or_else(|| ShopifyError::Unauthorized("Invalid customer access token".to_string()))?,
            ),
            None => None,
        };

        let n = state.next_id();
        let id = CartId::new(format!("gid://shopify/Cart/fake-{n}"));
        let cart = FakeCart {
            owner,
            note: None,
            discount_codes: vec![],
            lines: vec![],
        };
        let rendered = state.render(&id, &cart);
        state.carts.insert(id, cart);
        Ok(rendered)
    }

    async fn fetch_cart(&self, cart_id: &CartId) -> Result<Option<Cart>, ShopifyError> {
        let mut state = self.state();
        state.enter("fetch_cart")?;
        Ok(state.carts.get(cart_id).map(|cart| state.render(cart_id, cart)))
    }

    async fn add_lines(&self, cart_id: &CartId, lines: &[CartLineInput]) -> Result<(), ShopifyError> {
        let mut state = self.state();
        state.enter("add_lines")?;

        for line in lines {
            if !state.variants.contains_key(&line.merchandise_id) {
                return Err(ShopifyError::UserError(format!(
                    "The merchandise with id {} does not exist.",
                    line.merchandise_id
                )));
            }
            if line.quantity <= 0 {
                return Err(ShopifyError::UserError("The quantity must be positive.".to_string()));
            }
        }

        let mut new_ids = Vec::new();
        for _ in lines {
            let n = state.next_id();
            new_ids.push(CartLineId::new(format!("gid://shopify/CartLine/{n}")));
        }

        let cart = state.cart_mut(cart_id)?;
        for (line, new_id) in lines.iter().zip(new_ids) {
            match cart.lines.iter_mut().find(|(_, v, _)| v == &line.merchandise_id) {
                Some((_, _, quantity)) => *quantity += line.quantity,
                None => cart.lines.push((new_id, line.merchandise_id.clone(), line.quantity)),
            }
        }
        Ok(())
    }

    async fn update_lines(
        &self,
        cart_id: &CartId,
        lines: &[CartLineUpdateInput],
    ) -> Result<(), ShopifyError> {
        let mut state = self.state();
        state.enter("update_lines")?;

        let cart = state.cart_mut(cart_id)?;
        if let Some(missing) = lines
            .iter()
            .find(|u| !cart.lines.iter().any(|(id, _, _)| id == &u.id))
        {
            return Err(ShopifyError::UserError(format!(
                "The merchandise line with id {} does not exist.",
                missing.id
            )));
        }

        for update in lines {
            if let Some(entry) = cart.lines.iter_mut().find(|(id, _, _)| id == &update.id) {
                entry.2 = update.quantity;
            }
        }
        cart.lines.retain(|(_, _, quantity)| *quantity > 0);
        Ok(())
    }

    async fn remove_lines(&self, cart_id: &CartId, line_ids: &[CartLineId]) -> Result<(), ShopifyError> {
        let mut state = self.state();
        state.enter("remove_lines")?;

        let cart = state.cart_mut(cart_id)?;
        if let Some(missing) = line_ids
            .iter()
            .find(|line_id| !cart.lines.iter().any(|(id, _, _)| id == *line_id))
        {
            return Err(ShopifyError::UserError(format!(
                "The merchandise line with id {missing} does not exist."
            )));
        }
        cart.lines.retain(|(id, _, _)| !line_ids.contains(id));
        Ok(())
    }

    async fn update_discount_codes(&self, cart_id: &CartId, codes: &[String]) -> Result<(), ShopifyError> {
        let mut state = self.state();
        state.enter("update_discount_codes")?;
        state.cart_mut(cart_id)?.discount_codes = codes.to_vec();
        Ok(())
    }

    async fn update_note(&self, cart_id: &CartId, note: &str) -> Result<(), ShopifyError> {
        let mut state = self.state();
        state.enter("update_note")?;
        state.cart_mut(cart_id)?.note = Some(note.to_string());
        Ok(())
    }
}

#[async_trait]
impl CustomerApi for FakeCommerce {
    async fn create_access_token(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<CustomerAccessToken, ShopifyError> {
        let mut state = self.state();
        state.enter("create_access_token")?;

        let customer_id = state
            .customers
            .iter()
            .find(|c| c.customer.email.as_ref() == Some(email) && c.password == password)
            .map(|c| c.customer.id.clone())
            .ok_or_else(|| ShopifyError::Unauthorized("Unidentified customer".to_string()))?;

        let n = state.next_id();
        let access_token = format!("fake-token-{n}");
        state.tokens.insert(access_token.clone(), customer_id);
        Ok(CustomerAccessToken {
            access_token,
            expires_at: Utc::now() + Duration::days(30),
        })
    }

    async fn delete_access_token(&self, access_token: &str) -> Result<(), ShopifyError> {
        let mut state = self.state();
        state.enter("delete_access_token")?;
        state.tokens.remove(access_token);
        state.deleted_tokens.push(access_token.to_string());
        Ok(())
    }

    async fn create_customer(&self, input: &CustomerCreateInput) -> Result<Customer, ShopifyError> {
        {
            let mut state = self.state();
            state.enter("create_customer")?;
            if state
                .customers
                .iter()
                .any(|c| c.customer.email.as_ref() == Some(&input.email))
            {
                return Err(ShopifyError::Conflict(
                    "Email has already been taken".to_string(),
                ));
            }
        }

        let id = self.add_customer(&input.email, &input.password, input.first_name.as_deref());
        let mut state = self.state();
        let customer = state
            .customers
            .iter_mut()
            .find(|c| c.customer.id == id)
            .map(|c| {
                c.customer.last_name.clone_from(&input.last_name);
                c.customer.accepts_marketing = input.accepts_marketing.unwrap_or(false);
                c.customer.clone()
            })
            .ok_or_else(|| ShopifyError::message("Failed to create customer"))?;
        Ok(customer)
    }

    async fn customer(&self, access_token: &str) -> Result<Option<Customer>, ShopifyError> {
        let mut state = self.state();
        state.enter("customer")?;
        Ok(state.customer_for_token(access_token).map(|c| c.customer.clone()))
    }

    async fn orders(&self, access_token: &str, first: i64) -> Result<Option<Vec<Order>>, ShopifyError> {
        let mut state = self.state();
        state.enter("orders")?;
        let limit = usize::try_from(first).unwrap_or(0);
        Ok(state.customer_for_token(access_token).map(|c| {
            let mut orders = c.orders.clone();
            orders.sort_by(|a, b| b.processed_at.cmp(&a.processed_at));
            orders.truncate(limit);
            orders
        }))
    }

    async fn addresses(
        &self,
        access_token: &str,
        first: i64,
    ) -> Result<Option<Vec<MailingAddress>>, ShopifyError> {
        let mut state = self.state();
        state.enter("addresses")?;
        let limit = usize::try_from(first).unwrap_or(0);
        Ok(state
            .customer_for_token(access_token)
            .map(|c| c.addresses.iter().take(limit).cloned().collect()))
    }
}
