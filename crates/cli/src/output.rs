//! Text and JSON rendering for command results.

use serde::Serialize;

use shopfront_storefront::shopify::{Cart, MailingAddress, Order, Product};

/// Where command results go and in which shape.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as JSON, or hand it to `text` for the human rendering.
    pub fn emit<T: Serialize + ?Sized>(self, value: &T, text: impl FnOnce(&T)) {
        if self.json {
            match serde_json::to_string_pretty(value) {
                Ok(encoded) => println!("{encoded}"),
                Err(e) => tracing::error!(error = %e, "Failed to encode output"),
            }
        } else {
            text(value);
        }
    }

    /// Print a one-line confirmation.
    pub fn message(self, message: &str) {
        self.emit(&serde_json::json!({ "message": message }), |_| {
            println!("{message}");
        });
    }
}

pub fn print_product_line(product: &Product) {
    let availability = if product.available_for_sale {
        ""
    } else {
        "  (sold out)"
    };
    println!(
        "{:<32} {:<40} {}{availability}",
        product.handle,
        product.title,
        product.price_range.min_variant_price.display()
    );
}

pub fn print_product(product: &Product) {
    println!("{}", product.title);
    println!("  handle:  {}", product.handle);
    println!("  id:      {}", product.id);
    if !product.vendor.is_empty() {
        println!("  vendor:  {}", product.vendor);
    }
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
    println!();
    println!("Variants:");
    for variant in &product.variants {
        let availability = if variant.available_for_sale {
            ""
        } else {
            "  (sold out)"
        };
        println!(
            "  {:<24} {:>10}  {}{availability}",
            variant.title,
            variant.price.display(),
            variant.id
        );
    }
}

pub fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for line in &cart.lines {
        println!(
            "{:>3} x {:<48} {:>10}",
            line.quantity,
            line.display_title(),
            line.cost.total_amount.display()
        );
        println!("      line {}", line.id);
    }
    println!();
    println!("Items:    {}", cart.total_quantity);
    println!("Subtotal: {}", cart.cost.subtotal.display());
    if !cart.discount_codes.is_empty() {
        let codes: Vec<String> = cart
            .discount_codes
            .iter()
            .map(|d| {
                if d.applicable {
                    d.code.clone()
                } else {
                    format!("{} (not applicable)", d.code)
                }
            })
            .collect();
        println!("Codes:    {}", codes.join(", "));
    }
    if let Some(note) = &cart.note {
        println!("Note:     {note}");
    }
    println!("Total:    {}", cart.cost.total.display());
}

pub fn print_order_line(order: &Order) {
    let status = order.display_status();
    println!(
        "{:<8} {}  {:<20} step {}/4  {:>10}",
        order.name,
        order.processed_at.format("%Y-%m-%d"),
        status.label,
        status.step.number(),
        order.total.display()
    );
}

pub fn print_order(order: &Order) {
    let status = order.display_status();
    println!("Order {}", order.name);
    println!("  placed:  {}", order.processed_at.format("%Y-%m-%d %H:%M"));
    println!("  status:  {} (step {}/4)", status.label, status.step.number());
    println!();
    for item in &order.line_items {
        let title = match &item.variant_title {
            Some(variant) if variant != "Default Title" => format!("{} - {variant}", item.title),
            _ => item.title.clone(),
        };
        println!(
            "{:>3} x {:<48} {:>10}",
            item.quantity,
            title,
            item.original_total.display()
        );
    }
    println!();
    if let Some(subtotal) = &order.subtotal {
        println!("Subtotal: {}", subtotal.display());
    }
    println!("Total:    {}", order.total.display());
    if let Some(address) = &order.shipping_address {
        println!("Ship to:  {}", address.formatted_single_line());
    }
    for tracking in &order.tracking {
        let company = tracking.company.as_deref().unwrap_or("Carrier");
        let number = tracking.number.as_deref().unwrap_or("-");
        match &tracking.url {
            Some(url) => println!("Tracking: {company} {number} {url}"),
            None => println!("Tracking: {company} {number}"),
        }
    }
    if let Some(url) = &order.status_url {
        println!("Details:  {url}");
    }
}

pub fn print_address(address: &MailingAddress) {
    println!("{}", address.formatted_single_line());
}
