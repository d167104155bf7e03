//! Order status explanation.

use shopfront_core::{FinancialStatus, FulfillmentStatus, resolve_display_status};

use crate::output::Output;

fn optional(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    (!raw.is_empty() && raw != "-").then_some(raw)
}

/// Print the display status for a status pair. Unknown values are accepted.
pub fn show(financial: &str, fulfillment: &str, out: Output) {
    let financial = optional(financial).map(FinancialStatus::parse_lenient);
    let fulfillment = optional(fulfillment).map(FulfillmentStatus::parse_lenient);
    let status = resolve_display_status(fulfillment, financial);

    out.emit(&status, |status| {
        println!("{} (step {}/4)", status.label, status.step.number());
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional() {
        assert_eq!(optional("PAID"), Some("PAID"));
        assert_eq!(optional(" - "), None);
        assert_eq!(optional(""), None);
    }
}
