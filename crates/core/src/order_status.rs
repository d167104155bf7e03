//! Customer-facing order progress derived from Shopify's order statuses.
//!
//! Shopify reports payment and shipment state as two independent enums. The
//! order tracking view collapses them into a four step progress bar:
//!
//! | Step | Meaning    |
//! |------|------------|
//! | 1    | Placed     |
//! | 2    | Processing |
//! | 3    | Shipped    |
//! | 4    | Delivered  |
//!
//! The mapping is a priority lookup, not a state machine: a later query for
//! the same order may return an earlier step if Shopify's statuses move back.

use serde::Serialize;

use crate::types::{FinancialStatus, FulfillmentStatus};

/// Position on the order progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum ProgressStep {
    Placed = 1,
    Processing = 2,
    Shipped = 3,
    Delivered = 4,
}

impl ProgressStep {
    /// Step number in `1..=4`.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }
}

impl From<ProgressStep> for u8 {
    fn from(step: ProgressStep) -> Self {
        step.number()
    }
}

/// Visual tone of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Pending,
    Info,
    Progress,
    Success,
    Danger,
    Neutral,
}

impl StatusTone {
    /// Tailwind classes for the badge.
    #[must_use]
    pub const fn color_class(self) -> &'static str {
        match self {
            Self::Pending => "bg-yellow-100 text-yellow-800",
            Self::Info => "bg-blue-100 text-blue-800",
            Self::Progress => "bg-indigo-100 text-indigo-800",
            Self::Success => "bg-green-100 text-green-800",
            Self::Danger => "bg-red-100 text-red-800",
            Self::Neutral => "bg-gray-100 text-gray-800",
        }
    }
}

/// Derived display status of an order. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderDisplayStatus {
    pub label: &'static str,
    pub tone: StatusTone,
    pub step: ProgressStep,
}

impl OrderDisplayStatus {
    const fn new(label: &'static str, tone: StatusTone, step: ProgressStep) -> Self {
        Self { label, tone, step }
    }

    /// Tailwind classes for the status badge.
    #[must_use]
    pub const fn color_class(&self) -> &'static str {
        self.tone.color_class()
    }

    /// Shown when nothing more specific applies.
    pub const CONFIRMED: Self =
        Self::new("Order Confirmed", StatusTone::Info, ProgressStep::Placed);
}

/// Resolve the display status of an order.
///
/// Payment problems win over shipment progress; otherwise the fulfillment
/// status picks the step. Missing or unrecognized values fall through to
/// [`OrderDisplayStatus::CONFIRMED`].
#[must_use]
pub const fn resolve_display_status(
    fulfillment: Option<FulfillmentStatus>,
    financial: Option<FinancialStatus>,
) -> OrderDisplayStatus {
    use ProgressStep::{Delivered, Placed, Processing, Shipped};
    use StatusTone::{Danger, Info, Neutral, Pending, Progress, Success};

    if let Some(financial) = financial {
        let settled = match financial {
            FinancialStatus::Pending => {
                Some(OrderDisplayStatus::new("Awaiting Payment", Pending, Placed))
            }
            FinancialStatus::Authorized => {
                Some(OrderDisplayStatus::new("Payment Authorized", Pending, Placed))
            }
            FinancialStatus::PartiallyPaid => {
                Some(OrderDisplayStatus::new("Partially Paid", Pending, Placed))
            }
            FinancialStatus::Voided => Some(OrderDisplayStatus::new("Cancelled", Danger, Placed)),
            FinancialStatus::Expired => {
                Some(OrderDisplayStatus::new("Payment Expired", Danger, Placed))
            }
            FinancialStatus::Refunded => Some(OrderDisplayStatus::new("Refunded", Neutral, Placed)),
            FinancialStatus::PartiallyRefunded => {
                Some(OrderDisplayStatus::new("Partially Refunded", Neutral, Shipped))
            }
            FinancialStatus::Paid | FinancialStatus::Unknown => None,
        };
        if let Some(status) = settled {
            return status;
        }
    }

    match fulfillment {
        Some(FulfillmentStatus::OnHold) => OrderDisplayStatus::new("On Hold", Pending, Placed),
        Some(FulfillmentStatus::Scheduled) => OrderDisplayStatus::new("Scheduled", Info, Placed),
        Some(FulfillmentStatus::Open) => OrderDisplayStatus::CONFIRMED,
        Some(
            FulfillmentStatus::Unfulfilled
            | FulfillmentStatus::PendingFulfillment
            | FulfillmentStatus::InProgress,
        ) => OrderDisplayStatus::new("Processing", Progress, Processing),
        Some(FulfillmentStatus::InTransit) => OrderDisplayStatus::new("Shipped", Progress, Shipped),
        Some(FulfillmentStatus::OutForDelivery) => {
            OrderDisplayStatus::new("Out for Delivery", Progress, Shipped)
        }
        Some(FulfillmentStatus::AttemptedDelivery) => {
            OrderDisplayStatus::new("Delivery Attempted", Pending, Shipped)
        }
        Some(FulfillmentStatus::PartiallyFulfilled) => {
            OrderDisplayStatus::new("Partially Shipped", Progress, Shipped)
        }
        Some(FulfillmentStatus::Fulfilled) => {
            OrderDisplayStatus::new("Delivered ✓", Success, Delivered)
        }
        Some(FulfillmentStatus::Restocked) => OrderDisplayStatus::new("Cancelled", Danger, Placed),
        Some(FulfillmentStatus::Unknown) | None => OrderDisplayStatus::CONFIRMED,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn resolve(fulfillment: FulfillmentStatus, financial: FinancialStatus) -> OrderDisplayStatus {
        resolve_display_status(Some(fulfillment), Some(financial))
    }

    #[test]
    fn test_paid_and_fulfilled_is_delivered() {
        let status = resolve(FulfillmentStatus::Fulfilled, FinancialStatus::Paid);
        assert_eq!(status.step, ProgressStep::Delivered);
        assert_eq!(status.step.number(), 4);
        assert_eq!(status.label, "Delivered ✓");
    }

    #[test]
    fn test_pending_payment_wins_over_any_fulfillment() {
        for fulfillment in FulfillmentStatus::ALL {
            let status = resolve(fulfillment, FinancialStatus::Pending);
            assert_eq!(status.step, ProgressStep::Placed);
            assert_eq!(status.label, "Awaiting Payment");
        }
    }

    #[test]
    fn test_paid_in_transit_is_shipped() {
        let status = resolve(FulfillmentStatus::InTransit, FinancialStatus::Paid);
        assert_eq!(status.step, ProgressStep::Shipped);
        assert_eq!(status.label, "Shipped");
    }

    #[test]
    fn test_partial_refund_is_step_three() {
        let status = resolve(FulfillmentStatus::Fulfilled, FinancialStatus::PartiallyRefunded);
        assert_eq!(status.step, ProgressStep::Shipped);
        assert_eq!(status.label, "Partially Refunded");
    }

    #[test]
    fn test_voided_expired_refunded_are_step_one() {
        for financial in [
            FinancialStatus::Voided,
            FinancialStatus::Expired,
            FinancialStatus::Refunded,
        ] {
            let status = resolve(FulfillmentStatus::Fulfilled, financial);
            assert_eq!(status.step, ProgressStep::Placed, "{financial}");
        }
    }

    #[test]
    fn test_fulfillment_steps_when_paid() {
        let cases = [
            (FulfillmentStatus::OnHold, 1),
            (FulfillmentStatus::Scheduled, 1),
            (FulfillmentStatus::Open, 1),
            (FulfillmentStatus::Unfulfilled, 2),
            (FulfillmentStatus::InTransit, 3),
            (FulfillmentStatus::OutForDelivery, 3),
            (FulfillmentStatus::AttemptedDelivery, 3),
            (FulfillmentStatus::PartiallyFulfilled, 3),
            (FulfillmentStatus::Fulfilled, 4),
            (FulfillmentStatus::Restocked, 1),
        ];
        for (fulfillment, step) in cases {
            assert_eq!(
                resolve(fulfillment, FinancialStatus::Paid).step.number(),
                step,
                "{fulfillment}"
            );
        }
    }

    #[test]
    fn test_restocked_reads_as_cancelled() {
        let status = resolve(FulfillmentStatus::Restocked, FinancialStatus::Paid);
        assert_eq!(status.label, "Cancelled");
        assert_eq!(status.tone, StatusTone::Danger);
    }

    #[test]
    fn test_missing_and_unknown_fall_back_to_confirmed() {
        assert_eq!(resolve_display_status(None, None), OrderDisplayStatus::CONFIRMED);
        assert_eq!(
            resolve_display_status(Some(FulfillmentStatus::Unknown), Some(FinancialStatus::Unknown)),
            OrderDisplayStatus::CONFIRMED
        );
        assert_eq!(
            resolve_display_status(None, Some(FinancialStatus::Paid)),
            OrderDisplayStatus::CONFIRMED
        );
        assert_eq!(OrderDisplayStatus::CONFIRMED.label, "Order Confirmed");
    }

    #[test]
    fn test_is_total_over_every_combination() {
        let fulfillments = FulfillmentStatus::ALL.map(Some);
        let financials = FinancialStatus::ALL.map(Some);
        for fulfillment in fulfillments.into_iter().chain([None]) {
            for financial in financials.into_iter().chain([None]) {
                let status = resolve_display_status(fulfillment, financial);
                assert!((1..=4).contains(&status.step.number()));
                assert!(!status.label.is_empty());
                assert!(!status.color_class().is_empty());
            }
        }
    }

    #[test]
    fn test_serializes_step_as_number() {
        let status = resolve(FulfillmentStatus::Fulfilled, FinancialStatus::Paid);
        let json = serde_json::to_value(status).unwrap_or_default();
        assert_eq!(json["step"], 4);
        assert_eq!(json["tone"], "success");
    }

    proptest! {
        #[test]
        fn prop_arbitrary_strings_never_panic(fulfillment in ".*", financial in ".*") {
            let status = resolve_display_status(
                Some(FulfillmentStatus::parse_lenient(&fulfillment)),
                Some(FinancialStatus::parse_lenient(&financial)),
            );
            prop_assert!((1..=4).contains(&status.step.number()));
        }

        #[test]
        fn prop_is_deterministic(f in 0..FulfillmentStatus::ALL.len(), p in 0..FinancialStatus::ALL.len()) {
            let fulfillment = FulfillmentStatus::ALL.get(f).copied();
            let financial = FinancialStatus::ALL.get(p).copied();
            prop_assert_eq!(
                resolve_display_status(fulfillment, financial),
                resolve_display_status(fulfillment, financial)
            );
        }
    }
}
