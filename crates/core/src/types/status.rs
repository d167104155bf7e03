//! Order status enumerations reported by Shopify.
//!
//! Both enums deserialize from Shopify's `SCREAMING_SNAKE_CASE` values. Values
//! added by Shopify after this crate was written deserialize as `Unknown`
//! instead of failing the whole order payload.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Normalize a loosely formatted status (`"partially paid"`, `"in-transit"`)
/// into Shopify's `SCREAMING_SNAKE_CASE` form.
fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Order fulfillment (shipment) status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    #[default]
    Unfulfilled,
    PartiallyFulfilled,
    Fulfilled,
    Restocked,
    PendingFulfillment,
    Open,
    InProgress,
    OnHold,
    Scheduled,
    InTransit,
    OutForDelivery,
    AttemptedDelivery,
    #[serde(other)]
    Unknown,
}

impl FulfillmentStatus {
    /// Every documented value, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Unfulfilled,
        Self::PartiallyFulfilled,
        Self::Fulfilled,
        Self::Restocked,
        Self::PendingFulfillment,
        Self::Open,
        Self::InProgress,
        Self::OnHold,
        Self::Scheduled,
        Self::InTransit,
        Self::OutForDelivery,
        Self::AttemptedDelivery,
        Self::Unknown,
    ];

    /// Shopify's wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unfulfilled => "UNFULFILLED",
            Self::PartiallyFulfilled => "PARTIALLY_FULFILLED",
            Self::Fulfilled => "FULFILLED",
            Self::Restocked => "RESTOCKED",
            Self::PendingFulfillment => "PENDING_FULFILLMENT",
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::OnHold => "ON_HOLD",
            Self::Scheduled => "SCHEDULED",
            Self::InTransit => "IN_TRANSIT",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::AttemptedDelivery => "ATTEMPTED_DELIVERY",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse leniently; anything unrecognized becomes `Unknown`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        let normalized = normalize(raw);
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FulfillmentStatus {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

/// Order financial (payment) status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinancialStatus {
    #[default]
    Pending,
    Authorized,
    PartiallyPaid,
    Paid,
    PartiallyRefunded,
    Refunded,
    Voided,
    Expired,
    #[serde(other)]
    Unknown,
}

impl FinancialStatus {
    /// Every documented value, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Pending,
        Self::Authorized,
        Self::PartiallyPaid,
        Self::Paid,
        Self::PartiallyRefunded,
        Self::Refunded,
        Self::Voided,
        Self::Expired,
        Self::Unknown,
    ];

    /// Shopify's wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Authorized => "AUTHORIZED",
            Self::PartiallyPaid => "PARTIALLY_PAID",
            Self::Paid => "PAID",
            Self::PartiallyRefunded => "PARTIALLY_REFUNDED",
            Self::Refunded => "REFUNDED",
            Self::Voided => "VOIDED",
            Self::Expired => "EXPIRED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse leniently; anything unrecognized becomes `Unknown`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        let normalized = normalize(raw);
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for FinancialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FinancialStatus {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_known_values() {
        let status: FinancialStatus = serde_json::from_str("\"PARTIALLY_REFUNDED\"").unwrap();
        assert_eq!(status, FinancialStatus::PartiallyRefunded);

        let status: FulfillmentStatus = serde_json::from_str("\"OUT_FOR_DELIVERY\"").unwrap();
        assert_eq!(status, FulfillmentStatus::OutForDelivery);
    }

    #[test]
    fn test_deserialize_unknown_value() {
        let status: FulfillmentStatus = serde_json::from_str("\"TELEPORTED\"").unwrap();
        assert_eq!(status, FulfillmentStatus::Unknown);

        let status: FinancialStatus = serde_json::from_str("\"CHARGED_BACK\"").unwrap();
        assert_eq!(status, FinancialStatus::Unknown);
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(FinancialStatus::parse_lenient("paid"), FinancialStatus::Paid);
        assert_eq!(
            FinancialStatus::parse_lenient(" Partially Paid "),
            FinancialStatus::PartiallyPaid
        );
        assert_eq!(
            FulfillmentStatus::parse_lenient("in-transit"),
            FulfillmentStatus::InTransit
        );
        assert_eq!(
            FulfillmentStatus::parse_lenient(""),
            FulfillmentStatus::Unknown
        );
    }

    #[test]
    fn test_as_str_matches_serde() {
        for status in FulfillmentStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        for status in FinancialStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }
}
