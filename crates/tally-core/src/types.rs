//! # Domain Types
//!
//! Core domain types used throughout Tally POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ProductSnapshot │   │      Sale       │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (EntityId)  │   │  id (EntityId)  │   │  CASH           │       │
//! │  │  sku, name      │   │  status         │   │  CARD           │       │
//! │  │  unit_price     │   │  subtotal       │   │  TRANSFER       │       │
//! │  │  stock          │   │  discount_amount│   └─────────────────┘       │
//! │  │  min_stock      │   │  total          │                             │
//! │  └─────────────────┘   └─────────────────┘   ┌─────────────────┐       │
//! │                                              │    Discount     │       │
//! │  ┌─────────────────┐                         │  ─────────────  │       │
//! │  │   SaleStatus    │                         │  bps (u32)      │       │
//! │  │  CONFIRMED      │                         │  1000 = 10%     │       │
//! │  │  CANCELED       │                         └─────────────────┘       │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A [`ProductSnapshot`] is the catalog's view of a product at the moment it
//! was fetched. Stock is NOT live: another register may sell the last unit
//! a second later. The backend has the final word at commit time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{self, Money};
use crate::validation::ValidationResult;

// =============================================================================
// Entity Identifier
// =============================================================================

/// A backend identifier, kept in the JSON shape it arrived in.
///
/// Some backend tables use integer keys and others text keys (UUID, cuid).
/// Whatever was received is echoed back unchanged in the sale payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum EntityId {
    Numeric(i64),
    Text(String),
}

impl EntityId {
    /// Parses operator input: all-digit strings become numeric ids.
    pub fn parse(input: &str) -> ValidationResult<EntityId> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::Required {
                field: "id".to_string(),
            });
        }
        Ok(input
            .parse::<i64>()
            .map(EntityId::Numeric)
            .unwrap_or_else(|_| EntityId::Text(input.to_string())))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Numeric(id) => write!(f, "{}", id),
            EntityId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        EntityId::Numeric(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        EntityId::Text(id.to_string())
    }
}

// =============================================================================
// Product Snapshot
// =============================================================================

/// A catalog product as seen by the register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductSnapshot {
    pub id: EntityId,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown to the cashier.
    pub name: String,

    /// Current price at the time of the catalog fetch.
    pub unit_price: Money,

    /// Units available at the time of the catalog fetch.
    pub stock: i64,

    /// Low-stock threshold configured for the product.
    pub min_stock: i64,

    /// Inactive products are hidden from search and cannot be sold.
    pub is_active: bool,
}

impl ProductSnapshot {
    /// True when leaving `remaining` units puts the product in `(0, min_stock]`.
    pub fn low_stock_after(&self, remaining: i64) -> bool {
        remaining > 0 && remaining <= self.min_stock
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays. Serialized exactly as the backend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum PaymentMethod {
    /// Physical cash payment. Default for a fresh ticket.
    #[default]
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Bank transfer.
    Transfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Transfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" | "credit" | "debit" => Ok(PaymentMethod::Card),
            "transfer" | "bank" => Ok(PaymentMethod::Transfer),
            _ => Err(ValidationError::NotAllowed {
                field: "paymentMethod".to_string(),
                allowed: PaymentMethod::ALL
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Discount
// =============================================================================

/// A whole-ticket percentage discount in basis points.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%. 1250 bps = 12.5%. Integer storage keeps the
/// discount exact; the backend receives it as a percent number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Discount(u32);

impl Discount {
    /// 100% in basis points.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a discount from basis points (0..=10000).
    pub fn from_bps(bps: u32) -> ValidationResult<Self> {
        if bps > Self::MAX_BPS {
            return Err(ValidationError::OutOfRange {
                field: "discountPercent".to_string(),
                min: 0,
                max: 100,
            });
        }
        Ok(Discount(bps))
    }

    /// Creates a discount from a whole percentage (0..=100).
    pub fn from_percent(percent: u32) -> ValidationResult<Self> {
        Self::from_bps(percent.saturating_mul(100))
    }

    /// Parses operator input such as "10", "12.5" or "7.25%".
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::types::Discount;
    ///
    /// assert_eq!(Discount::parse("12.5").unwrap().bps(), 1250);
    /// assert!(Discount::parse("101").is_err());
    /// ```
    pub fn parse(input: &str) -> ValidationResult<Self> {
        let text = input.trim().trim_end_matches('%');
        // A percent with two decimals has the same digits as an amount in cents.
        let bps = Money::parse_decimal(text)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "discountPercent".to_string(),
                reason: format!("'{}' is not a percentage", input.trim()),
            })?
            .cents();
        if !(0..=i64::from(Self::MAX_BPS)).contains(&bps) {
            return Err(ValidationError::OutOfRange {
                field: "discountPercent".to_string(),
                min: 0,
                max: 100,
            });
        }
        Self::from_bps(bps as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The percent as a JSON number: `10` for 1000 bps, `12.5` for 1250 bps.
    pub fn as_percent_number(&self) -> serde_json::Number {
        if self.0 % 100 == 0 {
            serde_json::Number::from(self.0 / 100)
        } else {
            serde_json::Number::from_f64(f64::from(self.0) / 100.0)
                .unwrap_or_else(|| serde_json::Number::from(self.0 / 100))
        }
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            let text = format!("{}.{:02}", self.0 / 100, self.0 % 100);
            write!(f, "{}%", text.trim_end_matches('0'))
        }
    }
}

// =============================================================================
// Sale (backend response)
// =============================================================================

/// Lifecycle status of a sale as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    Confirmed,
    Canceled,
    #[serde(other)]
    Unknown,
}

/// A line of a committed sale, with the price the backend applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: EntityId,
    pub quantity: i64,
    #[serde(with = "money::decimal")]
    pub unit_price: Money,
    #[serde(with = "money::decimal")]
    pub subtotal: Money,
}

/// A sale created (or canceled) by the backend.
///
/// The backend is the source of truth for pricing: these totals may differ
/// from the ticket's if a price changed between lookup and commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: EntityId,
    #[serde(default)]
    pub items: Vec<SaleItem>,
    #[serde(with = "money::decimal")]
    pub subtotal: Money,
    #[serde(with = "money::decimal", default)]
    pub discount_amount: Money,
    #[serde(with = "money::decimal")]
    pub total: Money,
    pub status: SaleStatus,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_keeps_json_shape() {
        let numeric: EntityId = serde_json::from_str("42").unwrap();
        assert_eq!(numeric, EntityId::Numeric(42));
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "42");

        let text: EntityId = serde_json::from_str(r#""clx9a""#).unwrap();
        assert_eq!(text, EntityId::Text("clx9a".to_string()));
        assert_eq!(serde_json::to_string(&text).unwrap(), r#""clx9a""#);
    }

    #[test]
    fn test_entity_id_parse() {
        assert_eq!(EntityId::parse("17").unwrap(), EntityId::Numeric(17));
        assert_eq!(EntityId::parse(" abc ").unwrap(), EntityId::from("abc"));
        assert!(EntityId::parse("  ").is_err());
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Transfer).unwrap(), r#""TRANSFER""#);
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_discount_bounds() {
        assert!(Discount::from_percent(100).is_ok());
        assert!(Discount::from_percent(101).is_err());
        assert!(Discount::from_bps(10_001).is_err());
        assert!(Discount::parse("-5").is_err());
        assert!(Discount::parse("ten").is_err());
        assert_eq!(Discount::parse("7.25%").unwrap().bps(), 725);
    }

    #[test]
    fn test_discount_percent_number() {
        assert_eq!(Discount::from_percent(10).unwrap().as_percent_number().to_string(), "10");
        assert_eq!(Discount::from_bps(1250).unwrap().as_percent_number().to_string(), "12.5");
        assert_eq!(Discount::from_bps(0).unwrap().as_percent_number().to_string(), "0");
    }

    #[test]
    fn test_discount_display() {
        assert_eq!(Discount::from_bps(1000).unwrap().to_string(), "10%");
        assert_eq!(Discount::from_bps(1250).unwrap().to_string(), "12.5%");
        assert_eq!(Discount::from_bps(725).unwrap().to_string(), "7.25%");
    }

    #[test]
    fn test_low_stock_window() {
        let product = ProductSnapshot {
            id: EntityId::Numeric(1),
            sku: "COKE-330".to_string(),
            name: "Coke 330ml".to_string(),
            unit_price: Money::from_cents(150),
            stock: 10,
            min_stock: 3,
            is_active: true,
        };
        assert!(!product.low_stock_after(0));
        assert!(product.low_stock_after(1));
        assert!(product.low_stock_after(3));
        assert!(!product.low_stock_after(4));
    }

    #[test]
    fn test_sale_deserializes_backend_body() {
        let body = r#"{
            "id": 981,
            "items": [{"productId": 5, "quantity": 2, "unitPrice": "100.00", "subtotal": 200}],
            "subtotal": "200.00",
            "discountAmount": 20,
            "total": 180,
            "status": "CONFIRMED",
            "paymentMethod": "CARD",
            "createdAt": "2026-03-01T10:15:00.000Z",
            "customer": null
        }"#;
        let sale: Sale = serde_json::from_str(body).unwrap();
        assert_eq!(sale.id, EntityId::Numeric(981));
        assert_eq!(sale.items[0].unit_price.cents(), 10000);
        assert_eq!(sale.total.cents(), 18000);
        assert_eq!(sale.status, SaleStatus::Confirmed);
        assert_eq!(sale.payment_method, Some(PaymentMethod::Card));
    }
}
