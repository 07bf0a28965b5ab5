//! Freight quote payloads and display formatting.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tradeyard_core::{CurrencyCode, Handle, Price, ProductId};

use crate::catalog::{Dimensions, ShippingOption};
use crate::stores::{CartItem, CartStore};

/// Placeholder shown for missing quote fields.
pub const NOT_AVAILABLE: &str = "N/A";

const UNKNOWN_CARRIER: &str = "Unknown carrier";

// =============================================================================
// Request
// =============================================================================

/// Payload sent to the freight quote endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreightQuoteRequest {
    pub origin_postal_code: String,
    pub destination_postal_code: String,
    /// Sum of unit weight × quantity over lines with known dimensions.
    pub total_weight_lbs: f64,
    pub items: Vec<FreightLine>,
}

/// One cart line as described to the quoting service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreightLine {
    pub product_id: ProductId,
    pub handle: Handle,
    pub quantity: u32,
    pub dimensions: Option<Dimensions>,
}

impl FreightLine {
    fn from_item(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id,
            handle: item.product.handle.clone(),
            quantity: item.quantity,
            dimensions: item.product.dimensions,
        }
    }

    fn weight_lbs(&self) -> f64 {
        self.dimensions
            .map_or(0.0, |d| d.weight_lbs * f64::from(self.quantity))
    }
}

impl FreightQuoteRequest {
    /// Build a request covering every line in the cart.
    #[must_use]
    pub fn from_cart(cart: &CartStore, origin: &str, destination: &str) -> Self {
        Self::from_lines(
            cart.items().iter().map(FreightLine::from_item).collect(),
            origin,
            destination,
        )
    }

    /// Build a request for a single cart line.
    #[must_use]
    pub fn for_item(item: &CartItem, origin: &str, destination: &str) -> Self {
        Self::from_lines(vec![FreightLine::from_item(item)], origin, destination)
    }

    fn from_lines(items: Vec<FreightLine>, origin: &str, destination: &str) -> Self {
        let total_weight_lbs = items.iter().map(FreightLine::weight_lbs).sum();
        Self {
            origin_postal_code: origin.trim().to_string(),
            destination_postal_code: destination.trim().to_string(),
            total_weight_lbs,
            items,
        }
    }
}

// =============================================================================
// Response
// =============================================================================

/// A carrier quote as returned by the quoting service.
///
/// Every field is optional. Values of the wrong shape (`"price": "N/A"`,
/// `"estimatedDays": "3-5"`) read as missing so one sloppy carrier cannot
/// spoil the rest of the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFreightQuote")]
pub struct FreightQuote {
    pub id: Option<String>,
    pub price: Option<Decimal>,
    pub estimated_days: Option<u32>,
    pub carrier: Option<String>,
}

/// Wire form of a quote before field-level validation.
#[derive(Deserialize)]
struct RawFreightQuote {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    price: Option<Value>,
    #[serde(default)]
    estimated_days: Option<Value>,
    #[serde(default, rename = "estimatedDays")]
    estimated_days_camel: Option<Value>,
    #[serde(default)]
    carrier: Option<Value>,
}

impl From<RawFreightQuote> for FreightQuote {
    fn from(raw: RawFreightQuote) -> Self {
        Self {
            id: raw.id.and_then(id_value),
            price: raw.price.and_then(price_value),
            // snake_case wins when a carrier sends both
            estimated_days: raw
                .estimated_days
                .and_then(days_value)
                .or_else(|| raw.estimated_days_camel.and_then(days_value)),
            carrier: match raw.carrier {
                Some(Value::String(s)) => Some(s),
                _ => None,
            },
        }
    }
}

impl FreightQuote {
    /// Convert into a cart shipping option. Unpriced quotes cannot be
    /// selected and yield `None`.
    #[must_use]
    pub fn to_shipping_option(&self, currency: CurrencyCode) -> Option<ShippingOption> {
        let amount = self.price?;
        Some(ShippingOption {
            id: self.id.clone().unwrap_or_else(|| "freight".to_string()),
            carrier: self
                .carrier
                .clone()
                .unwrap_or_else(|| UNKNOWN_CARRIER.to_string()),
            price: Price::new(amount, currency),
            estimated_days: self.estimated_days,
        })
    }
}

/// Quote IDs arrive as strings or bare numbers depending on the carrier.
fn id_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A non-negative decimal, from a JSON number or numeric string.
fn price_value(value: Value) -> Option<Decimal> {
    let amount = match value {
        Value::Number(n) => {
            let raw = n.to_string();
            Decimal::from_str(&raw)
                .or_else(|_| Decimal::from_scientific(&raw))
                .ok()?
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok()?,
        _ => return None,
    };
    (!amount.is_sign_negative()).then_some(amount)
}

/// A whole number of days, from a JSON integer or integer string.
fn days_value(value: Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|d| u32::try_from(d).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// =============================================================================
// Display
// =============================================================================

/// A quote formatted for a selectable list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteOption {
    pub id: String,
    pub carrier: String,
    pub price: Option<Decimal>,
    pub estimated_days: Option<u32>,
    /// e.g. `"$125.50"` or `"N/A"`.
    pub price_label: String,
    /// e.g. `"3 business days"` or `"N/A"`.
    pub eta_label: String,
    /// e.g. `"Estes - $125.50 (3 business days)"`.
    pub label: String,
}

impl QuoteOption {
    /// Whether the option carries a price and can be selected.
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        self.price.is_some()
    }

    /// The quote this option was formatted from.
    #[must_use]
    pub fn to_quote(&self) -> FreightQuote {
        FreightQuote {
            id: Some(self.id.clone()),
            price: self.price,
            estimated_days: self.estimated_days,
            carrier: Some(self.carrier.clone()),
        }
    }
}

/// Format quotes into display options, preserving order.
///
/// Missing prices and ETAs render as `"N/A"`; a missing ID falls back to
/// `quote-{index}`.
#[must_use]
pub fn format_quotes(quotes: &[FreightQuote]) -> Vec<QuoteOption> {
    quotes
        .iter()
        .enumerate()
        .map(|(index, quote)| {
            let carrier = quote
                .carrier
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(UNKNOWN_CARRIER)
                .to_string();
            let price_label = quote.price.map_or_else(
                || NOT_AVAILABLE.to_string(),
                |amount| Price::new(amount, CurrencyCode::USD).display(),
            );
            let eta_label = match quote.estimated_days {
                Some(1) => "1 business day".to_string(),
                Some(days) => format!("{days} business days"),
                None => NOT_AVAILABLE.to_string(),
            };
            let label = format!("{carrier} - {price_label} ({eta_label})");

            QuoteOption {
                id: quote
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("quote-{index}")),
                carrier,
                price: quote.price,
                estimated_days: quote.estimated_days,
                price_label,
                eta_label,
                label,
            }
        })
        .collect()
}
