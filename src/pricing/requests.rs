//! Request DTOs for pricing API endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::labels::Locale;
use super::models::{RentableItem, RentalOptions};

/// Request to count rental days
#[derive(Debug, Deserialize)]
pub struct DaysRequest {
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

/// Request to price a single add-on from its raw value
#[derive(Debug, Deserialize)]
pub struct AddOnCostRequest {
    pub value: Decimal,
    pub days: i64,
    #[serde(default)]
    pub per_day: bool,
}

/// Request to quote an item supplied in the body
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub item: RentableItem,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// Falls back to the item's supplier rate
    #[serde(default)]
    pub price_change_rate: Option<Decimal>,
    #[serde(default)]
    pub options: RentalOptions,
}

/// Request to quote a stored car
#[derive(Debug, Deserialize)]
pub struct CarQuoteRequest {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    #[serde(default)]
    pub price_change_rate: Option<Decimal>,
    #[serde(default)]
    pub options: RentalOptions,
}

/// Request to render add-on labels
#[derive(Debug, Deserialize)]
pub struct LabelsRequest {
    pub item: RentableItem,
    pub days: i64,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub hide_plus: bool,
}
