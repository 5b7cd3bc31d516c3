//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::Quote;
use super::models::AddOn;

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl MoneyResponse {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
        }
    }
}

/// Response for day counting
#[derive(Debug, Serialize)]
pub struct DaysResponse {
    pub days: i64,
}

/// One charged add-on
#[derive(Debug, Serialize)]
pub struct AddOnLineResponse {
    pub add_on: AddOn,
    pub amount: MoneyResponse,
}

/// Response for a rental quote
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub days: i64,
    pub base: MoneyResponse,
    pub add_ons: Vec<AddOnLineResponse>,
    pub extras: MoneyResponse,
    pub subtotal: MoneyResponse,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_change_rate: Decimal,
    pub adjustment: MoneyResponse,
    pub total: MoneyResponse,
}

impl QuoteResponse {
    pub fn from_quote(quote: Quote, currency: &str) -> Self {
        Self {
            days: quote.days,
            base: MoneyResponse::new(quote.base, currency),
            add_ons: quote
                .add_ons
                .into_iter()
                .map(|line| AddOnLineResponse {
                    add_on: line.add_on,
                    amount: MoneyResponse::new(line.amount, currency),
                })
                .collect(),
            extras: MoneyResponse::new(quote.extras, currency),
            subtotal: MoneyResponse::new(quote.subtotal, currency),
            price_change_rate: quote.price_change_rate,
            adjustment: MoneyResponse::new(quote.adjustment, currency),
            total: MoneyResponse::new(quote.total, currency),
        }
    }
}

/// Label of one add-on
#[derive(Debug, Serialize)]
pub struct AddOnLabelResponse {
    pub add_on: AddOn,
    pub label: String,
}

/// Response for add-on labels
#[derive(Debug, Serialize)]
pub struct LabelsResponse {
    pub days: i64,
    pub labels: Vec<AddOnLabelResponse>,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
