//! Pricing service functions with database access.
//!
//! Stored cars are loaded through the item cache and then priced with the
//! pure functions in [`super::calculators`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::error::AppError;

use super::calculators::{self, Quote};
use super::models::{RentableItem, RentalOptions, TierSchedule};
use super::queries;

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("No date-based price covers {date}")]
    UncoveredDate { date: NaiveDate },

    #[error("Invalid {field} value {value}: expected -1, 0 or a positive amount")]
    InvalidAddOnValue { field: String, value: Decimal },

    #[error("Negative price in {field}")]
    NegativePrice { field: String },

    #[error("Price change rate {rate}% would make the total negative")]
    InvalidPriceChangeRate { rate: Decimal },

    #[error("Amount overflow while computing {step}")]
    AmountOverflow { step: &'static str },

    #[error("Rental day {offset} after {start} is outside the calendar")]
    DateOutOfRange { start: NaiveDate, offset: u64 },
}

impl PricingError {
    /// Stable identifier used in JSON error bodies.
    pub fn error_type(&self) -> &'static str {
        match self {
            PricingError::UncoveredDate { .. } => "uncovered_date",
            PricingError::InvalidAddOnValue { .. } => "invalid_add_on_value",
            PricingError::NegativePrice { .. } => "negative_price",
            PricingError::InvalidPriceChangeRate { .. } => "invalid_price_change_rate",
            PricingError::AmountOverflow { .. } => "amount_overflow",
            PricingError::DateOutOfRange { .. } => "date_out_of_range",
        }
    }

    pub fn details(&self) -> serde_json::Value {
        match self {
            PricingError::UncoveredDate { date } => serde_json::json!({ "date": date }),
            PricingError::InvalidAddOnValue { field, value } => {
                serde_json::json!({ "field": field, "value": value.to_string() })
            }
            PricingError::NegativePrice { field } => serde_json::json!({ "field": field }),
            PricingError::InvalidPriceChangeRate { rate } => {
                serde_json::json!({ "rate": rate.to_string() })
            }
            PricingError::AmountOverflow { step } => serde_json::json!({ "step": step }),
            PricingError::DateOutOfRange { start, offset } => {
                serde_json::json!({ "start": start, "offset": offset })
            }
        }
    }
}

/// Load the pricing view of a stored car, from cache when possible.
pub async fn load_car(
    pool: &PgPool,
    cache: &AppCache,
    car_id: Uuid,
) -> Result<Arc<RentableItem>, AppError> {
    if let Some(cached) = cache.items.get(&car_id).await {
        tracing::debug!("Cache HIT for car: {}", car_id);
        return Ok(cached);
    }
    tracing::debug!("Cache MISS for car: {}", car_id);

    let record = queries::find_car(pool, car_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let bands = if record.is_date_based_price {
        queries::find_date_based_prices(pool, car_id).await?
    } else {
        Vec::new()
    };

    let item = Arc::new(record.into_item(bands));
    cache.items.insert(car_id, Arc::clone(&item)).await;

    Ok(item)
}

/// Quote a stored car. Without an explicit rate the supplier's rate applies.
#[allow(clippy::too_many_arguments)]
pub async fn quote_car(
    pool: &PgPool,
    cache: &AppCache,
    car_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    price_change_rate: Option<Decimal>,
    options: &RentalOptions,
    tiers: &TierSchedule,
) -> Result<Quote, AppError> {
    let item = load_car(pool, cache, car_id).await?;
    let rate = price_change_rate.unwrap_or_else(|| item.price_change_rate());

    calculators::quote(&item, from, to, rate, options, tiers).map_err(|e| {
        tracing::warn!("Pricing failed for car {}: {}", car_id, e);
        AppError::Pricing(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::UncoveredDate {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        };
        assert!(err.to_string().contains("2024-06-03"));

        let err = PricingError::InvalidAddOnValue {
            field: "fullInsurance".to_string(),
            value: dec!(-4),
        };
        assert!(err.to_string().contains("fullInsurance"));
        assert!(err.to_string().contains("-4"));

        let err = PricingError::InvalidPriceChangeRate { rate: dec!(-120) };
        assert!(err.to_string().contains("-120"));
    }

    #[test]
    fn test_pricing_error_details() {
        let err = PricingError::NegativePrice {
            field: "weeklyPrice".to_string(),
        };
        assert_eq!(err.error_type(), "negative_price");
        assert_eq!(err.details()["field"], "weeklyPrice");
    }

    #[tokio::test]
    async fn test_load_car_served_from_cache() {
        // The lazy pool never connects as long as the cache answers.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/rental_pricing_test")
            .unwrap();
        let cache = AppCache::new(10, std::time::Duration::from_secs(60));
        let car_id = Uuid::new_v4();
        let mut item = RentableItem::with_daily_price(dec!(100));
        item.supplier = Some(crate::pricing::models::Supplier {
            name: "Acme".to_string(),
            price_change_rate: dec!(10),
        });
        cache.items.insert(car_id, Arc::new(item)).await;

        let from = "2024-01-01T10:00:00Z".parse().unwrap();
        let to = "2024-01-04T10:00:00Z".parse().unwrap();
        let quote = quote_car(
            &pool,
            &cache,
            car_id,
            from,
            to,
            None,
            &RentalOptions::default(),
            &TierSchedule::default(),
        )
        .await
        .unwrap();

        assert_eq!(quote.days, 3);
        assert_eq!(quote.total, dec!(330));
    }
}
