//! Core pricing calculation functions.
//!
//! Pure functions for rental pricing math - no database access, no clock.
//! Callers supply already-parsed instants and the item being rented.

use chrono::{DateTime, Days, Duration, Utc};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::models::{AddOn, AddOnPrice, RentableItem, RentalOptions, TierSchedule};
use super::services::PricingError;

/// Minor-unit precision of every quoted amount.
pub const MONEY_PLACES: u32 = 2;

/// Round half-up (midpoint away from zero) to `places` decimals.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use rental_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(1.005), 2), dec!(1.01));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Number of rental days between two instants, rounded up.
///
/// A rental of 25 hours is two days. Missing instants, and ranges where
/// `to` is not after `from`, yield `0` rather than an error; callers that
/// disallow zero-day rentals must check the result.
pub fn days(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> i64 {
    match (from, to) {
        (Some(from), Some(to)) if to > from => {
            let span = to - from;
            let whole = span.num_days();
            if span > Duration::days(whole) {
                whole + 1
            } else {
                whole
            }
        }
        _ => 0,
    }
}

/// Rental price before add-ons and supplier adjustment.
///
/// Date-based items sum the band rate of each rental day, starting on the
/// calendar date of `from`. Other items are decomposed into the longest
/// priced brackets first (see [`TierSchedule`]); leftover days are charged
/// at the discounted daily price when set, else the daily price.
pub fn base_price(
    item: &RentableItem,
    from: DateTime<Utc>,
    days: i64,
    tiers: &TierSchedule,
) -> Result<Decimal, PricingError> {
    item.validate_prices()?;

    if days <= 0 {
        return Ok(Decimal::ZERO);
    }

    if item.is_date_based_price {
        date_based_price(item, from, days)
    } else {
        tiered_price(item, days, tiers)
    }
}

fn date_based_price(
    item: &RentableItem,
    from: DateTime<Utc>,
    days: i64,
) -> Result<Decimal, PricingError> {
    let start = from.date_naive();
    let mut total = Decimal::ZERO;

    for offset in 0..days as u64 {
        let date = start
            .checked_add_days(Days::new(offset))
            .ok_or(PricingError::DateOutOfRange { start, offset })?;

        // Overlapping bands: the first one in stored order wins.
        let band = item
            .date_based_prices
            .iter()
            .find(|band| band.contains(date))
            .ok_or(PricingError::UncoveredDate { date })?;

        total = checked_add(total, band.daily_price, "date-based price")?;
    }

    Ok(total)
}

/// Discounted price when set and non-zero, else the regular one. A zero
/// discount is treated as "no discount", never as a free bracket.
fn effective_price(discounted: Option<Decimal>, regular: Option<Decimal>) -> Option<Decimal> {
    discounted.filter(|p| !p.is_zero()).or(regular)
}

fn tiered_price(
    item: &RentableItem,
    days: i64,
    tiers: &TierSchedule,
) -> Result<Decimal, PricingError> {
    let mut brackets = [
        (
            tiers.monthly_days,
            effective_price(item.discounted_monthly_price, item.monthly_price),
        ),
        (
            tiers.bi_weekly_days,
            effective_price(item.discounted_bi_weekly_price, item.bi_weekly_price),
        ),
        (
            tiers.weekly_days,
            effective_price(item.discounted_weekly_price, item.weekly_price),
        ),
    ];
    brackets.sort_by(|a, b| b.0.cmp(&a.0));

    let mut remaining = days;
    let mut total = Decimal::ZERO;

    for (length, price) in brackets {
        let Some(price) = price else { continue };
        if length <= 0 || remaining < length {
            continue;
        }
        let bracket = checked_mul(price, Decimal::from(remaining / length), "tier price")?;
        total = checked_add(total, bracket, "tier price")?;
        remaining %= length;
    }

    let daily = effective_price(item.discounted_daily_price, Some(item.daily_price))
        .unwrap_or(item.daily_price);
    let leftover = checked_mul(daily, Decimal::from(remaining), "daily price")?;
    checked_add(total, leftover, "daily price")
}

fn checked_add(a: Decimal, b: Decimal, step: &'static str) -> Result<Decimal, PricingError> {
    a.checked_add(b).ok_or(PricingError::AmountOverflow { step })
}

fn checked_mul(a: Decimal, b: Decimal, step: &'static str) -> Result<Decimal, PricingError> {
    a.checked_mul(b).ok_or(PricingError::AmountOverflow { step })
}

/// Cost of one add-on from its raw value.
///
/// `-1` (unavailable) and `0` (included) cost nothing; a positive value
/// is multiplied by `days` when `per_day`, else charged once. Any other
/// negative value is rejected.
pub fn add_on_cost(value: Decimal, days: i64, per_day: bool) -> Result<Decimal, PricingError> {
    AddOnPrice::from_raw("value", value)?.cost(days, per_day)
}

/// One charged add-on in a quote
#[derive(Debug, Clone, PartialEq)]
pub struct AddOnLine {
    pub add_on: AddOn,
    pub amount: Decimal,
}

/// Priced breakdown of a rental
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub days: i64,
    pub base: Decimal,
    pub add_ons: Vec<AddOnLine>,
    pub extras: Decimal,
    pub subtotal: Decimal,
    pub price_change_rate: Decimal,
    /// Effect of the price change rate on the rounded total.
    pub adjustment: Decimal,
    pub total: Decimal,
}

/// Price a rental and keep the breakdown.
///
/// Only add-ons that are both selected and priced above zero produce a
/// line. The subtotal is scaled by `1 + price_change_rate / 100` and the
/// result rounded half-up to cents.
pub fn quote(
    item: &RentableItem,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    price_change_rate: Decimal,
    options: &RentalOptions,
    tiers: &TierSchedule,
) -> Result<Quote, PricingError> {
    if price_change_rate < -Decimal::ONE_HUNDRED {
        return Err(PricingError::InvalidPriceChangeRate {
            rate: price_change_rate,
        });
    }

    let days = days(Some(from), Some(to));
    let base = base_price(item, from, days, tiers)?;

    let mut add_ons = Vec::new();
    for add_on in AddOn::ALL {
        // Decode every add-on so a malformed item is rejected even when
        // the renter did not pick the broken extra.
        let price = item.add_on_price(add_on)?;
        if !options.is_selected(add_on) {
            continue;
        }
        if let AddOnPrice::Charged(_) = price {
            add_ons.push(AddOnLine {
                add_on,
                amount: price.cost(days, add_on.is_per_day())?,
            });
        }
    }

    let extras = add_ons
        .iter()
        .try_fold(Decimal::ZERO, |sum, line| checked_add(sum, line.amount, "extras"))?;
    let subtotal = checked_add(base, extras, "subtotal")?;
    let factor = checked_add(
        Decimal::ONE,
        price_change_rate / Decimal::ONE_HUNDRED,
        "price change rate",
    )?;
    let mut total = round_money(checked_mul(subtotal, factor, "total")?, MONEY_PLACES);
    total.rescale(MONEY_PLACES);

    Ok(Quote {
        days,
        base,
        add_ons,
        extras,
        subtotal,
        price_change_rate,
        adjustment: total
            .checked_sub(subtotal)
            .ok_or(PricingError::AmountOverflow { step: "adjustment" })?,
        total,
    })
}

/// Total price of a rental, rounded to cents.
pub fn calculate_total_price(
    item: &RentableItem,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    price_change_rate: Decimal,
    options: &RentalOptions,
    tiers: &TierSchedule,
) -> Result<Decimal, PricingError> {
    quote(item, from, to, price_change_rate, options, tiers).map(|q| q.total)
}
