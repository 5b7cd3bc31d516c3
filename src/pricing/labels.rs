//! Display labels for add-ons.
//!
//! Booking and car screens show each extra as "Unavailable", "Included"
//! or the price it adds. The strings come from an injected [`LocaleTable`]
//! rather than module state, so callers can pass their own wording.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculators::{round_money, MONEY_PLACES};
use super::models::{AddOn, AddOnPrice, RentableItem};
use super::services::PricingError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

/// Wording and number format for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleTable {
    pub unavailable: String,
    pub included: String,
    /// Suffix after a per-day rate, e.g. "/day".
    pub per_day: String,
    pub decimal_separator: char,
    pub group_separator: char,
    pub currency: String,
}

impl LocaleTable {
    pub fn english(currency: &str) -> Self {
        Self {
            unavailable: "Unavailable".to_string(),
            included: "Included".to_string(),
            per_day: "/day".to_string(),
            decimal_separator: '.',
            group_separator: ',',
            currency: currency.to_string(),
        }
    }

    pub fn french(currency: &str) -> Self {
        Self {
            unavailable: "Indisponible".to_string(),
            included: "Inclus".to_string(),
            per_day: "/jour".to_string(),
            decimal_separator: ',',
            group_separator: ' ',
            currency: currency.to_string(),
        }
    }

    pub fn for_locale(locale: Locale, currency: &str) -> Self {
        match locale {
            Locale::En => Self::english(currency),
            Locale::Fr => Self::french(currency),
        }
    }
}

/// Format an amount rounded to cents, without trailing zeros, with the
/// table's separators: `1234.5` is "1,234.5" in English, "1 234,5" in French.
pub fn format_amount(amount: Decimal, table: &LocaleTable) -> String {
    let text = round_money(amount, MONEY_PLACES).normalize().to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(table.group_separator);
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{}{}{}{}", sign, grouped, table.decimal_separator, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Amount followed by the currency, e.g. "20 USD".
pub fn format_money(amount: Decimal, table: &LocaleTable) -> String {
    format!("{} {}", format_amount(amount, table), table.currency)
}

fn plus(hide_plus: bool) -> &'static str {
    if hide_plus {
        ""
    } else {
        "+ "
    }
}

fn flat_option(
    field: &str,
    value: Decimal,
    table: &LocaleTable,
    hide_plus: bool,
) -> Result<String, PricingError> {
    Ok(match AddOnPrice::from_raw(field, value)? {
        AddOnPrice::Unavailable => table.unavailable.clone(),
        AddOnPrice::Included => table.included.clone(),
        AddOnPrice::Charged(amount) => format!("{}{}", plus(hide_plus), format_money(amount, table)),
    })
}

fn per_day_option(
    field: &str,
    value: Decimal,
    days: i64,
    table: &LocaleTable,
    hide_plus: bool,
) -> Result<String, PricingError> {
    let price = AddOnPrice::from_raw(field, value)?;
    Ok(match price {
        AddOnPrice::Unavailable => table.unavailable.clone(),
        AddOnPrice::Included => table.included.clone(),
        AddOnPrice::Charged(rate) => format!(
            "{}{} ({}{})",
            plus(hide_plus),
            format_money(price.cost(days, true)?, table),
            format_money(rate, table),
            table.per_day
        ),
    })
}

pub fn cancellation_option(
    value: Decimal,
    table: &LocaleTable,
    hide_plus: bool,
) -> Result<String, PricingError> {
    flat_option(AddOn::Cancellation.field_name(), value, table, hide_plus)
}

pub fn amendments_option(
    value: Decimal,
    table: &LocaleTable,
    hide_plus: bool,
) -> Result<String, PricingError> {
    flat_option(AddOn::Amendments.field_name(), value, table, hide_plus)
}

pub fn theft_protection_option(
    value: Decimal,
    days: i64,
    table: &LocaleTable,
    hide_plus: bool,
) -> Result<String, PricingError> {
    per_day_option(AddOn::TheftProtection.field_name(), value, days, table, hide_plus)
}

pub fn collision_damage_waiver_option(
    value: Decimal,
    days: i64,
    table: &LocaleTable,
    hide_plus: bool,
) -> Result<String, PricingError> {
    per_day_option(AddOn::CollisionDamageWaiver.field_name(), value, days, table, hide_plus)
}

pub fn full_insurance_option(
    value: Decimal,
    days: i64,
    table: &LocaleTable,
    hide_plus: bool,
) -> Result<String, PricingError> {
    per_day_option(AddOn::FullInsurance.field_name(), value, days, table, hide_plus)
}

pub fn additional_driver_option(
    value: Decimal,
    days: i64,
    table: &LocaleTable,
    hide_plus: bool,
) -> Result<String, PricingError> {
    per_day_option(AddOn::AdditionalDriver.field_name(), value, days, table, hide_plus)
}

/// Label for any add-on of an item.
pub fn add_on_label(
    item: &RentableItem,
    add_on: AddOn,
    days: i64,
    table: &LocaleTable,
    hide_plus: bool,
) -> Result<String, PricingError> {
    let value = item.add_on_value(add_on);
    match add_on {
        AddOn::Cancellation => cancellation_option(value, table, hide_plus),
        AddOn::Amendments => amendments_option(value, table, hide_plus),
        AddOn::TheftProtection => theft_protection_option(value, days, table, hide_plus),
        AddOn::CollisionDamageWaiver => {
            collision_damage_waiver_option(value, days, table, hide_plus)
        }
        AddOn::FullInsurance => full_insurance_option(value, days, table, hide_plus),
        AddOn::AdditionalDriver => additional_driver_option(value, days, table, hide_plus),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn en() -> LocaleTable {
        LocaleTable::english("USD")
    }

    #[test]
    fn test_format_amount_grouping() {
        assert_eq!(format_amount(dec!(1234.5), &en()), "1,234.5");
        assert_eq!(format_amount(dec!(1234567), &en()), "1,234,567");
        assert_eq!(format_amount(dec!(999), &en()), "999");
        assert_eq!(format_amount(dec!(20.00), &en()), "20");
        assert_eq!(format_amount(dec!(-1500.256), &en()), "-1,500.26");
        assert_eq!(
            format_amount(dec!(1234.5), &LocaleTable::french("EUR")),
            "1 234,5"
        );
    }

    #[test]
    fn test_flat_option_branches() {
        assert_eq!(cancellation_option(dec!(-1), &en(), false).unwrap(), "Unavailable");
        assert_eq!(cancellation_option(dec!(0), &en(), false).unwrap(), "Included");
        assert_eq!(cancellation_option(dec!(20), &en(), false).unwrap(), "+ 20 USD");
        assert_eq!(amendments_option(dec!(15), &en(), true).unwrap(), "15 USD");
    }

    #[test]
    fn test_per_day_option_shows_total_and_rate() {
        assert_eq!(
            theft_protection_option(dec!(10), 3, &en(), false).unwrap(),
            "+ 30 USD (10 USD/day)"
        );
        assert_eq!(
            full_insurance_option(dec!(12.5), 2, &LocaleTable::french("EUR"), true).unwrap(),
            "25 EUR (12,5 EUR/jour)"
        );
        assert_eq!(
            additional_driver_option(dec!(-1), 5, &en(), false).unwrap(),
            "Unavailable"
        );
        assert_eq!(
            collision_damage_waiver_option(dec!(0), 5, &LocaleTable::french("EUR"), false)
                .unwrap(),
            "Inclus"
        );
    }

    #[test]
    fn test_option_rejects_invalid_sentinel() {
        let err = theft_protection_option(dec!(-5), 2, &en(), false).unwrap_err();
        assert!(err.to_string().contains("theftProtection"));
    }

    #[test]
    fn test_add_on_label_dispatch() {
        let mut item = RentableItem::with_daily_price(dec!(100));
        item.cancellation = dec!(0);
        item.additional_driver = dec!(8);

        assert_eq!(
            add_on_label(&item, AddOn::Cancellation, 4, &en(), false).unwrap(),
            "Included"
        );
        assert_eq!(
            add_on_label(&item, AddOn::AdditionalDriver, 4, &en(), false).unwrap(),
            "+ 32 USD (8 USD/day)"
        );
        assert_eq!(
            add_on_label(&item, AddOn::Amendments, 4, &en(), false).unwrap(),
            "Unavailable"
        );
    }
}
