//! Domain models for rental pricing.
//!
//! A car and a dress price the same way, so both are represented by
//! [`RentableItem`]. Raw add-on values keep the back office encoding
//! (`-1` unavailable, `0` included, positive surcharge) and are decoded
//! into [`AddOnPrice`] before any arithmetic happens.
//!
//! The `*Record` types are the sqlx rows a stored car is loaded from.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::services::PricingError;

/// Raw sentinel for an add-on the supplier does not offer.
pub const UNAVAILABLE: Decimal = Decimal::NEGATIVE_ONE;

/// Seasonal daily rate covering `start_date..=end_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateBasedPriceBand {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub daily_price: Decimal,
}

impl DateBasedPriceBand {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Supplier attached to an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(default)]
    pub name: String,
    /// Percentage applied to every total quoted for this supplier (10 = +10%).
    #[serde(default)]
    pub price_change_rate: Decimal,
}

/// Car or dress as seen by the pricing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentableItem {
    pub daily_price: Decimal,
    #[serde(default)]
    pub discounted_daily_price: Option<Decimal>,
    #[serde(default)]
    pub bi_weekly_price: Option<Decimal>,
    #[serde(default)]
    pub discounted_bi_weekly_price: Option<Decimal>,
    #[serde(default)]
    pub weekly_price: Option<Decimal>,
    #[serde(default)]
    pub discounted_weekly_price: Option<Decimal>,
    #[serde(default)]
    pub monthly_price: Option<Decimal>,
    #[serde(default)]
    pub discounted_monthly_price: Option<Decimal>,
    #[serde(default)]
    pub is_date_based_price: bool,
    #[serde(default)]
    pub date_based_prices: Vec<DateBasedPriceBand>,

    #[serde(default = "unavailable")]
    pub cancellation: Decimal,
    #[serde(default = "unavailable")]
    pub amendments: Decimal,
    #[serde(default = "unavailable")]
    pub theft_protection: Decimal,
    #[serde(default = "unavailable")]
    pub collision_damage_waiver: Decimal,
    #[serde(default = "unavailable")]
    pub full_insurance: Decimal,
    #[serde(default = "unavailable")]
    pub additional_driver: Decimal,

    #[serde(default)]
    pub supplier: Option<Supplier>,
}

fn unavailable() -> Decimal {
    UNAVAILABLE
}

impl RentableItem {
    /// Item priced only by its daily rate, with every add-on unavailable.
    pub fn with_daily_price(daily_price: Decimal) -> Self {
        Self {
            daily_price,
            discounted_daily_price: None,
            bi_weekly_price: None,
            discounted_bi_weekly_price: None,
            weekly_price: None,
            discounted_weekly_price: None,
            monthly_price: None,
            discounted_monthly_price: None,
            is_date_based_price: false,
            date_based_prices: Vec::new(),
            cancellation: UNAVAILABLE,
            amendments: UNAVAILABLE,
            theft_protection: UNAVAILABLE,
            collision_damage_waiver: UNAVAILABLE,
            full_insurance: UNAVAILABLE,
            additional_driver: UNAVAILABLE,
            supplier: None,
        }
    }

    /// Raw sentinel value stored for an add-on.
    pub fn add_on_value(&self, add_on: AddOn) -> Decimal {
        match add_on {
            AddOn::Cancellation => self.cancellation,
            AddOn::Amendments => self.amendments,
            AddOn::TheftProtection => self.theft_protection,
            AddOn::CollisionDamageWaiver => self.collision_damage_waiver,
            AddOn::FullInsurance => self.full_insurance,
            AddOn::AdditionalDriver => self.additional_driver,
        }
    }

    /// Decoded price of an add-on.
    pub fn add_on_price(&self, add_on: AddOn) -> Result<AddOnPrice, PricingError> {
        AddOnPrice::from_raw(add_on.field_name(), self.add_on_value(add_on))
    }

    /// Supplier markup, zero when the item has no supplier.
    pub fn price_change_rate(&self) -> Decimal {
        self.supplier
            .as_ref()
            .map(|s| s.price_change_rate)
            .unwrap_or(Decimal::ZERO)
    }

    /// Rejects negative daily, tier and band prices.
    pub fn validate_prices(&self) -> Result<(), PricingError> {
        let fields = [
            ("dailyPrice", Some(self.daily_price)),
            ("discountedDailyPrice", self.discounted_daily_price),
            ("biWeeklyPrice", self.bi_weekly_price),
            ("discountedBiWeeklyPrice", self.discounted_bi_weekly_price),
            ("weeklyPrice", self.weekly_price),
            ("discountedWeeklyPrice", self.discounted_weekly_price),
            ("monthlyPrice", self.monthly_price),
            ("discountedMonthlyPrice", self.discounted_monthly_price),
        ];
        for (field, value) in fields {
            if matches!(value, Some(v) if v < Decimal::ZERO) {
                return Err(PricingError::NegativePrice {
                    field: field.to_string(),
                });
            }
        }
        if let Some(i) = self
            .date_based_prices
            .iter()
            .position(|band| band.daily_price < Decimal::ZERO)
        {
            return Err(PricingError::NegativePrice {
                field: format!("dateBasedPrices[{}].dailyPrice", i),
            });
        }
        Ok(())
    }
}

/// Optional rental extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddOn {
    Cancellation,
    Amendments,
    TheftProtection,
    CollisionDamageWaiver,
    FullInsurance,
    AdditionalDriver,
}

impl AddOn {
    pub const ALL: [AddOn; 6] = [
        AddOn::Cancellation,
        AddOn::Amendments,
        AddOn::TheftProtection,
        AddOn::CollisionDamageWaiver,
        AddOn::FullInsurance,
        AddOn::AdditionalDriver,
    ];

    /// Insurance and driver extras are charged per rental day; the
    /// flexibility extras are a flat fee.
    pub fn is_per_day(self) -> bool {
        !matches!(self, AddOn::Cancellation | AddOn::Amendments)
    }

    pub fn field_name(self) -> &'static str {
        match self {
            AddOn::Cancellation => "cancellation",
            AddOn::Amendments => "amendments",
            AddOn::TheftProtection => "theftProtection",
            AddOn::CollisionDamageWaiver => "collisionDamageWaiver",
            AddOn::FullInsurance => "fullInsurance",
            AddOn::AdditionalDriver => "additionalDriver",
        }
    }
}

/// Decoded add-on sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOnPrice {
    Unavailable,
    Included,
    Charged(Decimal),
}

impl AddOnPrice {
    /// Decode a raw back office value. `field` names the add-on in errors.
    pub fn from_raw(field: &str, value: Decimal) -> Result<Self, PricingError> {
        if value == UNAVAILABLE {
            Ok(AddOnPrice::Unavailable)
        } else if value.is_zero() {
            Ok(AddOnPrice::Included)
        } else if value > Decimal::ZERO {
            Ok(AddOnPrice::Charged(value))
        } else {
            Err(PricingError::InvalidAddOnValue {
                field: field.to_string(),
                value,
            })
        }
    }

    /// Amount charged for `days` of rental.
    pub fn cost(self, days: i64, per_day: bool) -> Result<Decimal, PricingError> {
        match self {
            AddOnPrice::Unavailable | AddOnPrice::Included => Ok(Decimal::ZERO),
            AddOnPrice::Charged(amount) if per_day => amount
                .checked_mul(Decimal::from(days.max(0)))
                .ok_or(PricingError::AmountOverflow { step: "add-on cost" }),
            AddOnPrice::Charged(amount) => Ok(amount),
        }
    }
}

/// Add-ons picked by the renter for one booking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RentalOptions {
    pub cancellation: bool,
    pub amendments: bool,
    pub theft_protection: bool,
    pub collision_damage_waiver: bool,
    pub full_insurance: bool,
    pub additional_driver: bool,
}

impl RentalOptions {
    pub fn is_selected(&self, add_on: AddOn) -> bool {
        match add_on {
            AddOn::Cancellation => self.cancellation,
            AddOn::Amendments => self.amendments,
            AddOn::TheftProtection => self.theft_protection,
            AddOn::CollisionDamageWaiver => self.collision_damage_waiver,
            AddOn::FullInsurance => self.full_insurance,
            AddOn::AdditionalDriver => self.additional_driver,
        }
    }

    /// Returns a copy with `add_on` flipped.
    pub fn toggled(mut self, add_on: AddOn) -> Self {
        let flag = match add_on {
            AddOn::Cancellation => &mut self.cancellation,
            AddOn::Amendments => &mut self.amendments,
            AddOn::TheftProtection => &mut self.theft_protection,
            AddOn::CollisionDamageWaiver => &mut self.collision_damage_waiver,
            AddOn::FullInsurance => &mut self.full_insurance,
            AddOn::AdditionalDriver => &mut self.additional_driver,
        };
        *flag = !*flag;
        self
    }

    pub fn selected(&self) -> impl Iterator<Item = AddOn> + '_ {
        AddOn::ALL.into_iter().filter(|a| self.is_selected(*a))
    }
}

/// Bracket lengths, in days, for tiered totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierSchedule {
    pub monthly_days: i64,
    pub bi_weekly_days: i64,
    pub weekly_days: i64,
}

impl Default for TierSchedule {
    fn default() -> Self {
        Self {
            monthly_days: 30,
            bi_weekly_days: 14,
            weekly_days: 7,
        }
    }
}

/// Car row from `cars`, joined with its supplier's rate.
#[derive(Debug, Clone, FromRow)]
pub struct CarRecord {
    pub id: Uuid,
    pub daily_price: Decimal,
    pub discounted_daily_price: Option<Decimal>,
    pub bi_weekly_price: Option<Decimal>,
    pub discounted_bi_weekly_price: Option<Decimal>,
    pub weekly_price: Option<Decimal>,
    pub discounted_weekly_price: Option<Decimal>,
    pub monthly_price: Option<Decimal>,
    pub discounted_monthly_price: Option<Decimal>,
    pub is_date_based_price: bool,
    pub cancellation: Decimal,
    pub amendments: Decimal,
    pub theft_protection: Decimal,
    pub collision_damage_waiver: Decimal,
    pub full_insurance: Decimal,
    pub additional_driver: Decimal,
    pub supplier_name: Option<String>,
    pub price_change_rate: Option<Decimal>,
}

/// Band row from `date_based_prices`
#[derive(Debug, Clone, FromRow)]
pub struct DateBasedPriceRecord {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub daily_price: Decimal,
}

impl From<DateBasedPriceRecord> for DateBasedPriceBand {
    fn from(r: DateBasedPriceRecord) -> Self {
        Self {
            start_date: r.start_date,
            end_date: r.end_date,
            daily_price: r.daily_price,
        }
    }
}

impl CarRecord {
    /// Assemble the pricing view of a stored car. Bands must already be in
    /// their stored order.
    pub fn into_item(self, bands: Vec<DateBasedPriceRecord>) -> RentableItem {
        let supplier = self.supplier_name.map(|name| Supplier {
            name,
            price_change_rate: self.price_change_rate.unwrap_or(Decimal::ZERO),
        });

        RentableItem {
            daily_price: self.daily_price,
            discounted_daily_price: self.discounted_daily_price,
            bi_weekly_price: self.bi_weekly_price,
            discounted_bi_weekly_price: self.discounted_bi_weekly_price,
            weekly_price: self.weekly_price,
            discounted_weekly_price: self.discounted_weekly_price,
            monthly_price: self.monthly_price,
            discounted_monthly_price: self.discounted_monthly_price,
            is_date_based_price: self.is_date_based_price,
            date_based_prices: bands.into_iter().map(Into::into).collect(),
            cancellation: self.cancellation,
            amendments: self.amendments,
            theft_protection: self.theft_protection,
            collision_damage_waiver: self.collision_damage_waiver,
            full_insurance: self.full_insurance,
            additional_driver: self.additional_driver,
            supplier,
        }
    }
}
