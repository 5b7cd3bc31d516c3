//! Database queries for the pricing engine.
//!
//! Read-only: cars, suppliers and bands are maintained by the back office.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

use super::models::{CarRecord, DateBasedPriceRecord};

/// Find a car with its supplier's name and price change rate
pub async fn find_car(pool: &PgPool, car_id: Uuid) -> Result<Option<CarRecord>, AppError> {
    let car = sqlx::query_as::<_, CarRecord>(
        r#"
        SELECT
            c.id, c.daily_price, c.discounted_daily_price,
            c.bi_weekly_price, c.discounted_bi_weekly_price,
            c.weekly_price, c.discounted_weekly_price,
            c.monthly_price, c.discounted_monthly_price,
            c.is_date_based_price,
            c.cancellation, c.amendments, c.theft_protection,
            c.collision_damage_waiver, c.full_insurance, c.additional_driver,
            s.name AS supplier_name,
            s.price_change_rate
        FROM cars c
        LEFT JOIN suppliers s ON s.id = c.supplier_id
        WHERE c.id = $1
        "#,
    )
    .bind(car_id)
    .fetch_optional(pool)
    .await?;

    Ok(car)
}

/// Date-based price bands of a car in their stored order
pub async fn find_date_based_prices(
    pool: &PgPool,
    car_id: Uuid,
) -> Result<Vec<DateBasedPriceRecord>, AppError> {
    let bands = sqlx::query_as::<_, DateBasedPriceRecord>(
        r#"
        SELECT start_date, end_date, daily_price
        FROM date_based_prices
        WHERE car_id = $1
        ORDER BY position ASC, start_date ASC
        "#,
    )
    .bind(car_id)
    .fetch_all(pool)
    .await?;

    Ok(bands)
}
