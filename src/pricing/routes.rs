//! Pricing API route handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use crate::error::Result;
use crate::AppState;

use super::calculators;
use super::labels::{add_on_label, LocaleTable};
use super::models::AddOn;
use super::requests::{AddOnCostRequest, CarQuoteRequest, DaysRequest, LabelsRequest, QuoteRequest};
use super::responses::{
    AddOnLabelResponse, DaysResponse, LabelsResponse, MoneyResponse, QuoteResponse,
};
use super::services::{self, PricingError};

/// Pricing endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pricing/days", post(count_days))
        .route("/api/pricing/add-on-cost", post(price_add_on))
        .route("/api/pricing/quote", post(quote_item))
        .route("/api/pricing/labels", post(render_labels))
        .route("/api/pricing/cars/:car_id/quote", post(quote_stored_car))
        .route("/api/pricing/cars/:car_id/invalidate", post(invalidate_car))
}

async fn count_days(Json(req): Json<DaysRequest>) -> Json<DaysResponse> {
    Json(DaysResponse {
        days: calculators::days(req.from, req.to),
    })
}

async fn price_add_on(
    State(state): State<AppState>,
    Json(req): Json<AddOnCostRequest>,
) -> Result<Json<MoneyResponse>> {
    let amount = calculators::add_on_cost(req.value, req.days, req.per_day)?;
    Ok(Json(MoneyResponse::new(amount, &state.pricing.currency)))
}

/// Quote an item sent by the caller (booking form preview)
async fn quote_item(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let rate = req
        .price_change_rate
        .unwrap_or_else(|| req.item.price_change_rate());

    let quote = calculators::quote(
        &req.item,
        req.from,
        req.to,
        rate,
        &req.options,
        &state.pricing.tiers,
    )
    .map_err(|e| {
        tracing::warn!("Rejected quote: {}", e);
        e
    })?;

    Ok(Json(QuoteResponse::from_quote(quote, &state.pricing.currency)))
}

async fn quote_stored_car(
    State(state): State<AppState>,
    Path(car_id): Path<Uuid>,
    Json(req): Json<CarQuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let quote = services::quote_car(
        &state.db,
        &state.cache,
        car_id,
        req.from,
        req.to,
        req.price_change_rate,
        &req.options,
        &state.pricing.tiers,
    )
    .await?;

    Ok(Json(QuoteResponse::from_quote(quote, &state.pricing.currency)))
}

/// Called by the back office after a car is edited
async fn invalidate_car(State(state): State<AppState>, Path(car_id): Path<Uuid>) -> StatusCode {
    state.cache.invalidate_item(car_id).await;
    StatusCode::NO_CONTENT
}

async fn render_labels(
    State(state): State<AppState>,
    Json(req): Json<LabelsRequest>,
) -> Result<Json<LabelsResponse>> {
    let table = LocaleTable::for_locale(req.locale, &state.pricing.currency);

    let labels = AddOn::ALL
        .into_iter()
        .map(|add_on| {
            Ok(AddOnLabelResponse {
                add_on,
                label: add_on_label(&req.item, add_on, req.days, &table, req.hide_plus)?,
            })
        })
        .collect::<std::result::Result<Vec<_>, PricingError>>()?;

    Ok(Json(LabelsResponse {
        days: req.days,
        labels,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::AppCache;
    use crate::config::PricingSettings;
    use crate::pricing::models::RentableItem;
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let db = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/rental_pricing_test")
            .unwrap();
        AppState {
            db,
            cache: AppCache::default(),
            pricing: PricingSettings::default(),
        }
    }

    async fn post_json(state: AppState, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = crate::build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_days_endpoint() {
        let (status, body) = post_json(
            test_state(),
            "/api/pricing/days",
            json!({ "from": "2024-01-01T00:00:00Z", "to": "2024-01-02T01:00:00Z" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["days"], 2);

        let (_, body) = post_json(test_state(), "/api/pricing/days", json!({})).await;
        assert_eq!(body["days"], 0);
    }

    #[tokio::test]
    async fn test_add_on_cost_endpoint() {
        let (status, body) = post_json(
            test_state(),
            "/api/pricing/add-on-cost",
            json!({ "value": 5, "days": 3, "per_day": true }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["amount"], "15");
        assert_eq!(body["currency"], "USD");

        let (status, body) = post_json(
            test_state(),
            "/api/pricing/add-on-cost",
            json!({ "value": -3, "days": 3 }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_type"], "invalid_add_on_value");
    }

    #[tokio::test]
    async fn test_quote_endpoint() {
        let (status, body) = post_json(
            test_state(),
            "/api/pricing/quote",
            json!({
                "item": { "dailyPrice": 100, "theftProtection": 10, "cancellation": 20 },
                "from": "2024-01-01T00:00:00Z",
                "to": "2024-01-04T00:00:00Z",
                "options": { "theftProtection": true }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["days"], 3);
        assert_eq!(body["base"]["amount"], "300");
        assert_eq!(body["add_ons"][0]["add_on"], "theftProtection");
        assert_eq!(body["add_ons"][0]["amount"]["amount"], "30");
        assert_eq!(body["total"]["amount"], "330.00");
    }

    #[tokio::test]
    async fn test_quote_endpoint_uses_supplier_rate() {
        let (status, body) = post_json(
            test_state(),
            "/api/pricing/quote",
            json!({
                "item": {
                    "dailyPrice": 100,
                    "supplier": { "name": "Acme", "priceChangeRate": 10 }
                },
                "from": "2024-01-01T00:00:00Z",
                "to": "2024-01-04T00:00:00Z"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"]["amount"], "330.00");
        assert_eq!(body["price_change_rate"], "10");
    }

    #[tokio::test]
    async fn test_quote_endpoint_overflow_is_unprocessable() {
        let (status, body) = post_json(
            test_state(),
            "/api/pricing/quote",
            json!({
                "item": { "dailyPrice": "79228162514264337593543950335" },
                "from": "2024-01-01T00:00:00Z",
                "to": "2024-01-03T00:00:00Z"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_type"], "amount_overflow");
    }

    #[tokio::test]
    async fn test_quote_endpoint_uncovered_date() {
        let (status, body) = post_json(
            test_state(),
            "/api/pricing/quote",
            json!({
                "item": {
                    "dailyPrice": 100,
                    "isDateBasedPrice": true,
                    "dateBasedPrices": [
                        { "startDate": "2024-06-01", "endDate": "2024-06-02", "dailyPrice": 80 }
                    ]
                },
                "from": "2024-06-01T09:00:00Z",
                "to": "2024-06-04T09:00:00Z"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_type"], "uncovered_date");
        assert_eq!(body["details"]["date"], "2024-06-03");
    }

    #[tokio::test]
    async fn test_labels_endpoint() {
        let (status, body) = post_json(
            test_state(),
            "/api/pricing/labels",
            json!({
                "item": { "dailyPrice": 100, "cancellation": 0, "theftProtection": 10 },
                "days": 3,
                "locale": "fr"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let labels = body["labels"].as_array().unwrap();
        assert_eq!(labels.len(), 6);
        assert_eq!(labels[0]["add_on"], "cancellation");
        assert_eq!(labels[0]["label"], "Inclus");
        assert_eq!(labels[1]["label"], "Indisponible");
        assert_eq!(labels[2]["label"], "+ 30 USD (10 USD/jour)");
    }

    #[tokio::test]
    async fn test_stored_car_quote_and_invalidate() {
        let state = test_state();
        let car_id = Uuid::new_v4();
        let mut item = RentableItem::with_daily_price(dec!(50));
        item.additional_driver = dec!(5);
        state.cache.items.insert(car_id, Arc::new(item)).await;

        let (status, body) = post_json(
            state.clone(),
            &format!("/api/pricing/cars/{}/quote", car_id),
            json!({
                "from": "2024-02-01T08:00:00Z",
                "to": "2024-02-03T08:00:00Z",
                "options": { "additionalDriver": true }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"]["amount"], "110.00");

        let (status, _) = post_json(
            state.clone(),
            &format!("/api/pricing/cars/{}/invalidate", car_id),
            json!({}),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.cache.items.get(&car_id).await.is_none());
    }
}
