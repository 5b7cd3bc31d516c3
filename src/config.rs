//! Environment configuration.
//!
//! `main` loads `.env` with dotenvy first, so every key below can come
//! from the process environment or the file.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::pricing::models::TierSchedule;

/// Settings the pricing handlers need on every request
#[derive(Debug, Clone)]
pub struct PricingSettings {
    /// Currency code attached to every amount and label
    pub currency: String,
    pub tiers: TierSchedule,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            tiers: TierSchedule::default(),
        }
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub item_cache_capacity: u64,
    pub item_cache_ttl: Duration,
    pub pricing: PricingSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Missing optional keys take their default;
    /// present but unparsable values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let tiers = TierSchedule {
            monthly_days: parse_or(&lookup, "TIER_MONTHLY_DAYS", 30)?,
            bi_weekly_days: parse_or(&lookup, "TIER_BIWEEKLY_DAYS", 14)?,
            weekly_days: parse_or(&lookup, "TIER_WEEKLY_DAYS", 7)?,
        };
        if tiers.monthly_days <= 0 || tiers.bi_weekly_days <= 0 || tiers.weekly_days <= 0 {
            anyhow::bail!("tier lengths must be positive: {:?}", tiers);
        }

        Ok(Self {
            database_url,
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            item_cache_capacity: parse_or(&lookup, "ITEM_CACHE_CAPACITY", 1000)?,
            item_cache_ttl: Duration::from_secs(parse_or(&lookup, "ITEM_CACHE_TTL_SECS", 300)?),
            pricing: PricingSettings {
                currency: lookup("CURRENCY").unwrap_or_else(|| "USD".to_string()),
                tiers,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
