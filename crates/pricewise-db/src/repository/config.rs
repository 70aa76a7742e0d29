//! # Config Repository
//!
//! Key/value settings storage with typed parameter access.
//!
//! The table itself is loose strings (last write wins, no history), but the
//! loose typing stops at this boundary: [`ConfigRepository::load_parameters`]
//! parses and validates the numeric settings into a
//! [`PricingParameters`] value, so the pricing engine only ever sees typed
//! numbers. Missing or malformed values fall back to the literal defaults.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::DbResult;
use pricewise_core::{
    PricingParameters, DEFAULT_COMMISSION_RATE_PCT, DEFAULT_EXCHANGE_RATE, DEFAULT_LABEL_FEE,
    DEFAULT_PROFIT_MULTIPLIER,
};

// =============================================================================
// Config Keys
// =============================================================================

/// Local→sale currency exchange rate.
pub const KEY_EXCHANGE_RATE: &str = "exchange_rate";

/// Platform commission rate, percent.
pub const KEY_COMMISSION_RATE: &str = "commission_rate";

/// Per-parcel labeling fee.
pub const KEY_LABEL_FEE: &str = "label_fee";

/// Profit multiplier applied to purchase cost.
pub const KEY_PROFIT_MULTIPLIER: &str = "profit_multiplier";

/// Version of the last applied remote configuration.
pub const KEY_CONFIG_VERSION: &str = "config_version";

/// Version reported when no remote configuration was ever applied.
pub const INITIAL_CONFIG_VERSION: &str = "0.0.0";

// =============================================================================
// Repository
// =============================================================================

/// Repository for configuration operations.
#[derive(Debug, Clone)]
pub struct ConfigRepository {
    pool: SqlitePool,
}

impl ConfigRepository {
    /// Creates a new ConfigRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ConfigRepository { pool }
    }

    /// Reads a raw config value.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM config WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Reads a config value, falling back to `default` when the key is
    /// missing OR the read fails.
    ///
    /// Every config read accepts a caller-supplied default; nothing in the
    /// system depends on prior initialization of the config table.
    pub async fn get_or(&self, key: &str, default: &str) -> String {
        match self.get(key).await {
            Ok(Some(value)) => value,
            Ok(None) => default.to_string(),
            Err(e) => {
                warn!(key = %key, error = %e, "Config read failed, using default");
                default.to_string()
            }
        }
    }

    /// Writes a config value (insert or overwrite).
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO config (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, "Config value written");
        Ok(())
    }

    /// Installs the default parameter rows for keys with no value yet.
    ///
    /// Idempotent: existing rows are never overwritten.
    pub async fn seed_defaults(&self) -> DbResult<()> {
        let defaults = [
            (KEY_EXCHANGE_RATE, DEFAULT_EXCHANGE_RATE.to_string()),
            (KEY_COMMISSION_RATE, DEFAULT_COMMISSION_RATE_PCT.to_string()),
            (KEY_LABEL_FEE, DEFAULT_LABEL_FEE.to_string()),
            (KEY_PROFIT_MULTIPLIER, DEFAULT_PROFIT_MULTIPLIER.to_string()),
        ];

        for (key, value) in &defaults {
            sqlx::query("INSERT OR IGNORE INTO config (key, value) VALUES (?1, ?2)")
                .bind(key)
                .bind(value)
                .execute(&self.pool)
                .await?;
        }

        info!("Default configuration ensured");
        Ok(())
    }

    // =========================================================================
    // Typed Parameter Access
    // =========================================================================

    /// Loads the pricing parameters, parsed and defaulted.
    ///
    /// A missing or unparsable value falls back to its literal default with
    /// a warning, so a broken config row degrades one setting, not the whole
    /// computation.
    pub async fn load_parameters(&self) -> PricingParameters {
        PricingParameters {
            exchange_rate: self
                .get_numeric(KEY_EXCHANGE_RATE, DEFAULT_EXCHANGE_RATE)
                .await,
            commission_rate_pct: self
                .get_numeric(KEY_COMMISSION_RATE, DEFAULT_COMMISSION_RATE_PCT)
                .await,
            label_fee: self.get_numeric(KEY_LABEL_FEE, DEFAULT_LABEL_FEE).await,
            profit_multiplier: self
                .get_numeric(KEY_PROFIT_MULTIPLIER, DEFAULT_PROFIT_MULTIPLIER)
                .await,
        }
    }

    /// Persists the pricing parameters back as config rows.
    pub async fn save_parameters(&self, params: &PricingParameters) -> DbResult<()> {
        self.set(KEY_EXCHANGE_RATE, &params.exchange_rate.to_string())
            .await?;
        self.set(
            KEY_COMMISSION_RATE,
            &params.commission_rate_pct.to_string(),
        )
        .await?;
        self.set(KEY_LABEL_FEE, &params.label_fee.to_string()).await?;
        self.set(
            KEY_PROFIT_MULTIPLIER,
            &params.profit_multiplier.to_string(),
        )
        .await?;
        Ok(())
    }

    /// Reads the version of the last applied remote configuration.
    pub async fn config_version(&self) -> String {
        self.get_or(KEY_CONFIG_VERSION, INITIAL_CONFIG_VERSION).await
    }

    /// Stores the version of the last applied remote configuration.
    pub async fn set_config_version(&self, version: &str) -> DbResult<()> {
        self.set(KEY_CONFIG_VERSION, version).await
    }

    /// Reads a numeric setting, defaulting on missing/malformed values.
    async fn get_numeric(&self, key: &str, default: f64) -> f64 {
        let raw = self.get_or(key, &default.to_string()).await;
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                warn!(key = %key, raw = %raw, "Malformed numeric config, using default");
                default
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_or_returns_default_for_missing_key() {
        let db = test_db().await;
        let repo = db.config();

        assert_eq!(repo.get(KEY_EXCHANGE_RATE).await.unwrap(), None);
        assert_eq!(repo.get_or(KEY_EXCHANGE_RATE, "13.5").await, "13.5");
    }

    #[tokio::test]
    async fn test_set_then_get_roundtrip() {
        let db = test_db().await;
        let repo = db.config();

        repo.set(KEY_COMMISSION_RATE, "17.5").await.unwrap();
        assert_eq!(
            repo.get(KEY_COMMISSION_RATE).await.unwrap(),
            Some("17.5".to_string())
        );

        // Last write wins.
        repo.set(KEY_COMMISSION_RATE, "12.0").await.unwrap();
        assert_eq!(repo.get_or(KEY_COMMISSION_RATE, "15.0").await, "12.0");
    }

    #[tokio::test]
    async fn test_load_parameters_defaults_on_empty_table() {
        let db = test_db().await;
        let params = db.config().load_parameters().await;
        assert_eq!(params, PricingParameters::default());
    }

    #[tokio::test]
    async fn test_load_parameters_reads_stored_values() {
        let db = test_db().await;
        let repo = db.config();

        let stored = PricingParameters {
            exchange_rate: 11.0,
            commission_rate_pct: 18.0,
            label_fee: 2.0,
            profit_multiplier: 1.5,
        };
        repo.save_parameters(&stored).await.unwrap();

        assert_eq!(repo.load_parameters().await, stored);
    }

    #[tokio::test]
    async fn test_load_parameters_tolerates_malformed_value() {
        let db = test_db().await;
        let repo = db.config();

        repo.set(KEY_EXCHANGE_RATE, "not-a-number").await.unwrap();
        repo.set(KEY_LABEL_FEE, "2.5").await.unwrap();

        let params = repo.load_parameters().await;
        assert_eq!(params.exchange_rate, DEFAULT_EXCHANGE_RATE);
        assert_eq!(params.label_fee, 2.5);
    }

    #[tokio::test]
    async fn test_config_version_defaults_to_zero() {
        let db = test_db().await;
        let repo = db.config();

        assert_eq!(repo.config_version().await, "0.0.0");

        repo.set_config_version("1.2.0").await.unwrap();
        assert_eq!(repo.config_version().await, "1.2.0");
    }

    #[tokio::test]
    async fn test_seed_defaults_does_not_overwrite() {
        let db = test_db().await;
        let repo = db.config();

        repo.set(KEY_EXCHANGE_RATE, "10.0").await.unwrap();
        repo.seed_defaults().await.unwrap();

        assert_eq!(repo.get_or(KEY_EXCHANGE_RATE, "13.5").await, "10.0");
        // Untouched keys got their defaults.
        assert_eq!(repo.get_or(KEY_LABEL_FEE, "0").await, "1.5");
    }
}
