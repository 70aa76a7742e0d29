//! # Tier Repository
//!
//! Database operations for logistics tiers.
//!
//! The tier table is tiny (a handful of rows) and read on every pricing
//! computation, so the contract is deliberately coarse: read the whole
//! ordered list, or atomically replace the whole list. There is no partial
//! update; the settings screen and the remote updater both submit complete
//! tables.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use pricewise_core::LogisticsTier;
use serde::{Deserialize, Serialize};

/// A tier row as submitted for insertion (no id yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierInput {
    pub name: String,
    #[serde(default)]
    pub max_weight_g: f64,
    #[serde(default)]
    pub max_price: f64,
    #[serde(default)]
    pub fixed_fee: f64,
    #[serde(default)]
    pub per_gram_fee: f64,
    #[serde(default)]
    pub priority: i64,
}

/// The stock tier table installed on first run.
fn default_tiers() -> Vec<TierInput> {
    let rows = [
        ("Petite parcel", 500.0, 135.0, 2.6, 0.035, 1),
        ("Standard light", 2000.0, 635.0, 16.0, 0.033, 2),
        ("Standard oversize", 30000.0, 635.0, 36.0, 0.025, 3),
        ("Universal fallback", 0.0, 0.0, 23.0, 0.025, 4),
    ];
    rows.iter()
        .map(
            |(name, max_weight_g, max_price, fixed_fee, per_gram_fee, priority)| TierInput {
                name: name.to_string(),
                max_weight_g: *max_weight_g,
                max_price: *max_price,
                fixed_fee: *fixed_fee,
                per_gram_fee: *per_gram_fee,
                priority: *priority,
            },
        )
        .collect()
}

/// Repository for logistics tier operations.
#[derive(Debug, Clone)]
pub struct TierRepository {
    pool: SqlitePool,
}

impl TierRepository {
    /// Creates a new TierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TierRepository { pool }
    }

    /// Lists all tiers ordered by ascending priority.
    ///
    /// Ties share the insertion order (row id), which keeps matching
    /// deterministic for tables with duplicate priorities.
    pub async fn list(&self) -> DbResult<Vec<LogisticsTier>> {
        let tiers = sqlx::query_as::<_, LogisticsTier>(
            r#"
            SELECT id, name, max_weight_g, max_price, fixed_fee, per_gram_fee, priority
            FROM logistics_tiers
            ORDER BY priority ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = tiers.len(), "Loaded logistics tiers");
        Ok(tiers)
    }

    /// Atomically replaces the whole tier table.
    ///
    /// Delete-then-reinsert inside one transaction: a reader either sees
    /// the old table or the new one, never a mix.
    pub async fn replace_all(&self, tiers: &[TierInput]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM logistics_tiers")
            .execute(&mut *tx)
            .await?;

        for tier in tiers {
            sqlx::query(
                r#"
                INSERT INTO logistics_tiers
                    (name, max_weight_g, max_price, fixed_fee, per_gram_fee, priority)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&tier.name)
            .bind(tier.max_weight_g)
            .bind(tier.max_price)
            .bind(tier.fixed_fee)
            .bind(tier.per_gram_fee)
            .bind(tier.priority)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(count = tiers.len(), "Replaced logistics tier table");
        Ok(())
    }

    /// Installs the stock tier table if the table is empty.
    ///
    /// Idempotent: a non-empty table is left untouched.
    pub async fn seed_defaults(&self) -> DbResult<()> {
        if self.count().await? > 0 {
            return Ok(());
        }

        let defaults = default_tiers();
        self.replace_all(&defaults).await?;

        info!(count = defaults.len(), "Seeded default logistics tiers");
        Ok(())
    }

    /// Counts tier rows.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM logistics_tiers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
