//! # History Repository
//!
//! Append-only log of saved pricing computations.
//!
//! ## Lifecycle
//! ```text
//! price_product() ──► NewHistoryRecord ──► append()     (explicit save)
//!                                             │
//!                 list(limit) ◄── newest first┤
//!                 stats()     ◄── aggregates ─┤
//!                 clear_all() ◄── bulk delete ┘
//! ```
//!
//! Records are never mutated and never deleted individually; the only
//! delete is the full-table clear.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use pricewise_core::{PricingRequest, PricingResult, HIGH_PROFIT_MARGIN_PCT};

// =============================================================================
// Record Types
// =============================================================================

/// A history row as submitted for insertion (no id/timestamp yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHistoryRecord {
    /// Product label; empty names are stored as "Unnamed product".
    pub product_name: String,
    pub cost: f64,
    pub weight_g: f64,
    pub charge_weight_g: f64,
    pub channel_name: String,
    pub shipping_fee: f64,
    pub final_price: f64,
    pub profit: f64,
    pub margin: f64,
}

impl NewHistoryRecord {
    /// Builds a history row from a forward computation.
    pub fn from_pricing(request: &PricingRequest, result: &PricingResult) -> Self {
        let product_name = if request.product_name.trim().is_empty() {
            "Unnamed product".to_string()
        } else {
            request.product_name.clone()
        };

        NewHistoryRecord {
            product_name,
            cost: request.cost,
            weight_g: request.actual_weight_g,
            charge_weight_g: result.charge_weight_g,
            channel_name: result.tier.name.clone(),
            shipping_fee: result.shipping_fee,
            final_price: result.final_price_local,
            profit: result.net_profit,
            margin: result.margin_pct,
        }
    }
}

/// A persisted history row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HistoryRecord {
    pub id: i64,
    pub product_name: String,
    pub cost: f64,
    pub weight_g: f64,
    pub charge_weight_g: f64,
    pub channel_name: String,
    pub shipping_fee: f64,
    pub final_price: f64,
    pub profit: f64,
    pub margin: f64,
    /// Creation time, server-local.
    pub created_at: NaiveDateTime,
}

/// Aggregate metrics for the dashboard sidebar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Computations saved today (server-local date).
    pub today_count: i64,

    /// Saved computations whose margin reached the high-profit threshold.
    pub high_profit_count: i64,

    /// Sum of saved profits, local currency.
    pub total_profit: f64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for history operations.
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    pool: SqlitePool,
}

impl HistoryRepository {
    /// Creates a new HistoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        HistoryRepository { pool }
    }

    /// Appends a record, returning its row id.
    pub async fn append(&self, record: &NewHistoryRecord) -> DbResult<i64> {
        debug!(product = %record.product_name, "Appending history record");

        let result = sqlx::query(
            r#"
            INSERT INTO history (
                product_name, cost, weight_g, charge_weight_g, channel_name,
                shipping_fee, final_price, profit, margin
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&record.product_name)
        .bind(record.cost)
        .bind(record.weight_g)
        .bind(record.charge_weight_g)
        .bind(&record.channel_name)
        .bind(record.shipping_fee)
        .bind(record.final_price)
        .bind(record.profit)
        .bind(record.margin)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Lists the most recent records, newest first.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<HistoryRecord>> {
        let records = sqlx::query_as::<_, HistoryRecord>(
            r#"
            SELECT
                id, product_name, cost, weight_g, charge_weight_g, channel_name,
                shipping_fee, final_price, profit, margin,
                datetime(created_at, 'localtime') AS created_at
            FROM history
            ORDER BY created_at DESC, id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Deletes every record. Returns the number of rows removed.
    pub async fn clear_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM history").execute(&self.pool).await?;
        let removed = result.rows_affected();

        info!(removed, "History cleared");
        Ok(removed)
    }

    /// Counts records.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM history")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Computes the dashboard aggregate.
    ///
    /// Callers wanting the cached variant go through
    /// [`Database::dashboard_stats`](crate::Database::dashboard_stats).
    pub async fn stats(&self) -> DbResult<DashboardStats> {
        let today_count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM history
            WHERE date(created_at, 'localtime') = date('now', 'localtime')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let high_profit_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM history WHERE margin >= ?1")
                .bind(HIGH_PROFIT_MARGIN_PCT)
                .fetch_one(&self.pool)
                .await?;

        let total_profit: f64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(profit), 0.0) FROM history")
                .fetch_one(&self.pool)
                .await?;

        Ok(DashboardStats {
            today_count,
            high_profit_count,
            total_profit,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use pricewise_core::{price_product, PricingParameters};

    async fn test_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.bootstrap_defaults().await.unwrap();
        db
    }

    fn sample_record(name: &str, profit: f64, margin: f64) -> NewHistoryRecord {
        NewHistoryRecord {
            product_name: name.to_string(),
            cost: 25.0,
            weight_g: 300.0,
            charge_weight_g: 300.0,
            channel_name: "Petite parcel".to_string(),
            shipping_fee: 14.6,
            final_price: 56.88,
            profit,
            margin,
        }
    }

    #[tokio::test]
    async fn test_append_and_list_newest_first() {
        let db = test_db().await;
        let repo = db.history();

        repo.append(&sample_record("first", 5.0, 10.0)).await.unwrap();
        repo.append(&sample_record("second", 6.0, 11.0)).await.unwrap();

        let records = repo.list(50).await.unwrap();
        assert_eq!(records.len(), 2);
        // Same-second timestamps fall back to id ordering.
        assert_eq!(records[0].product_name, "second");
        assert_eq!(records[1].product_name, "first");
    }

    #[tokio::test]
    async fn test_list_respects_limit() {
        let db = test_db().await;
        let repo = db.history();

        for i in 0..5 {
            repo.append(&sample_record(&format!("p{i}"), 1.0, 5.0))
                .await
                .unwrap();
        }

        assert_eq!(repo.list(3).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_clear_all() {
        let db = test_db().await;
        let repo = db.history();

        repo.append(&sample_record("a", 1.0, 5.0)).await.unwrap();
        repo.append(&sample_record("b", 2.0, 6.0)).await.unwrap();

        assert_eq!(repo.clear_all().await.unwrap(), 2);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stats_aggregates() {
        let db = test_db().await;
        let repo = db.history();

        repo.append(&sample_record("low", 5.0, 8.0)).await.unwrap();
        repo.append(&sample_record("high", 20.0, 25.0)).await.unwrap();
        repo.append(&sample_record("edge", 10.0, 20.0)).await.unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.today_count, 3);
        // The 20% threshold is inclusive.
        assert_eq!(stats.high_profit_count, 2);
        assert!((stats.total_profit - 35.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_stats_on_empty_table() {
        let db = test_db().await;
        let stats = db.history().stats().await.unwrap();
        assert_eq!(stats, DashboardStats::default());
    }

    #[tokio::test]
    async fn test_from_pricing_maps_computation_to_row() {
        let db = test_db().await;
        let tiers = db.tiers().list().await.unwrap();
        let params = PricingParameters::default();

        let request = pricewise_core::PricingRequest {
            product_name: "  ".to_string(),
            cost: 25.0,
            actual_weight_g: 300.0,
            length_cm: 0.0,
            width_cm: 0.0,
            height_cm: 0.0,
        };
        let result = price_product(&request, &tiers, &params).unwrap();

        let record = NewHistoryRecord::from_pricing(&request, &result);
        assert_eq!(record.product_name, "Unnamed product");
        assert_eq!(record.channel_name, "Petite parcel");
        assert_eq!(record.weight_g, 300.0);
        assert_eq!(record.charge_weight_g, 300.0);
        assert!((record.final_price - result.final_price_local).abs() < 1e-9);

        let id = db.history().append(&record).await.unwrap();
        assert!(id > 0);
    }
}
