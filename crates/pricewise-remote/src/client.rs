//! Thin HTTP client for the published configuration payload.
//!
//! The payload is a single JSON document: a `version` string plus optional
//! tier table and parameter overrides. Only fields present in the payload
//! are applied; everything else keeps its local value.

use std::time::Duration;

use reqwest::{Client, Url};
use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use pricewise_db::repository::config::{
    KEY_COMMISSION_RATE, KEY_EXCHANGE_RATE, KEY_LABEL_FEE, KEY_PROFIT_MULTIPLIER,
};
use pricewise_db::{Database, TierInput};

/// Hard cap on the config request; the workstation must not hang on startup
/// because the config host is slow.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

const USER_AGENT: &str = concat!("pricewise/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Errors & Status
// =============================================================================

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    Status(u16),
    #[error("database error: {0}")]
    Db(#[from] pricewise_db::DbError),
}

/// Outcome of a configuration check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// A newer configuration was fetched and applied.
    Applied { version: String },

    /// The remote version is not newer than the local one.
    UpToDate,

    /// The check could not complete (network, payload or storage trouble).
    /// Treated as "no update"; details are in the logs.
    Unavailable,
}

// =============================================================================
// Payload
// =============================================================================

/// The published configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Payload version; applied only when strictly newer than the local one.
    pub version: String,

    /// Full replacement tier table, when present.
    #[serde(default)]
    pub logistics_tiers: Option<Vec<TierInput>>,

    /// Parameter overrides, each optional.
    #[serde(default)]
    pub commission_rate: Option<f64>,
    #[serde(default)]
    pub exchange_rate: Option<f64>,
    #[serde(default)]
    pub label_fee: Option<f64>,
    #[serde(default)]
    pub profit_multiplier: Option<f64>,
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client for the published configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfigClient {
    http: Client,
    url: Url,
}

impl RemoteConfigClient {
    /// Creates a client for the given config URL.
    pub fn new(url: &str) -> Result<Self, RemoteError> {
        let url = Url::parse(url)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(RemoteConfigClient { http, url })
    }

    /// Fetches and parses the remote payload.
    pub async fn fetch(&self) -> Result<RemoteConfig, RemoteError> {
        let response = self.http.get(self.url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status().as_u16()));
        }

        Ok(response.json::<RemoteConfig>().await?)
    }

    /// Checks for a newer configuration and applies it.
    ///
    /// Fail-soft: every failure mode maps to [`UpdateStatus::Unavailable`]
    /// with a logged warning. Callers can treat the result purely as
    /// "did anything change".
    pub async fn check_and_apply(&self, db: &Database) -> UpdateStatus {
        match self.try_update(db).await {
            Ok(status) => status,
            Err(e) => {
                warn!(url = %self.url, error = %e, "Remote config check failed");
                UpdateStatus::Unavailable
            }
        }
    }

    async fn try_update(&self, db: &Database) -> Result<UpdateStatus, RemoteError> {
        let local_raw = db.config().config_version().await;
        let local = parse_version_lenient(&local_raw);

        let remote = self.fetch().await?;
        let Some(remote_version) = parse_version(&remote.version) else {
            warn!(version = %remote.version, "Remote config has malformed version");
            return Ok(UpdateStatus::Unavailable);
        };

        if remote_version <= local {
            return Ok(UpdateStatus::UpToDate);
        }

        apply_config(db, &remote).await?;
        db.config().set_config_version(&remote.version).await?;

        info!(
            from = %local_raw,
            to = %remote.version,
            "Remote configuration applied"
        );
        Ok(UpdateStatus::Applied {
            version: remote.version,
        })
    }
}

/// Writes a payload's tier table and parameter overrides to the store.
///
/// Split out from the version check so the settings screen can force-apply
/// a payload it already holds.
pub async fn apply_config(db: &Database, remote: &RemoteConfig) -> Result<(), RemoteError> {
    if let Some(tiers) = &remote.logistics_tiers {
        db.tiers().replace_all(tiers).await?;
    }

    let config = db.config();
    if let Some(rate) = remote.commission_rate {
        config.set(KEY_COMMISSION_RATE, &rate.to_string()).await?;
    }
    if let Some(rate) = remote.exchange_rate {
        config.set(KEY_EXCHANGE_RATE, &rate.to_string()).await?;
    }
    if let Some(fee) = remote.label_fee {
        config.set(KEY_LABEL_FEE, &fee.to_string()).await?;
    }
    if let Some(multiplier) = remote.profit_multiplier {
        config
            .set(KEY_PROFIT_MULTIPLIER, &multiplier.to_string())
            .await?;
    }

    Ok(())
}

// =============================================================================
// Version Parsing
// =============================================================================

/// Parses a version string, tolerating a leading `v`/`V`.
fn parse_version(input: &str) -> Option<Version> {
    let trimmed = input.trim().trim_start_matches(|ch| ch == 'v' || ch == 'V');
    Version::parse(trimmed).ok()
}

/// Parses a local version, treating anything malformed as 0.0.0 so a
/// corrupted stored version re-enables updates instead of blocking them.
fn parse_version_lenient(input: &str) -> Version {
    parse_version(input).unwrap_or_else(|| Version::new(0, 0, 0))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pricewise_db::DbConfig;

    #[test]
    fn test_parse_version_variants() {
        assert_eq!(parse_version("1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_version("v1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_version(" V2.0.0 "), Some(Version::new(2, 0, 0)));
        assert_eq!(parse_version("not-a-version"), None);

        assert_eq!(parse_version_lenient("garbage"), Version::new(0, 0, 0));
    }

    #[test]
    fn test_semver_ordering_not_lexicographic() {
        // String comparison would call 0.10.0 "older" than 0.9.0.
        let newer = parse_version("0.10.0").unwrap();
        let older = parse_version("0.9.0").unwrap();
        assert!(newer > older);
    }

    #[test]
    fn test_payload_parses_with_partial_fields() {
        let payload = r#"{
            "version": "1.1.0",
            "commission_rate": 17.0,
            "logistics_tiers": [
                {"name": "Petite parcel", "max_weight_g": 500, "max_price": 135,
                 "fixed_fee": 2.6, "per_gram_fee": 0.035, "priority": 1},
                {"name": "Universal fallback", "priority": 2}
            ]
        }"#;

        let remote: RemoteConfig = serde_json::from_str(payload).unwrap();
        assert_eq!(remote.version, "1.1.0");
        assert_eq!(remote.commission_rate, Some(17.0));
        assert_eq!(remote.exchange_rate, None);

        let tiers = remote.logistics_tiers.unwrap();
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0].max_weight_g, 500.0);
        // Omitted numeric fields default to 0 (= unbounded for the fallback).
        assert_eq!(tiers[1].max_weight_g, 0.0);
        assert_eq!(tiers[1].fixed_fee, 0.0);
    }

    #[tokio::test]
    async fn test_apply_config_replaces_tiers_and_parameters() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.bootstrap_defaults().await.unwrap();

        let remote = RemoteConfig {
            version: "1.0.0".to_string(),
            logistics_tiers: Some(vec![TierInput {
                name: "express".to_string(),
                max_weight_g: 1000.0,
                max_price: 0.0,
                fixed_fee: 5.0,
                per_gram_fee: 0.04,
                priority: 1,
            }]),
            commission_rate: Some(18.0),
            exchange_rate: None,
            label_fee: None,
            profit_multiplier: None,
        };

        apply_config(&db, &remote).await.unwrap();

        let tiers = db.tiers().list().await.unwrap();
        assert_eq!(tiers.len(), 1);
        assert_eq!(tiers[0].name, "express");

        let params = db.config().load_parameters().await;
        assert_eq!(params.commission_rate_pct, 18.0);
        // Fields absent from the payload keep their local values.
        assert_eq!(params.exchange_rate, 13.5);
    }

    #[tokio::test]
    async fn test_check_and_apply_fails_soft_when_unreachable() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.bootstrap_defaults().await.unwrap();

        // Nothing listens on this port; the check degrades, never errors.
        let client = RemoteConfigClient::new("http://127.0.0.1:9/config.json").unwrap();
        let status = client.check_and_apply(&db).await;
        assert_eq!(status, UpdateStatus::Unavailable);

        // Local state is untouched.
        assert_eq!(db.config().config_version().await, "0.0.0");
        assert_eq!(db.tiers().count().await.unwrap(), 4);
    }
}
