//! # pricewise-db: Persistence Layer for Pricewise
//!
//! This crate provides database access for the Pricewise workstation.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Pricewise Data Flow                            │
//! │                                                                     │
//! │  Caller (workstation command / remote updater)                     │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                  pricewise-db (THIS CRATE)                    │ │
//! │  │                                                               │ │
//! │  │  ┌─────────────┐   ┌────────────────┐   ┌────────────────┐  │ │
//! │  │  │  Database   │   │  Repositories  │   │   Migrations   │  │ │
//! │  │  │  (pool.rs)  │   │ tier / config  │   │   (embedded)   │  │ │
//! │  │  │             │◄──│   / history    │   │ 001_init.sql   │  │ │
//! │  │  └─────────────┘   └────────────────┘   └────────────────┘  │ │
//! │  │                                                               │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (WAL mode)                                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and the `Database` handle
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (tier, config, history)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pricewise_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("pricewise.db")).await?;
//! db.bootstrap_defaults().await?;
//!
//! let tiers = db.tiers().list().await?;
//! let params = db.config().load_parameters().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::config::ConfigRepository;
pub use repository::history::{
    DashboardStats, HistoryRecord, HistoryRepository, NewHistoryRecord,
};
pub use repository::tier::{TierInput, TierRepository};
