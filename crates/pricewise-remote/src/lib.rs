//! # pricewise-remote: Remote Configuration Updates
//!
//! Fetches a versioned JSON configuration published by the operator (tier
//! table and pricing parameters), compares it against the locally applied
//! version, and applies newer payloads through [`pricewise_db`].
//!
//! ## Update Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  check_and_apply()                                                  │
//! │       │                                                             │
//! │       ├── read local config_version  (default 0.0.0)                │
//! │       ├── GET <config url>           (3 s timeout)                  │
//! │       ├── parse payload + semver compare                            │
//! │       │                                                             │
//! │       ├── remote ≤ local ──► UpToDate                               │
//! │       ├── remote > local ──► replace tiers, write parameters,       │
//! │       │                      store new version ──► Applied          │
//! │       └── any failure    ──► warn + Unavailable (never an error)    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod client;

pub use client::{RemoteConfig, RemoteConfigClient, RemoteError, UpdateStatus};
