//! Read-only query API over stored SpaceX launch records.
//!
//! Layers compose leaf to root: [`repo`] wraps the DynamoDB table,
//! [`services`] filters, paginates and aggregates full-table snapshots, and
//! [`handlers`]/[`routes`] project records into the public JSON shapes.
//! The `sync` binary fills the table from the SpaceX API.
pub mod clients;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod repo;
pub mod routes;
pub mod services;
pub mod utils;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install the global fmt subscriber; `RUST_LOG` overrides the `info` default
pub fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
