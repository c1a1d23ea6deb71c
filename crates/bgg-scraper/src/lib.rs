//! BGG scraper library for designer and publisher catalog statistics.
//!
//! This library resolves BoardGameGeek designers and publishers by name,
//! pages through their catalogs while riding out rate limiting, and
//! aggregates the games found.

pub mod api;
pub mod catalog;
pub mod error;
pub mod scraper;
pub mod stats;

pub use api::{BggClient, LinkKind, RateLimiter, RetryPolicy};
pub use catalog::{fetch_catalog, CatalogQuery, Enricher, LinkLookup, LinkTally};
pub use error::FetchError;
pub use crate::scraper::CatalogScraper;
pub use stats::{CatalogReport, StatsError};
