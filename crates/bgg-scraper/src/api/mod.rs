//! BoardGameGeek API and website access.
//!
//! This module provides a paced, 429-retrying client for the XML API v2,
//! the geekdo linked-items JSON API and the publisher directory pages.

pub mod client;
pub mod html;
pub mod rate_limiter;
pub mod retry;
pub mod types;
pub mod xml;

pub use client::BggClient;
pub use rate_limiter::RateLimiter;
pub use retry::RetryPolicy;
pub use types::*;
pub use xml::LinkKind;
