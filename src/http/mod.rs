//! HTTP collaborator for the Zendesk Chat API
//!
//! Provides a client with retry on transient upstream errors, client-side
//! rate limiting, and bearer-token authentication.

mod client;
mod rate_limit;

pub use client::{ApiClient, ApiRequest, BASE_URL};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
