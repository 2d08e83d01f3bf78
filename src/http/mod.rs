//! HTTP transport module
//!
//! - [`Transport`] - one request in, one [`RawResponse`] out
//! - [`HttpClient`] - the reqwest implementation, with default headers,
//!   bearer credential and an optional rate limiter
//!
//! No retry policy lives here: status interpretation belongs to the decoder.

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, DEFAULT_BASE_URL};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{HttpRequest, RawResponse, Transport};
