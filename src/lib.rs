// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # resource-pager
//!
//! Typed async client core for ARM-style REST resource collections: lazy
//! paged lists that follow `nextLink` continuations, plus get / create /
//! update / delete with long-running operation polling.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//! use resource_pager::{HttpClient, QueryOptions, ResourceClient, ResourceIdentity, ResourceType};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> resource_pager::Result<()> {
//!     let transport = Arc::new(HttpClient::new()?);
//!     let client = ResourceClient::new(
//!         transport,
//!         ResourceType::new("Microsoft.DataLakeAnalytics", "accounts"),
//!         "2016-11-01",
//!     );
//!
//!     let id = ResourceIdentity::subscription("00000000-0000-0000-0000-000000000000");
//!     let mut items = client
//!         .list::<serde_json::Value>(&id, &QueryOptions::new().top(50))?
//!         .items();
//!     while let Some(account) = items.try_next().await? {
//!         println!("{}", account["name"]);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │        ResourceClient / ChildClient / BlockingClient           │
//! │  list()  get()  begin_create()/create()  delete()  add() ...   │
//! └────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────┬───────────┬──────┴──────┬─────────────┬───────────┐
//! │  Request  │   Pager   │   Decode    │     LRO     │   HTTP    │
//! ├───────────┼───────────┼─────────────┼─────────────┼───────────┤
//! │ Identity  │ pages()   │ SuccessSet  │ AsyncOp     │ Transport │
//! │ Paths     │ items()   │ Fault       │ Location    │ reqwest   │
//! │ $filter.. │ cursor    │ Malformed   │ Provision.  │ governor  │
//! │ Validate  │ resume    │             │ Retry-After │ bearer    │
//! └───────────┴───────────┴─────────────┴─────────────┴───────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Bearer credentials
pub mod auth;

/// HTTP transport with optional rate limiting
pub mod http;

/// Identity, paths, OData query options, body validation
pub mod request;

/// Status-aware response decoding
pub mod decode;

/// Page type, fetchers and the pager
pub mod pagination;

/// Long-running operation polling
pub mod lro;

/// Explicit list cache
pub mod cache;

/// Resource and child-collection clients
pub mod client;

/// Blocking wrappers
pub mod blocking;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod test_support;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

pub use auth::{Credential, StaticToken};
pub use blocking::{BlockingClient, BlockingItems};
pub use cache::{CacheKey, ListCache};
pub use client::{ChildClient, ResourceClient};
pub use config::{load_config, load_config_from_str, ClientConfig};
pub use decode::{ResponseDecoder, SuccessSet};
pub use http::{HttpClient, HttpClientConfig, HttpRequest, RawResponse, Transport};
pub use lro::{Accepted, Poller, PollerConfig};
pub use pagination::{Page, PageCursor, PageSource, Pager};
pub use request::{QueryOptions, ResourceIdentity, ResourceType, Scope, Validate};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
