//! Pagination module
//!
//! # Overview
//!
//! List operations return `{"value": [...], "nextLink": "..."}` pages. The
//! module splits walking them into:
//!
//! - [`PageSource`] - fetch one page (first, or by continuation token)
//! - [`Page`] - the decoded envelope
//! - [`Pager`] - the lazy sequence: [`Pager::pages`], [`Pager::items`],
//!   [`Pager::collect_all`], or step by step with [`PageCursor`]
//!
//! Walks are strictly sequential and stop at the first error.

mod pager;
mod source;
mod types;

pub use pager::{PageCursor, Pager};
pub use source::{FnSource, ListFetcher, PageSource};
pub use types::Page;
