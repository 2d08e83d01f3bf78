//! Pager: one logical sequence over many pages

use super::source::{FnSource, PageSource};
use super::types::Page;
use crate::error::{Error, Result};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Lazy, sequential walk over a paged list
///
/// Nothing is fetched until a stream or cursor is polled. Every call to
/// [`pages`](Pager::pages), [`items`](Pager::items) or
/// [`cursor`](Pager::cursor) starts a fresh walk from the first page, or from
/// the token given to [`resume_from`](Pager::resume_from).
pub struct Pager<T> {
    source: Arc<dyn PageSource<T>>,
    start: Option<String>,
}

impl<T> Clone for Pager<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            start: self.start.clone(),
        }
    }
}

impl<T: Send + 'static> Pager<T> {
    pub fn new(source: impl PageSource<T> + 'static) -> Self {
        Self::from_source(Arc::new(source))
    }

    pub fn from_source(source: Arc<dyn PageSource<T>>) -> Self {
        Self {
            source,
            start: None,
        }
    }

    /// Build a pager from a fetch function
    ///
    /// The function receives `None` for the first page and the previous
    /// page's continuation token afterwards.
    pub fn from_fn<F, Fut>(fetch: F) -> Self
    where
        F: Fn(Option<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Page<T>>> + Send + 'static,
    {
        Self::new(FnSource::new(fetch))
    }

    /// A pager that starts at a previously seen continuation token
    #[must_use]
    pub fn resume_from(&self, next_link: impl Into<String>) -> Self {
        Self {
            source: Arc::clone(&self.source),
            start: Some(next_link.into()),
        }
    }

    /// Explicit fetch-next cursor
    pub fn cursor(&self) -> PageCursor<T> {
        let state = match &self.start {
            Some(link) => CursorState::Next(link.clone()),
            None => CursorState::First,
        };
        PageCursor {
            source: Arc::clone(&self.source),
            state,
            fetched: 0,
        }
    }

    /// Pages as they arrive; ends after the last page or the first error
    pub fn pages(&self) -> BoxStream<'static, Result<Page<T>>> {
        stream::try_unfold(self.cursor(), |mut cursor| async move {
            Ok(cursor.next_page().await?.map(|page| (page, cursor)))
        })
        .boxed()
    }

    /// Items across all pages, in server order
    pub fn items(&self) -> BoxStream<'static, Result<T>> {
        self.pages()
            .map_ok(|page| stream::iter(page.into_items().into_iter().map(Ok::<T, Error>)))
            .try_flatten()
            .boxed()
    }

    /// Walk every page and collect the items
    pub async fn collect_all(&self) -> Result<Vec<T>> {
        self.items().try_collect().await
    }
}

enum CursorState {
    First,
    Next(String),
    Done,
}

/// Stateful position in a page walk
///
/// After the last page, or after any error, `next_page` returns `Ok(None)`.
pub struct PageCursor<T> {
    source: Arc<dyn PageSource<T>>,
    state: CursorState,
    fetched: usize,
}

impl<T> PageCursor<T> {
    /// Fetch the next page, or `None` once the walk is over
    pub async fn next_page(&mut self) -> Result<Option<Page<T>>> {
        let link = match std::mem::replace(&mut self.state, CursorState::Done) {
            CursorState::Done => return Ok(None),
            CursorState::First => None,
            CursorState::Next(link) => Some(link),
        };

        let page = self.source.fetch_page(link.as_deref()).await?;
        self.fetched += 1;
        debug!(
            page = self.fetched,
            items = page.len(),
            has_next = !page.is_last(),
            "Page received"
        );

        if let Some(next) = page.next_link() {
            self.state = CursorState::Next(next.to_string());
        }
        Ok(Some(page))
    }

    /// Continuation token the next call will use
    pub fn next_link(&self) -> Option<&str> {
        match &self.state {
            CursorState::Next(link) => Some(link),
            _ => None,
        }
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> usize {
        self.fetched
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, CursorState::Done)
    }
}
