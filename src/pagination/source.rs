//! Page fetchers
//!
//! A [`PageSource`] performs one round trip per call: the first page when
//! `next_link` is `None`, otherwise the page the continuation token names.

use super::types::Page;
use crate::decode::ResponseDecoder;
use crate::error::Result;
use crate::http::{HttpRequest, Transport};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Fetches a single page
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, next_link: Option<&str>) -> Result<Page<T>>;
}

/// Adapts a function value into a [`PageSource`]
pub struct FnSource<F> {
    fetch: F,
}

impl<F> FnSource<F> {
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

#[async_trait]
impl<T, F, Fut> PageSource<T> for FnSource<F>
where
    T: Send + 'static,
    F: Fn(Option<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<T>>> + Send,
{
    async fn fetch_page(&self, next_link: Option<&str>) -> Result<Page<T>> {
        (self.fetch)(next_link.map(str::to_owned)).await
    }
}

/// HTTP list fetcher
///
/// Holds the already-validated first-page request. Continuation tokens are
/// dereferenced as URLs against the transport's base URL: absolute links are
/// used verbatim, relative and protocol-relative links are resolved. The
/// original query options and `api-version` are not re-applied.
pub struct ListFetcher<T> {
    transport: Arc<dyn Transport>,
    first: HttpRequest,
    decoder: ResponseDecoder,
    _item: PhantomData<fn() -> T>,
}

impl<T> ListFetcher<T> {
    pub fn new(transport: Arc<dyn Transport>, first: HttpRequest) -> Self {
        Self {
            transport,
            first,
            decoder: ResponseDecoder::default(),
            _item: PhantomData,
        }
    }

    /// Override the default `{200}` success set
    #[must_use]
    pub fn with_decoder(mut self, decoder: ResponseDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// The first-page request
    pub fn first_request(&self) -> &HttpRequest {
        &self.first
    }

    /// The request a continuation token resolves to
    pub fn next_request(&self, next_link: &str) -> Result<HttpRequest> {
        let url = self.transport.base_url().join(next_link)?;
        Ok(HttpRequest::get(url))
    }
}

#[async_trait]
impl<T> PageSource<T> for ListFetcher<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, next_link: Option<&str>) -> Result<Page<T>> {
        let request = match next_link {
            None => self.first.clone(),
            Some(link) => self.next_request(link)?,
        };
        debug!(url = %request.url, continuation = next_link.is_some(), "Fetching page");
        let response = self.transport.send(request).await?;
        self.decoder.decode_page(&response)
    }
}
