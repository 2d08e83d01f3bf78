//! Blocking wrappers
//!
//! Each wrapper owns a current-thread tokio runtime and blocks on the same
//! futures the async API returns. Do not call these from inside an async
//! context; `block_on` panics there.

use crate::client::{ChildClient, ResourceClient};
use crate::error::Result;
use crate::lro::Accepted;
use crate::pagination::Pager;
use crate::request::{NameAvailabilityParameters, QueryOptions, ResourceIdentity, Validate};
use futures::stream::{BoxStream, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

fn runtime() -> Result<Arc<Runtime>> {
    let runtime = Builder::new_current_thread().enable_all().build()?;
    Ok(Arc::new(runtime))
}

/// Walk every page of `pager` and return all items
pub fn collect<T: Send + 'static>(pager: &Pager<T>) -> Result<Vec<T>> {
    runtime()?.block_on(pager.collect_all())
}

/// Lazy blocking iterator over a pager's items
///
/// Pages are fetched only when the iterator runs past the current one. After
/// an error the iterator yields `None`.
pub struct BlockingItems<T> {
    runtime: Arc<Runtime>,
    stream: BoxStream<'static, Result<T>>,
}

impl<T: Send + 'static> BlockingItems<T> {
    pub fn new(pager: &Pager<T>) -> Result<Self> {
        Ok(Self::with_runtime(runtime()?, pager))
    }

    fn with_runtime(runtime: Arc<Runtime>, pager: &Pager<T>) -> Self {
        Self {
            runtime,
            stream: pager.items(),
        }
    }
}

impl<T> Iterator for BlockingItems<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.runtime.block_on(self.stream.next())
    }
}

/// Blocking face of [`ResourceClient`]
pub struct BlockingClient {
    runtime: Arc<Runtime>,
    inner: ResourceClient,
}

impl BlockingClient {
    pub fn new(inner: ResourceClient) -> Result<Self> {
        Ok(Self {
            runtime: runtime()?,
            inner,
        })
    }

    pub fn inner(&self) -> &ResourceClient {
        &self.inner
    }

    /// Fully materialised list at the identity's scope
    pub fn list_all<T>(&self, id: &ResourceIdentity, query: &QueryOptions) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let pager = self.inner.list(id, query)?;
        self.runtime.block_on(pager.collect_all())
    }

    /// Items one at a time, fetching pages on demand
    pub fn list_items<T>(&self, id: &ResourceIdentity, query: &QueryOptions) -> Result<BlockingItems<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let pager = self.inner.list(id, query)?;
        Ok(BlockingItems::with_runtime(Arc::clone(&self.runtime), &pager))
    }

    pub fn get<T: DeserializeOwned>(&self, id: &ResourceIdentity) -> Result<T> {
        self.runtime.block_on(self.inner.get(id))
    }

    /// PUT and return as soon as the service accepts
    pub fn begin_create<B, T>(&self, id: &ResourceIdentity, parameters: &B) -> Result<Accepted<T>>
    where
        B: Serialize + Validate,
        T: DeserializeOwned,
    {
        self.runtime.block_on(self.inner.begin_create(id, parameters))
    }

    pub fn create<B, T>(&self, id: &ResourceIdentity, parameters: &B) -> Result<T>
    where
        B: Serialize + Validate,
        T: DeserializeOwned,
    {
        self.runtime.block_on(self.inner.create(id, parameters))
    }

    pub fn begin_update<B, T>(&self, id: &ResourceIdentity, parameters: &B) -> Result<Accepted<T>>
    where
        B: Serialize + Validate,
        T: DeserializeOwned,
    {
        self.runtime.block_on(self.inner.begin_update(id, parameters))
    }

    pub fn update<B, T>(&self, id: &ResourceIdentity, parameters: &B) -> Result<T>
    where
        B: Serialize + Validate,
        T: DeserializeOwned,
    {
        self.runtime.block_on(self.inner.update(id, parameters))
    }

    pub fn begin_delete(&self, id: &ResourceIdentity) -> Result<Accepted<()>> {
        self.runtime.block_on(self.inner.begin_delete(id))
    }

    pub fn delete(&self, id: &ResourceIdentity) -> Result<()> {
        self.runtime.block_on(self.inner.delete(id))
    }

    pub fn check_name_availability<T: DeserializeOwned>(
        &self,
        id: &ResourceIdentity,
        location: &str,
        parameters: &NameAvailabilityParameters,
    ) -> Result<T> {
        self.runtime
            .block_on(self.inner.check_name_availability(id, location, parameters))
    }

    /// Blocking child collection client
    pub fn children(&self, child_type: impl Into<String>) -> BlockingChildClient<'_> {
        BlockingChildClient {
            runtime: &self.runtime,
            inner: self.inner.children(child_type),
        }
    }
}

/// Blocking face of [`ChildClient`]
pub struct BlockingChildClient<'a> {
    runtime: &'a Arc<Runtime>,
    inner: ChildClient,
}

impl BlockingChildClient<'_> {
    pub fn list_all<T>(&self, id: &ResourceIdentity, query: &QueryOptions) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let pager = self.inner.list_by_account(id, query)?;
        self.runtime.block_on(pager.collect_all())
    }

    /// Children one at a time, fetching pages on demand
    pub fn list_items<T>(&self, id: &ResourceIdentity, query: &QueryOptions) -> Result<BlockingItems<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let pager = self.inner.list_by_account(id, query)?;
        Ok(BlockingItems::with_runtime(Arc::clone(self.runtime), &pager))
    }

    pub fn get<T: DeserializeOwned>(&self, id: &ResourceIdentity) -> Result<T> {
        self.runtime.block_on(self.inner.get(id))
    }

    pub fn create_or_update<B, T>(&self, id: &ResourceIdentity, parameters: &B) -> Result<T>
    where
        B: Serialize + Validate,
        T: DeserializeOwned,
    {
        self.runtime
            .block_on(self.inner.create_or_update(id, parameters))
    }

    pub fn update<B, T>(&self, id: &ResourceIdentity, parameters: &B) -> Result<T>
    where
        B: Serialize + Validate,
        T: DeserializeOwned,
    {
        self.runtime.block_on(self.inner.update(id, parameters))
    }

    pub fn add<B: Serialize + Validate>(&self, id: &ResourceIdentity, parameters: &B) -> Result<()> {
        self.runtime.block_on(self.inner.add(id, parameters))
    }

    pub fn remove(&self, id: &ResourceIdentity) -> Result<()> {
        self.runtime.block_on(self.inner.remove(id))
    }

    pub fn delete(&self, id: &ResourceIdentity) -> Result<()> {
        self.runtime.block_on(self.inner.delete(id))
    }
}

#[cfg(test)]
mod blocking_tests {
    use super::*;
    use crate::error::Error;
    use crate::http::RawResponse;
    use crate::lro::ASYNC_OPERATION_HEADER;
    use crate::pagination::Page;
    use crate::request::{ResourceType, TrackedResourceParameters};
    use crate::test_support::ScriptedTransport;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_pager(calls: Arc<AtomicUsize>) -> Pager<u32> {
        Pager::from_fn(move |link: Option<String>| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                match link.as_deref() {
                    None => Ok(Page::new(vec![1, 2], Some("p2".to_string()))),
                    Some("p2") => Ok(Page::last(vec![3])),
                    Some(other) => Err(Error::Other(format!("unexpected {other}"))),
                }
            }
        })
    }

    fn blocking_client(responses: Vec<RawResponse>) -> (Arc<ScriptedTransport>, BlockingClient) {
        let transport = ScriptedTransport::new("https://arm.example.com/", responses);
        let client = ResourceClient::new(
            transport.clone(),
            ResourceType::new("Microsoft.DataLakeStore", "accounts"),
            "2016-11-01",
        );
        (transport, BlockingClient::new(client).unwrap())
    }

    #[test]
    fn test_collect() {
        let calls = Arc::new(AtomicUsize::new(0));
        let items = collect(&counting_pager(Arc::clone(&calls))).unwrap();
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_blocking_items_fetch_on_demand() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut items = BlockingItems::new(&counting_pager(Arc::clone(&calls))).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(items.next().unwrap().unwrap(), 1);
        assert_eq!(items.next().unwrap().unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(items.next().unwrap().unwrap(), 3);
        assert!(items.next().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_list_all() {
        let (transport, client) = blocking_client(vec![
            RawResponse::new(200, r#"{"value":[{"name":"a"}],"nextLink":"/next"}"#),
            RawResponse::new(200, r#"{"value":[{"name":"b"}]}"#),
        ]);
        let items: Vec<Value> = client
            .list_all(&ResourceIdentity::subscription("sub"), &QueryOptions::new())
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(transport.urls()[1], "https://arm.example.com/next");
    }

    #[test]
    fn test_list_items_surfaces_fault_once() {
        let (_, client) = blocking_client(vec![
            RawResponse::new(200, r#"{"value":[{"name":"a"}],"nextLink":"/next"}"#),
            RawResponse::new(503, "busy"),
        ]);
        let results: Vec<Result<Value>> = client
            .list_items(&ResourceIdentity::subscription("sub"), &QueryOptions::new())
            .unwrap()
            .collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::Fault { status: 503, .. })));
    }

    #[test]
    fn test_invalid_identity_is_immediate() {
        let (transport, client) = blocking_client(vec![]);
        let err = client
            .list_all::<Value>(&ResourceIdentity::subscription(" "), &QueryOptions::new())
            .unwrap_err();
        assert!(err.is_client_side());
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_begin_create_returns_on_accept() {
        let (transport, client) = blocking_client(vec![RawResponse::new(
            201,
            r#"{"name":"store","properties":{"provisioningState":"Creating"}}"#,
        )
        .with_header(ASYNC_OPERATION_HEADER, "/operations/1")]);
        let id = ResourceIdentity::subscription("sub")
            .resource_group("rg")
            .account("store");

        let accepted: Accepted<Value> = client
            .begin_create(&id, &TrackedResourceParameters::new("eastus2"))
            .unwrap();
        assert_eq!(accepted.status(), 201);
        assert!(!accepted.is_complete());
        assert_eq!(accepted.body().unwrap()["name"], "store");
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn test_begin_delete_without_headers_is_complete() {
        let (transport, client) = blocking_client(vec![RawResponse::new(200, "")]);
        let id = ResourceIdentity::subscription("sub")
            .resource_group("rg")
            .account("store");
        assert!(client.begin_delete(&id).unwrap().is_complete());
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn test_child_list_items() {
        let (transport, client) = blocking_client(vec![
            RawResponse::new(200, r#"{"value":[{"name":"r1"}],"nextLink":"/rules2"}"#),
            RawResponse::new(200, r#"{"value":[{"name":"r2"}]}"#),
        ]);
        let id = ResourceIdentity::subscription("sub")
            .resource_group("rg")
            .account("store");
        let mut rules = client
            .children("firewallRules")
            .list_items::<Value>(&id, &QueryOptions::new())
            .unwrap();
        assert_eq!(transport.calls(), 0);
        assert_eq!(rules.next().unwrap().unwrap()["name"], "r1");
        assert_eq!(rules.next().unwrap().unwrap()["name"], "r2");
        assert!(rules.next().is_none());
        assert_eq!(transport.calls(), 2);
    }

    #[test]
    fn test_child_delete() {
        let (transport, client) = blocking_client(vec![RawResponse::new(200, "")]);
        let id = ResourceIdentity::subscription("sub")
            .resource_group("rg")
            .account("store")
            .child("rule1");
        client.children("firewallRules").delete(&id).unwrap();
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn test_child_remove() {
        let (transport, client) = blocking_client(vec![RawResponse::new(204, "")]);
        let id = ResourceIdentity::subscription("sub")
            .resource_group("rg")
            .account("store")
            .child("rule1");
        client.children("firewallRules").remove(&id).unwrap();
        assert!(transport.urls()[0].contains("/accounts/store/firewallRules/rule1?"));
    }
}
