//! Account-level operations

use super::child::ChildClient;
use crate::cache::{CacheKey, ListCache};
use crate::decode::{ResponseDecoder, SuccessSet};
use crate::error::{Error, Result};
use crate::http::{HttpRequest, RawResponse, Transport};
use crate::lro::{Accepted, Poller, PollerConfig};
use crate::pagination::{ListFetcher, Pager};
use crate::request::{
    NameAvailabilityParameters, PathBuilder, QueryOptions, ResourceIdentity, ResourceType, Validate,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Typed client for one ARM resource type
///
/// Every operation validates the identity (and body, where there is one)
/// before building a request, so a bad argument never reaches the transport.
#[derive(Clone)]
pub struct ResourceClient {
    transport: Arc<dyn Transport>,
    resource_type: ResourceType,
    api_version: String,
    poller: Poller,
}

impl ResourceClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        resource_type: ResourceType,
        api_version: impl Into<String>,
    ) -> Self {
        let poller = Poller::new(Arc::clone(&transport), PollerConfig::default());
        Self {
            transport,
            resource_type,
            api_version: api_version.into(),
            poller,
        }
    }

    /// Replace the long-running operation settings
    #[must_use]
    pub fn with_poller_config(mut self, config: PollerConfig) -> Self {
        self.poller = Poller::new(Arc::clone(&self.transport), config);
        self
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Client for a child collection below each account
    pub fn children(&self, child_type: impl Into<String>) -> ChildClient {
        ChildClient::new(self.clone(), child_type)
    }

    pub(crate) fn paths(&self) -> PathBuilder<'_> {
        PathBuilder::new(self.transport.base_url(), &self.resource_type)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> HttpRequest {
        HttpRequest::new(method, url).api_version(&self.api_version)
    }

    pub(crate) fn list_pager<T>(&self, mut url: Url, query: &QueryOptions) -> Pager<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        query.apply(&mut url);
        let first = self.request(Method::GET, url);
        Pager::new(ListFetcher::new(Arc::clone(&self.transport), first))
    }

    pub(crate) async fn send(&self, request: HttpRequest) -> Result<RawResponse> {
        self.transport.send(request).await
    }

    pub(crate) fn body<B: Serialize + Validate>(parameters: &B) -> Result<Value> {
        parameters.validate()?;
        serde_json::to_value(parameters).map_err(Error::Serialize)
    }

    // ------------------------------------------------------------------
    // Lists
    // ------------------------------------------------------------------

    /// List at the narrowest scope the identity names
    ///
    /// With a resource group this lists that group; otherwise the whole
    /// subscription.
    pub fn list<T>(&self, id: &ResourceIdentity, query: &QueryOptions) -> Result<Pager<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        if id.resource_group.is_some() {
            self.list_by_resource_group(id, query)
        } else {
            self.list_by_subscription(id, query)
        }
    }

    pub fn list_by_subscription<T>(
        &self,
        id: &ResourceIdentity,
        query: &QueryOptions,
    ) -> Result<Pager<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.paths().subscription_collection(id)?;
        Ok(self.list_pager(url, query))
    }

    pub fn list_by_resource_group<T>(
        &self,
        id: &ResourceIdentity,
        query: &QueryOptions,
    ) -> Result<Pager<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.paths().resource_group_collection(id)?;
        Ok(self.list_pager(url, query))
    }

    /// Full unfiltered list for the identity's scope, served from `cache`
    /// unless `refresh` is set
    pub async fn list_cached<T>(
        &self,
        id: &ResourceIdentity,
        cache: &ListCache<T>,
        refresh: bool,
    ) -> Result<Arc<Vec<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let pager = self.list(id, &QueryOptions::default())?;
        let key = CacheKey::from(id);
        if !refresh {
            if let Some(items) = cache.get(&key).await {
                debug!(?key, "List served from cache");
                return Ok(items);
            }
        }
        let items = pager.collect_all().await?;
        Ok(cache.insert(key, items).await)
    }

    // ------------------------------------------------------------------
    // Single resource
    // ------------------------------------------------------------------

    pub async fn get<T: DeserializeOwned>(&self, id: &ResourceIdentity) -> Result<T> {
        let url = self.paths().resource(id)?;
        let response = self.send(self.request(Method::GET, url)).await?;
        ResponseDecoder::new(SuccessSet::OK).decode(&response)
    }

    /// Start a PUT; returns once the service has accepted it
    pub async fn begin_create<B, T>(&self, id: &ResourceIdentity, parameters: &B) -> Result<Accepted<T>>
    where
        B: Serialize + Validate,
        T: DeserializeOwned,
    {
        self.begin_write(Method::PUT, SuccessSet::CREATED, id, parameters)
            .await
    }

    /// PUT and wait for provisioning to finish
    pub async fn create<B, T>(&self, id: &ResourceIdentity, parameters: &B) -> Result<T>
    where
        B: Serialize + Validate,
        T: DeserializeOwned,
    {
        let accepted = self.begin_create(id, parameters).await?;
        self.complete_write(id, accepted).await
    }

    /// Start a PATCH; returns once the service has accepted it
    pub async fn begin_update<B, T>(&self, id: &ResourceIdentity, parameters: &B) -> Result<Accepted<T>>
    where
        B: Serialize + Validate,
        T: DeserializeOwned,
    {
        self.begin_write(Method::PATCH, SuccessSet::ACCEPTED, id, parameters)
            .await
    }

    /// PATCH and wait for the update to finish
    pub async fn update<B, T>(&self, id: &ResourceIdentity, parameters: &B) -> Result<T>
    where
        B: Serialize + Validate,
        T: DeserializeOwned,
    {
        let accepted = self.begin_update(id, parameters).await?;
        self.complete_write(id, accepted).await
    }

    /// Start a DELETE; returns once the service has accepted it
    pub async fn begin_delete(&self, id: &ResourceIdentity) -> Result<Accepted<()>> {
        let url = self.paths().resource(id)?;
        let response = self.send(self.request(Method::DELETE, url)).await?;
        ResponseDecoder::new(SuccessSet::DELETED).decode_empty(&response)?;
        Accepted::from_response(&response, self.transport.base_url(), None, None)
    }

    /// DELETE and wait until the resource is gone
    pub async fn delete(&self, id: &ResourceIdentity) -> Result<()> {
        let accepted = self.begin_delete(id).await?;
        self.poller.wait(&accepted).await?;
        info!(
            account = id.account_name.as_deref().unwrap_or_default(),
            "Resource deleted"
        );
        Ok(())
    }

    /// POST `locations/{location}/checkNameAvailability`
    pub async fn check_name_availability<T: DeserializeOwned>(
        &self,
        id: &ResourceIdentity,
        location: &str,
        parameters: &NameAvailabilityParameters,
    ) -> Result<T> {
        let url = self
            .paths()
            .location_action(id, location, "checkNameAvailability")?;
        let body = Self::body(parameters)?;
        let response = self.send(self.request(Method::POST, url).json(body)).await?;
        ResponseDecoder::new(SuccessSet::OK).decode(&response)
    }

    async fn begin_write<B, T>(
        &self,
        method: Method,
        success: SuccessSet,
        id: &ResourceIdentity,
        parameters: &B,
    ) -> Result<Accepted<T>>
    where
        B: Serialize + Validate,
        T: DeserializeOwned,
    {
        let url = self.paths().resource(id)?;
        let body = Self::body(parameters)?;
        let request = self.request(method, url).json(body);
        let resource_url = request.url.clone();

        let response = self.send(request).await?;
        let decoded = ResponseDecoder::new(success).decode_optional(&response)?;
        let accepted = Accepted::from_response(
            &response,
            self.transport.base_url(),
            Some(&resource_url),
            decoded,
        )?;
        debug!(
            status = accepted.status(),
            complete = accepted.is_complete(),
            "Write accepted"
        );
        Ok(accepted)
    }

    async fn complete_write<T: DeserializeOwned>(
        &self,
        id: &ResourceIdentity,
        accepted: Accepted<T>,
    ) -> Result<T> {
        if !accepted.is_complete() {
            self.poller.wait(&accepted).await?;
        } else if let Some(body) = accepted.into_body() {
            return Ok(body);
        }
        info!(
            account = id.account_name.as_deref().unwrap_or_default(),
            "Write finished, reading resource"
        );
        self.get(id).await
    }
}

impl std::fmt::Debug for ResourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("base_url", &self.transport.base_url().as_str())
            .field("resource_type", &self.resource_type)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}
