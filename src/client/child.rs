//! Child collections below an account

use super::resource::ResourceClient;
use crate::decode::{ResponseDecoder, SuccessSet};
use crate::error::Result;
use crate::pagination::Pager;
use crate::request::{QueryOptions, ResourceIdentity, Validate};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

/// Operations on `{account}/{child_type}/{child}` resources
///
/// Child writes complete synchronously: no long-running polling.
#[derive(Clone, Debug)]
pub struct ChildClient {
    parent: ResourceClient,
    child_type: String,
}

impl ChildClient {
    pub fn new(parent: ResourceClient, child_type: impl Into<String>) -> Self {
        Self {
            parent,
            child_type: child_type.into(),
        }
    }

    pub fn child_type(&self) -> &str {
        &self.child_type
    }

    /// List the children of the account the identity names
    pub fn list_by_account<T>(&self, id: &ResourceIdentity, query: &QueryOptions) -> Result<Pager<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.parent.paths().child_collection(id, &self.child_type)?;
        Ok(self.parent.list_pager(url, query))
    }

    pub async fn get<T: DeserializeOwned>(&self, id: &ResourceIdentity) -> Result<T> {
        let url = self.parent.paths().child(id, &self.child_type)?;
        let response = self.parent.send(self.parent.request(Method::GET, url)).await?;
        ResponseDecoder::new(SuccessSet::OK).decode(&response)
    }

    /// PUT the child with a body, returning the stored resource
    pub async fn create_or_update<B, T>(&self, id: &ResourceIdentity, parameters: &B) -> Result<T>
    where
        B: Serialize + Validate,
        T: DeserializeOwned,
    {
        self.write(Method::PUT, id, parameters).await
    }

    /// PATCH the child, returning the stored resource
    pub async fn update<B, T>(&self, id: &ResourceIdentity, parameters: &B) -> Result<T>
    where
        B: Serialize + Validate,
        T: DeserializeOwned,
    {
        self.write(Method::PATCH, id, parameters).await
    }

    /// PUT a link to the child; the response has no body of interest
    pub async fn add<B>(&self, id: &ResourceIdentity, parameters: &B) -> Result<()>
    where
        B: Serialize + Validate,
    {
        let url = self.parent.paths().child(id, &self.child_type)?;
        let body = ResourceClient::body(parameters)?;
        let response = self
            .parent
            .send(self.parent.request(Method::PUT, url).json(body))
            .await?;
        ResponseDecoder::new(SuccessSet::OK).decode_empty(&response)?;
        info!(child_type = %self.child_type, "Child added");
        Ok(())
    }

    /// DELETE the child
    pub async fn remove(&self, id: &ResourceIdentity) -> Result<()> {
        let url = self.parent.paths().child(id, &self.child_type)?;
        let response = self
            .parent
            .send(self.parent.request(Method::DELETE, url))
            .await?;
        ResponseDecoder::new(SuccessSet::NO_CONTENT).decode_empty(&response)?;
        info!(child_type = %self.child_type, "Child removed");
        Ok(())
    }

    /// Same as [`remove`](Self::remove)
    pub async fn delete(&self, id: &ResourceIdentity) -> Result<()> {
        self.remove(id).await
    }

    async fn write<B, T>(&self, method: Method, id: &ResourceIdentity, parameters: &B) -> Result<T>
    where
        B: Serialize + Validate,
        T: DeserializeOwned,
    {
        let url = self.parent.paths().child(id, &self.child_type)?;
        let body = ResourceClient::body(parameters)?;
        let response = self
            .parent
            .send(self.parent.request(method, url).json(body))
            .await?;
        ResponseDecoder::new(SuccessSet::OK).decode(&response)
    }
}
