//! Bearer credentials
//!
//! Token acquisition belongs to the caller's identity stack; this crate only
//! attaches whatever token a [`Credential`] hands out.

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::RequestBuilder;

/// Supplies a bearer token for each request
#[async_trait]
pub trait Credential: Send + Sync {
    async fn token(&self) -> Result<String>;
}

/// A fixed, pre-acquired token
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::required("token"));
        }
        Ok(Self { token })
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken").field("token", &"***").finish()
    }
}

#[async_trait]
impl Credential for StaticToken {
    async fn token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// Attach `Authorization: Bearer` from a credential
pub async fn apply(credential: &dyn Credential, request: RequestBuilder) -> Result<RequestBuilder> {
    let token = credential.token().await?;
    Ok(request.bearer_auth(token))
}
