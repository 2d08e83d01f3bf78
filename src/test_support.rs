//! Recording transport double shared by unit tests

use crate::error::{Error, Result};
use crate::http::{HttpRequest, RawResponse, Transport};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use url::Url;

/// Replays scripted responses in order and records every request
pub struct ScriptedTransport {
    base: Url,
    responses: Mutex<VecDeque<RawResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(base: &str, responses: Vec<RawResponse>) -> Arc<Self> {
        Arc::new(Self {
            base: Url::parse(base).unwrap(),
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::new("https://arm.example.com/", Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.url.to_string())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Other("no scripted response left".to_string()))
    }

    fn base_url(&self) -> &Url {
        &self.base
    }
}
