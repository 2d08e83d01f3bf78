//! Status-aware response decoder

use crate::error::{Error, Result};
use crate::http::RawResponse;
use crate::pagination::Page;
use serde::de::DeserializeOwned;

/// The status codes an operation declares as successful
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessSet(&'static [u16]);

impl SuccessSet {
    /// GET, list, POST actions
    pub const OK: Self = Self(&[200]);
    /// PUT create
    pub const CREATED: Self = Self(&[200, 201]);
    /// PATCH update
    pub const ACCEPTED: Self = Self(&[200, 201, 202]);
    /// DELETE of a long-running resource
    pub const DELETED: Self = Self(&[200, 202, 204]);
    /// DELETE of a child resource
    pub const NO_CONTENT: Self = Self(&[200, 204]);

    pub const fn new(codes: &'static [u16]) -> Self {
        Self(codes)
    }

    pub fn contains(&self, status: u16) -> bool {
        self.0.contains(&status)
    }

    pub fn codes(&self) -> &'static [u16] {
        self.0
    }
}

impl Default for SuccessSet {
    fn default() -> Self {
        Self::OK
    }
}

/// Maps a [`RawResponse`] to a typed value, a `Fault`, or a
/// `MalformedResponse`
///
/// Decoding is a pure function of the response: the same bytes always give
/// the same result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseDecoder {
    success: SuccessSet,
}

impl ResponseDecoder {
    pub fn new(success: SuccessSet) -> Self {
        Self { success }
    }

    pub fn success(&self) -> SuccessSet {
        self.success
    }

    /// Fail with `Fault` unless the status is in the success set
    pub fn check(&self, response: &RawResponse) -> Result<()> {
        if self.success.contains(response.status) {
            Ok(())
        } else {
            Err(Error::fault(response.status, &response.body))
        }
    }

    /// Decode the body as `T`
    pub fn decode<T: DeserializeOwned>(&self, response: &RawResponse) -> Result<T> {
        self.check(response)?;
        serde_json::from_slice(&response.body)
            .map_err(|e| Error::malformed(response.status, e.to_string()))
    }

    /// Decode the body as a page of `T`
    pub fn decode_page<T: DeserializeOwned>(&self, response: &RawResponse) -> Result<Page<T>> {
        self.decode(response)
    }

    /// Decode the body as `T`, allowing an empty body (202/204)
    pub fn decode_optional<T: DeserializeOwned>(&self, response: &RawResponse) -> Result<Option<T>> {
        self.check(response)?;
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&response.body)
            .map(Some)
            .map_err(|e| Error::malformed(response.status, e.to_string()))
    }

    /// Accept any body on a success status
    pub fn decode_empty(&self, response: &RawResponse) -> Result<()> {
        self.check(response)
    }
}
