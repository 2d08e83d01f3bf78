//! Response decoder module
//!
//! Turns a [`RawResponse`](crate::http::RawResponse) into
//! `Result<T, Error>`:
//!
//! - status in the operation's [`SuccessSet`] and a JSON body - `Ok(T)`
//! - status in the set but an undecodable body - `MalformedResponse`
//! - any other status - `Fault` carrying the status and body

mod decoder;

pub use decoder::{ResponseDecoder, SuccessSet};
