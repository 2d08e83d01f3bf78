//! Long-running operations
//!
//! `begin_*` calls return an [`Accepted`] value describing how completion can
//! be observed; [`Poller::wait`] follows it to a terminal state.

mod poller;

pub use poller::{
    Accepted, PollStrategy, Poller, PollerConfig, ASYNC_OPERATION_HEADER, LOCATION_HEADER,
    RETRY_AFTER_HEADER,
};
