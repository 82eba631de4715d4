//! Track a retryable async request as a stream of loading, success and error
//! states.

mod request_state;
mod request_status;
mod request_store;
mod request_stream;
mod retry;
mod stream_ext;
mod track;
mod tracker;
pub mod mock;

pub use request_state::*;
pub use request_status::*;
pub use request_store::*;
pub use request_stream::*;
pub use retry::{RetryError, RetryHandle};
pub use stream_ext::*;
pub use track::*;
pub use tracker::*;

#[cfg(test)]
mod unit_tests;
