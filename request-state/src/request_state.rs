use crate::{RequestStatus, RetryError, RetryHandle};

/// Snapshot emitted by a request stream.
///
/// Pairs the status of the current attempt with the retry capability of the
/// subscription it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T, E> {
    pub status: RequestStatus<T, E>,
    /// 1-based number of the attempt this snapshot belongs to.
    pub attempt: u64,
    retry: RetryHandle,
}

impl<T, E> RequestState<T, E> {
    pub(crate) fn new(status: RequestStatus<T, E>, attempt: u64, retry: RetryHandle) -> Self {
        RequestState {
            status,
            attempt,
            retry,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn has_error(&self) -> bool {
        self.status.has_error()
    }

    pub fn is_settled(&self) -> bool {
        self.status.is_settled()
    }

    /// The payload of a successful attempt.
    pub fn result(&self) -> Option<&T> {
        self.status.value_ref()
    }

    /// The failure of the attempt, exactly as the operation produced it.
    pub fn error(&self) -> Option<&E> {
        self.status.error_ref()
    }

    /// Shorthand for `self.retry_handle().retry()`.
    pub fn retry(&self) -> Result<(), RetryError> {
        self.retry.retry()
    }

    pub fn retry_handle(&self) -> &RetryHandle {
        &self.retry
    }

    pub fn into_status(self) -> RequestStatus<T, E> {
        self.status
    }
}
