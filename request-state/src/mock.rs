//! Controllable operations for exercising request streams in tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::oneshot;

struct MockInner<T, E> {
    /// One sender per factory call, taken once the attempt is resolved.
    attempts: Vec<Option<oneshot::Sender<Result<T, E>>>>,
}

/// Factory whose operations only resolve when the test says so.
///
/// Every call of the factory returned by [`factory`](MockFactory::factory)
/// creates a new pending [`MockOperation`]. Attempts are numbered from 1 in
/// call order.
pub struct MockFactory<T, E> {
    inner: Arc<Mutex<MockInner<T, E>>>,
}

impl<T, E> Clone for MockFactory<T, E> {
    fn clone(&self) -> Self {
        MockFactory {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> Default for MockFactory<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> MockFactory<T, E> {
    pub fn new() -> Self {
        MockFactory {
            inner: Arc::new(Mutex::new(MockInner {
                attempts: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockInner<T, E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates the next pending operation.
    pub fn operation(&self) -> MockOperation<T, E> {
        let (sender, receiver) = oneshot::channel();
        self.lock().attempts.push(Some(sender));
        MockOperation { receiver }
    }

    /// Zero-argument factory suitable for [`track_request`](crate::track_request).
    pub fn factory(&self) -> impl FnMut() -> MockOperation<T, E> + Clone {
        let mock = self.clone();
        move || mock.operation()
    }

    /// How many operations the factory has created.
    pub fn calls(&self) -> usize {
        self.lock().attempts.len()
    }

    /// Resolves the given attempt (1-based). Returns false if the attempt does
    /// not exist, was already resolved, or its operation has been dropped.
    pub fn resolve(&self, attempt: usize, outcome: Result<T, E>) -> bool {
        let sender = match attempt.checked_sub(1) {
            Some(index) => self.lock().attempts.get_mut(index).and_then(Option::take),
            None => None,
        };
        match sender {
            Some(sender) => sender.send(outcome).is_ok(),
            None => false,
        }
    }

    /// Resolves the most recent attempt with a value.
    pub fn succeed(&self, value: T) -> bool {
        let latest = self.calls();
        self.resolve(latest, Ok(value))
    }

    /// Resolves the most recent attempt with an error.
    pub fn fail(&self, error: E) -> bool {
        let latest = self.calls();
        self.resolve(latest, Err(error))
    }

    /// True when the operation of an unresolved attempt has been dropped by
    /// its consumer.
    pub fn is_abandoned(&self, attempt: usize) -> bool {
        let inner = self.lock();
        match attempt.checked_sub(1).and_then(|index| inner.attempts.get(index)) {
            Some(Some(sender)) => sender.is_closed(),
            _ => false,
        }
    }
}

/// Operation created by [`MockFactory`]. Stays pending until resolved; never
/// resolves if the factory side is gone.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct MockOperation<T, E> {
    receiver: oneshot::Receiver<Result<T, E>>,
}

impl<T, E> Future for MockOperation<T, E> {
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) | Poll::Pending => Poll::Pending,
        }
    }
}
