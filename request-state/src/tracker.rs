use crate::{track_request, RequestStream};
use futures::stream::Once;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Reusable definition of a tracked request.
///
/// Each call to [`subscribe`](RequestTracker::subscribe) starts an
/// independent request stream with its own attempts and retry trigger, so
/// two consumers of one tracker never see each other's loading or error
/// states.
#[derive(Debug, Clone)]
pub struct RequestTracker<F> {
    factory: F,
}

impl<F> RequestTracker<F> {
    pub fn new(factory: F) -> Self {
        RequestTracker { factory }
    }

    pub fn subscribe<T, E, Fut>(
        &self,
    ) -> RequestStream<impl FnMut(CancellationToken) -> Once<Fut>, Once<Fut>>
    where
        F: FnMut() -> Fut + Clone,
        Fut: Future<Output = Result<T, E>>,
    {
        track_request(self.factory.clone())
    }
}
