use crate::{RequestState, RequestStream, RetryError, RetryHandle};
use futures::StreamExt;
use futures_core::stream::Stream;
use futures_signals::map_ref;
use futures_signals::signal::{Mutable, MutableSignalCloned, SignalExt, SignalStream};
use std::future::ready;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

/// Holds the latest state of a request stream for rendering code.
///
/// The stream is driven by a tokio task; the most recent state is published
/// through a [`Mutable`], `None` until the first state arrives. Dropping the
/// store stops the task, which drops the stream and its in-flight operation.
pub struct RequestStore<T, E> {
    state: Mutable<Option<RequestState<T, E>>>,
    finished: Mutable<bool>,
    retry: RetryHandle,
    _driver: DropGuard,
}

impl<T, E> RequestStore<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Starts driving `request` on the current tokio runtime.
    pub fn spawn<F, S>(request: RequestStream<F, S>) -> Self
    where
        F: FnMut(CancellationToken) -> S + Send + 'static,
        S: Stream<Item = Result<T, E>> + Send + 'static,
    {
        let state = Mutable::new(None);
        let finished = Mutable::new(false);
        let retry = request.retry_handle();
        let token = CancellationToken::new();

        let state_clone = state.clone();
        let finished_clone = finished.clone();
        let token_clone = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token_clone.cancelled() => debug!("request store dropped, driver stopped"),
                _ = Self::drive(state_clone, request) => {
                    debug!("request stream ended");
                    finished_clone.set(true);
                }
            }
        });

        RequestStore {
            state,
            finished,
            retry,
            _driver: token.drop_guard(),
        }
    }

    async fn drive<F, S>(state: Mutable<Option<RequestState<T, E>>>, request: RequestStream<F, S>)
    where
        F: FnMut(CancellationToken) -> S,
        S: Stream<Item = Result<T, E>>,
    {
        let mut request = Box::pin(request);
        while let Some(next) = request.next().await {
            state.set(Some(next));
        }
    }

    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<Option<RequestState<T, E>>>> {
        self.state.signal_cloned().to_stream()
    }

    pub fn to_signal(&self) -> MutableSignalCloned<Option<RequestState<T, E>>> {
        self.state.signal_cloned()
    }

    pub fn get_state(&self) -> Option<RequestState<T, E>> {
        self.state.get_cloned()
    }

    pub fn retry(&self) -> Result<(), RetryError> {
        self.retry.retry()
    }

    /// True once the request stream has ended; the published state is final.
    pub fn is_finished(&self) -> bool {
        self.finished.get()
    }

    /// Waits until the published state satisfies `predicate`.
    ///
    /// Only the latest state is observed; intermediate states set while the
    /// caller was not polling may be skipped. Returns `None` when the request
    /// stream ends and its final state does not match.
    pub async fn wait_for<P>(&self, mut predicate: P) -> Option<RequestState<T, E>>
    where
        P: FnMut(&RequestState<T, E>) -> bool,
    {
        let observed = map_ref! {
            let state = self.state.signal_cloned(),
            let finished = self.finished.signal() =>
            (state.clone(), *finished)
        };
        Box::pin(observed.to_stream())
            .filter_map(|(state, finished)| {
                let outcome = match state.filter(|state| predicate(state)) {
                    Some(state) => Some(Some(state)),
                    None if finished => Some(None),
                    None => None,
                };
                ready(outcome)
            })
            .next()
            .await
            .flatten()
    }
}
