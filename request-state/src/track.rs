use crate::RequestStream;
use futures::stream::{self, Once};
use futures_core::stream::Stream;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Tracks a single-shot async operation.
///
/// `factory` is called once per attempt and must return a new future each
/// time. The returned stream emits `Loading`, then `Success` and ends, or
/// `Error` and waits for a retry.
///
/// ## Examples
///
/// ```
/// use futures::StreamExt;
/// use request_state::track_request;
///
/// # #[tokio::main]
/// # async fn main() {
/// let states: Vec<_> = track_request(|| async { Ok::<_, String>(42) })
///     .map(|state| state.status)
///     .collect()
///     .await;
///
/// assert!(states[0].is_loading());
/// assert_eq!(states[1].value_ref(), Some(&42));
/// assert_eq!(states.len(), 2);
/// # }
/// ```
pub fn track_request<T, E, F, Fut>(
    mut factory: F,
) -> RequestStream<impl FnMut(CancellationToken) -> Once<Fut>, Once<Fut>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    RequestStream::new(move |_token| stream::once(factory()))
}

/// Like [`track_request`], but hands each attempt its cancellation token.
///
/// The token is cancelled when the attempt fails, completes, or the stream is
/// dropped, so work the operation spawned elsewhere can stop with it.
pub fn track_request_cancellable<T, E, F, Fut>(
    mut factory: F,
) -> RequestStream<impl FnMut(CancellationToken) -> Once<Fut>, Once<Fut>>
where
    F: FnMut(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    RequestStream::new(move |token| stream::once(factory(token)))
}

/// Tracks an operation that may produce several values.
///
/// Every `Ok` item is emitted as a `Success` state; the first `Err` ends the
/// attempt. The request stream ends when the operation stream does.
pub fn track_request_stream<T, E, F, S>(
    mut factory: F,
) -> RequestStream<impl FnMut(CancellationToken) -> S, S>
where
    F: FnMut() -> S,
    S: Stream<Item = Result<T, E>>,
{
    RequestStream::new(move |_token| factory())
}
