use crate::RequestState;
use futures_core::stream::{FusedStream, Stream};
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Extension methods for streams of request states.
pub trait RequestStreamExt: Stream {
    /// Yields items until one matches `test`, then ends after yielding it.
    ///
    /// ## Examples
    ///
    /// ```
    /// use futures::StreamExt;
    /// use request_state::{track_request, RequestStreamExt};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let states: Vec<_> = track_request(|| async { Err::<u8, _>("down") })
    ///     .stop_if(|state| state.has_error())
    ///     .collect()
    ///     .await;
    ///
    /// assert_eq!(states.len(), 2);
    /// assert_eq!(states[1].error(), Some(&"down"));
    /// # }
    /// ```
    fn stop_if<F>(self, test: F) -> StopIf<Self, F>
    where
        F: FnMut(&Self::Item) -> bool,
        Self: Sized,
    {
        StopIf {
            stream: self,
            stopped: false,
            test,
        }
    }

    /// Ends the stream after the first success or error of any attempt.
    fn until_settled<T, E>(self) -> StopIf<Self, fn(&RequestState<T, E>) -> bool>
    where
        Self: Stream<Item = RequestState<T, E>> + Sized,
    {
        self.stop_if(RequestState::is_settled as fn(&RequestState<T, E>) -> bool)
    }
}

impl<T: ?Sized> RequestStreamExt for T where T: Stream {}

/// Stream returned by [`RequestStreamExt::stop_if`].
#[pin_project(project = StopIfProj)]
#[derive(Debug)]
#[must_use = "Streams do nothing unless polled"]
pub struct StopIf<A, B> {
    #[pin]
    stream: A,
    stopped: bool,
    test: B,
}

impl<A, B> Stream for StopIf<A, B>
where
    A: Stream,
    B: FnMut(&A::Item) -> bool,
{
    type Item = A::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let StopIfProj {
            stream,
            stopped,
            test,
        } = self.project();

        if *stopped {
            return Poll::Ready(None);
        }

        match stream.poll_next(cx) {
            Poll::Ready(Some(value)) => {
                if test(&value) {
                    *stopped = true;
                }
                Poll::Ready(Some(value))
            }
            Poll::Ready(None) => {
                *stopped = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<A, B> FusedStream for StopIf<A, B>
where
    A: Stream,
    B: FnMut(&A::Item) -> bool,
{
    fn is_terminated(&self) -> bool {
        self.stopped
    }
}
