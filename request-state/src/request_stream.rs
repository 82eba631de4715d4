use crate::retry::RetryScope;
use crate::{RequestState, RequestStatus, RetryHandle};
use futures_core::stream::{FusedStream, Stream};
use pin_project::pin_project;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

#[pin_project(project = PhaseProj)]
enum Phase<S> {
    Start,
    Running {
        #[pin]
        operation: S,
        /// Set for attempts started by a retry; firing it supersedes the attempt.
        trigger: Option<oneshot::Receiver<()>>,
    },
    Failed {
        trigger: oneshot::Receiver<()>,
    },
    Finished,
}

enum Step {
    Attempt { retrying: bool },
    Finish,
}

/// Stream of [`RequestState`] values for a retryable operation.
///
/// Each attempt calls the factory once and polls the operation it returns.
/// Failures are turned into error states instead of ending the stream; the
/// stream then waits until the [`RetryHandle`] of one of its states fires.
/// The stream ends once the operation of an attempt runs to completion.
///
/// Once an attempt has failed, retries stay available while the following
/// attempts load: a retry during such a load drops the in-flight operation and
/// starts over. Retries are rejected during the first load and after a
/// success.
///
/// Every attempt receives its own [`CancellationToken`], cancelled as soon as
/// the attempt fails, completes, is superseded, or the stream is dropped.
#[pin_project]
#[must_use = "Streams do nothing unless polled"]
pub struct RequestStream<F, S> {
    factory: F,
    #[pin]
    phase: Phase<S>,
    retry: RetryScope,
    attempt: u64,
    attempt_guard: Option<DropGuard>,
}

impl<F, S> RequestStream<F, S> {
    /// Builds the stream from a factory producing one operation per attempt.
    ///
    /// The factory is not called until the stream is first polled.
    pub fn new(factory: F) -> Self {
        RequestStream {
            factory,
            phase: Phase::Start,
            retry: RetryScope::new(),
            attempt: 0,
            attempt_guard: None,
        }
    }

    /// Handle shared by every state this stream emits.
    pub fn retry_handle(&self) -> RetryHandle {
        self.retry.handle()
    }

    /// Number of attempts started so far.
    pub fn attempts(&self) -> u64 {
        self.attempt
    }
}

impl<F, S, T, E> Stream for RequestStream<F, S>
where
    F: FnMut(CancellationToken) -> S,
    S: Stream<Item = Result<T, E>>,
{
    type Item = RequestState<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        let step = match this.phase.as_mut().project() {
            PhaseProj::Start => Step::Attempt { retrying: false },
            PhaseProj::Running { operation, trigger } => {
                let superseded = match trigger.as_mut().map(|t| Pin::new(t).poll(cx)) {
                    Some(Poll::Ready(Ok(()))) => true,
                    Some(Poll::Ready(Err(_))) => {
                        *trigger = None;
                        false
                    }
                    Some(Poll::Pending) | None => false,
                };
                if superseded {
                    debug!(attempt = *this.attempt, "retry requested while loading");
                    Step::Attempt { retrying: true }
                } else {
                    match operation.poll_next(cx) {
                        Poll::Ready(Some(Ok(value))) => {
                            debug!(attempt = *this.attempt, "request attempt succeeded");
                            *trigger = None;
                            this.retry.disarm();
                            let status = RequestStatus::success(value);
                            return Poll::Ready(Some(RequestState::new(
                                status,
                                *this.attempt,
                                this.retry.handle(),
                            )));
                        }
                        Poll::Ready(Some(Err(error))) => {
                            debug!(attempt = *this.attempt, "request attempt failed");
                            let trigger = this.retry.arm();
                            this.phase.set(Phase::Failed { trigger });
                            this.attempt_guard.take();
                            let status = RequestStatus::error(error);
                            return Poll::Ready(Some(RequestState::new(
                                status,
                                *this.attempt,
                                this.retry.handle(),
                            )));
                        }
                        Poll::Ready(None) => Step::Finish,
                        Poll::Pending => return Poll::Pending,
                    }
                }
            }
            PhaseProj::Failed { trigger } => match Pin::new(trigger).poll(cx) {
                Poll::Ready(Ok(())) => {
                    debug!(attempt = *this.attempt, "retry requested");
                    Step::Attempt { retrying: true }
                }
                Poll::Ready(Err(_)) => Step::Finish,
                Poll::Pending => return Poll::Pending,
            },
            PhaseProj::Finished => return Poll::Ready(None),
        };

        let retrying = match step {
            Step::Attempt { retrying } => retrying,
            Step::Finish => {
                debug!(attempts = *this.attempt, "request stream finished");
                this.phase.set(Phase::Finished);
                this.attempt_guard.take();
                this.retry.close();
                return Poll::Ready(None);
            }
        };

        *this.attempt += 1;
        let token = CancellationToken::new();
        // replacing the guard cancels a superseded attempt
        *this.attempt_guard = Some(token.clone().drop_guard());
        let trigger = retrying.then(|| this.retry.arm());
        let operation = (this.factory)(token);
        this.phase.set(Phase::Running { operation, trigger });
        debug!(attempt = *this.attempt, "request attempt started");
        Poll::Ready(Some(RequestState::new(
            RequestStatus::loading(),
            *this.attempt,
            this.retry.handle(),
        )))
    }
}

impl<F, S, T, E> FusedStream for RequestStream<F, S>
where
    F: FnMut(CancellationToken) -> S,
    S: Stream<Item = Result<T, E>>,
{
    fn is_terminated(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }
}

impl<F, S> fmt::Debug for RequestStream<F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self.phase {
            Phase::Start => "start",
            Phase::Running { .. } => "running",
            Phase::Failed { .. } => "failed",
            Phase::Finished => "finished",
        };
        f.debug_struct("RequestStream")
            .field("phase", &phase)
            .field("attempt", &self.attempt)
            .field("retry", &self.retry.handle())
            .finish()
    }
}
