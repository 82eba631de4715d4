use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::trace;

/// Reasons a retry request was not accepted.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum RetryError {
    /// No failed attempt to retry: the first attempt is loading, the request
    /// has succeeded, or the current trigger was already used.
    #[error("retry is only available after a failed attempt")]
    NotArmed,

    /// The request stream has finished or was dropped.
    #[error("request stream has ended")]
    Closed,
}

impl RetryError {
    pub fn is_not_armed(&self) -> bool {
        matches!(self, RetryError::NotArmed)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, RetryError::Closed)
    }
}

enum RetrySlot {
    Idle,
    Armed(oneshot::Sender<()>),
    Closed,
}

type SharedSlot = Arc<Mutex<RetrySlot>>;

fn lock_slot(slot: &SharedSlot) -> MutexGuard<'_, RetrySlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Triggers a new attempt of a failed request.
///
/// Every state emitted by one request stream carries a clone of the same
/// handle, and the handle always targets the stream's current retry cycle.
#[derive(Clone)]
pub struct RetryHandle {
    slot: SharedSlot,
}

impl RetryHandle {
    /// Asks the request stream to start a new attempt.
    ///
    /// Accepted while the stream sits in the error state, and while an attempt
    /// started by an earlier retry is loading. The first call consumes the
    /// current trigger; later calls get [`RetryError::NotArmed`] until the
    /// stream has started the next attempt.
    pub fn retry(&self) -> Result<(), RetryError> {
        let mut slot = lock_slot(&self.slot);
        match std::mem::replace(&mut *slot, RetrySlot::Idle) {
            RetrySlot::Armed(trigger) => match trigger.send(()) {
                Ok(()) => Ok(()),
                Err(()) => {
                    *slot = RetrySlot::Closed;
                    Err(RetryError::Closed)
                }
            },
            RetrySlot::Idle => {
                trace!("retry ignored, no failed attempt pending");
                Err(RetryError::NotArmed)
            }
            RetrySlot::Closed => {
                *slot = RetrySlot::Closed;
                trace!("retry ignored, request stream has ended");
                Err(RetryError::Closed)
            }
        }
    }

    /// True while a retry would be accepted.
    pub fn is_armed(&self) -> bool {
        matches!(*lock_slot(&self.slot), RetrySlot::Armed(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(*lock_slot(&self.slot), RetrySlot::Closed)
    }
}

impl PartialEq for RetryHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl Eq for RetryHandle {}

impl fmt::Debug for RetryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match *lock_slot(&self.slot) {
            RetrySlot::Idle => "idle",
            RetrySlot::Armed(_) => "armed",
            RetrySlot::Closed => "closed",
        };
        f.debug_struct("RetryHandle").field("state", &state).finish()
    }
}

/// Owning side of the retry slot, held by the request stream.
///
/// Closes the slot when dropped so handles outliving the stream report
/// [`RetryError::Closed`].
pub(crate) struct RetryScope {
    slot: SharedSlot,
}

impl RetryScope {
    pub(crate) fn new() -> Self {
        RetryScope {
            slot: Arc::new(Mutex::new(RetrySlot::Idle)),
        }
    }

    pub(crate) fn handle(&self) -> RetryHandle {
        RetryHandle {
            slot: self.slot.clone(),
        }
    }

    /// Opens a new retry cycle. A trigger left over from an earlier cycle is
    /// discarded.
    pub(crate) fn arm(&self) -> oneshot::Receiver<()> {
        let (trigger, waiter) = oneshot::channel();
        let mut slot = lock_slot(&self.slot);
        if !matches!(*slot, RetrySlot::Closed) {
            *slot = RetrySlot::Armed(trigger);
        }
        waiter
    }

    /// Drops a pending trigger without closing the slot.
    pub(crate) fn disarm(&self) {
        let mut slot = lock_slot(&self.slot);
        if matches!(*slot, RetrySlot::Armed(_)) {
            *slot = RetrySlot::Idle;
        }
    }

    pub(crate) fn close(&self) {
        *lock_slot(&self.slot) = RetrySlot::Closed;
    }
}

impl Drop for RetryScope {
    fn drop(&mut self) {
        self.close();
    }
}
