//! The one-value rendezvous both protocols are built from.
//!
//! Every pair of tasks talks through two capacity-0 channels, one per
//! direction. A send on a capacity-0 channel only completes once the other
//! side receives it, so at most one message is ever in flight and whichever
//! side last received a message holds the turn.
//!
//! Destination slots cross the handshake as [`SlotPtr`]s. The side that sends
//! a slot blocks on the return channel until the other side answers, and the
//! other side only dereferences the slot while it holds the turn. The slot is
//! therefore never touched by two threads at once.

use core::ptr::NonNull;

use crossbeam_channel::{Receiver, Sender};

/// One side of a bidirectional rendezvous.
pub(crate) struct Endpoint<S, R> {
    tx: Sender<S>,
    rx: Receiver<R>,
}

/// Creates the two connected sides of a rendezvous.
pub(crate) fn pair<A, B>() -> (Endpoint<A, B>, Endpoint<B, A>) {
    let (a_tx, a_rx) = crossbeam_channel::bounded(0);
    let (b_tx, b_rx) = crossbeam_channel::bounded(0);
    (
        Endpoint { tx: a_tx, rx: b_rx },
        Endpoint { tx: b_tx, rx: a_rx },
    )
}

impl<S, R> Endpoint<S, R> {
    /// Blocks until the peer takes `msg`. Returns `false` if the peer is gone.
    pub(crate) fn send(&self, msg: S) -> bool {
        self.tx.send(msg).is_ok()
    }

    /// Blocks until the peer sends. Returns `None` if the peer is gone.
    pub(crate) fn recv(&self) -> Option<R> {
        self.rx.recv().ok()
    }

    /// A full round: hand over `msg`, then wait for the answer.
    pub(crate) fn exchange(&self, msg: S) -> Option<R> {
        if self.send(msg) { self.recv() } else { None }
    }
}

/// A caller-owned destination lent across the handshake.
pub(crate) struct SlotPtr<T>(NonNull<T>);

// SAFETY: the pointee is only written from the thread that currently holds
// the handshake turn, and the lender stays blocked until the turn comes back.
unsafe impl<T: Send> Send for SlotPtr<T> {}

impl<T> SlotPtr<T> {
    pub(crate) fn new(dest: &mut T) -> Self {
        Self(NonNull::from(dest))
    }

    /// Reborrows the lent destination.
    ///
    /// # Safety
    ///
    /// The lender must still be blocked waiting on the handshake, and the
    /// returned borrow must end before the turn is handed back.
    pub(crate) unsafe fn as_mut<'a>(&self) -> &'a mut T {
        // SAFETY: upheld by the caller, see above.
        unsafe { &mut *self.0.as_ptr() }
    }
}
