use core::future::Future;

/// A trait that abstracts over how to run blocking work from an async
/// context.
///
/// Pulling from a [`Sequence`](crate::Sequence) blocks the calling thread
/// until the value is ready, so async adapters move each pull onto the
/// runtime's blocking pool through this trait. This allows them to be generic
/// over runtimes like `Tokio` or `Smol`.
pub trait Unblock {
    /// Resolves to the work's result, or `None` if the runtime dropped the
    /// work without running it to completion.
    ///
    /// We require `Send` so that the future can be safely moved across
    /// threads, and `Unpin` so that callers can poll it in place.
    type Task<R: Send + 'static>: Future<Output = Option<R>> + Send + Unpin;

    /// Starts `work` on a thread where blocking is allowed.
    ///
    /// If `work` panics, awaiting the task resumes the panic.
    fn unblock<F, R>(work: F) -> Self::Task<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static;
}
