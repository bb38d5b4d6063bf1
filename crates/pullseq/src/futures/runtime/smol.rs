use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    futures::{SequenceAsyncExt, SequenceStream, Unblock},
    sequence::Sequence,
};

/// An implementation of [`Unblock`] using smol's blocking thread pool.
pub struct SmolUnblock;

impl Unblock for SmolUnblock {
    type Task<R: Send + 'static> = SmolTask<R>;

    fn unblock<F, R>(work: F) -> Self::Task<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        SmolTask(smol::unblock(work))
    }
}

/// Blocking work running under [`SmolUnblock`].
pub struct SmolTask<R>(smol::Task<R>);

impl<R> Future for SmolTask<R> {
    type Output = Option<R>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<R>> {
        Pin::new(&mut self.0).poll(cx).map(Some)
    }
}

/// Extension trait for streaming a [`Sequence`] on the
/// [`smol`](https://docs.rs/smol) runtime.
pub trait SequenceAsyncSmolExt<T>: Sequence<T> {
    /// Internally delegates to [`SequenceAsyncExt::into_stream`] with
    /// [`SmolUnblock`] as the provider.
    fn into_smol_stream(self, buf: T) -> SequenceStream<Self, T, SmolUnblock>
    where
        Self: Sized + Send + 'static,
        T: Clone + Send + 'static,
    {
        <Self as SequenceAsyncExt<T>>::into_stream::<SmolUnblock>(self, buf)
    }
}

impl<S, T> SequenceAsyncSmolExt<T> for S where S: Sequence<T> + ?Sized {}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use futures::{StreamExt, future::join_all};
    use smol::Task;

    use super::*;
    use crate::{Generator, SequenceExt, from_iter};

    fn squares() -> Generator<u64> {
        Generator::new(|e| {
            let mut n = 0_u64;
            while e.emit(n * n) {
                n += 1;
            }
        })
    }

    #[test]
    fn streams_a_finite_sequence() {
        let items: Vec<u8> = smol::block_on(from_iter(1..=5).take(3).into_smol_stream(0).collect());
        assert_eq!(items, [1, 2, 3]);
    }

    #[test]
    fn streams_generators_concurrently() {
        smol::block_on(async {
            let tasks: Vec<Task<Vec<u64>>> = (0..4)
                .map(|_| smol::spawn(squares().into_smol_stream(0).take(6).collect()))
                .collect();
            for items in join_all(tasks).await {
                assert_eq!(items, [0, 1, 4, 9, 16, 25]);
            }
        });
    }
}
