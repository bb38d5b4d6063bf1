use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use std::panic::resume_unwind;

use tokio::task::JoinHandle;

use crate::{
    futures::{SequenceAsyncExt, SequenceStream, Unblock},
    sequence::Sequence,
};

/// An implementation of [`Unblock`] using Tokio's blocking thread pool.
///
/// This is the default provider for use in async applications built on Tokio.
pub struct TokioUnblock;

impl Unblock for TokioUnblock {
    type Task<R: Send + 'static> = TokioTask<R>;

    fn unblock<F, R>(work: F) -> Self::Task<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        TokioTask(tokio::task::spawn_blocking(work))
    }
}

/// Blocking work running under [`TokioUnblock`].
///
/// Resolves to `None` if the runtime shut down before the work ran.
pub struct TokioTask<R>(JoinHandle<R>);

impl<R> Future for TokioTask<R> {
    type Output = Option<R>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<R>> {
        match Pin::new(&mut self.0).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(value)) => Poll::Ready(Some(value)),
            Poll::Ready(Err(err)) if err.is_panic() => resume_unwind(err.into_panic()),
            Poll::Ready(Err(_)) => Poll::Ready(None),
        }
    }
}

/// Extension trait for streaming a [`Sequence`] on the
/// [`tokio`](https://docs.rs/tokio) runtime.
///
/// Uses [`TokioUnblock`] so the provider does not have to be named.
pub trait SequenceAsyncTokioExt<T>: Sequence<T> {
    /// Internally delegates to [`SequenceAsyncExt::into_stream`] with
    /// [`TokioUnblock`] as the provider.
    fn into_tokio_stream(self, buf: T) -> SequenceStream<Self, T, TokioUnblock>
    where
        Self: Sized + Send + 'static,
        T: Clone + Send + 'static,
    {
        <Self as SequenceAsyncExt<T>>::into_stream::<TokioUnblock>(self, buf)
    }
}

impl<S, T> SequenceAsyncTokioExt<T> for S where S: Sequence<T> + ?Sized {}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use futures::{StreamExt, future::join_all};

    use super::*;
    use crate::{Generator, from_iter};

    fn counter(start: u64) -> Generator<u64> {
        Generator::new(move |e| {
            let mut n = start;
            while e.emit(n) {
                n += 1;
            }
        })
    }

    #[tokio::test]
    async fn streams_a_finite_sequence() {
        let items: Vec<char> = from_iter("pull".chars())
            .into_tokio_stream(' ')
            .collect()
            .await;
        assert_eq!(items, ['p', 'u', 'l', 'l']);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn streams_generators_concurrently() {
        const STREAMS: u64 = 8;
        const PER_STREAM: usize = 64;

        let tasks: Vec<_> = (0..STREAMS)
            .map(|i| {
                tokio::spawn(async move {
                    counter(i * 1000)
                        .into_tokio_stream(0)
                        .take(PER_STREAM)
                        .collect::<Vec<_>>()
                        .await
                })
            })
            .collect();

        for (i, result) in join_all(tasks).await.into_iter().enumerate() {
            let items = result.unwrap();
            let start = i as u64 * 1000;
            assert_eq!(
                items,
                (start..start + PER_STREAM as u64).collect::<Vec<_>>()
            );
        }
    }

    #[tokio::test]
    #[should_panic(expected = "producer exploded")]
    async fn producer_panic_resumes_on_polling_task() {
        let g = Generator::new(|e| {
            e.emit(1);
            if e.emit_slot().is_some() {
                panic!("producer exploded");
            }
        });
        let mut stream = g.into_tokio_stream(0);
        assert_eq!(stream.next().await, Some(1));
        stream.next().await;
    }
}
