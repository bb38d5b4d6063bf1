//! One upstream, several concurrent readers: each consumer summarizes the
//! same prefix of the ugly numbers on its own thread.

use pullseq::{ConsumerExt, FanOut, Sequence, SequenceExt};

use super::ugly::Ugly;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSummary {
    pub first: Vec<u64>,
    pub sum: u128,
    pub evens: usize,
    pub largest: u64,
}

/// Reads the first `count` products of `primes` through four consumers.
pub fn summarize(
    primes: &[u64],
    count: usize,
    thread_prefix: &str,
) -> anyhow::Result<SplitSummary> {
    let mut upstream = Ugly::new(primes);
    let mut summary = SplitSummary::default();
    let SplitSummary {
        first,
        sum,
        evens,
        largest,
    } = &mut summary;

    let mut collect = (|seq: &mut dyn Sequence<u64>| seq.append_to(first)).limit(count);
    let mut add = (|seq: &mut dyn Sequence<u64>| {
        let mut n = 0;
        while seq.next(&mut n) {
            *sum += u128::from(n);
        }
    })
    .limit(count);
    let mut count_evens = (|seq: &mut dyn Sequence<u64>| {
        let mut n = 0;
        while seq.next(&mut n) {
            if n % 2 == 0 {
                *evens += 1;
            }
        }
    })
    .limit(count);
    let mut track_largest = (|seq: &mut dyn Sequence<u64>| {
        let mut n = 0;
        while seq.next(&mut n) {
            *largest = (*largest).max(n);
        }
    })
    .limit(count);

    FanOut::new(&mut upstream)
        .consumer(&mut collect)
        .consumer(&mut add)
        .consumer(&mut count_evens)
        .consumer(&mut track_largest)
        .thread_name(thread_prefix)
        .try_run(&mut 0)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(count, "fan-out complete");

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_consumer_sees_the_same_prefix() {
        let summary = summarize(&[2, 3, 5], 10, "split").unwrap();
        assert_eq!(summary.first, [1, 2, 3, 4, 5, 6, 8, 9, 10, 12]);
        assert_eq!(summary.sum, 60);
        assert_eq!(summary.evens, 6);
        assert_eq!(summary.largest, 12);
    }

    #[test]
    fn finite_upstream_ends_every_consumer() {
        let summary = summarize(&[2], 100, "split").unwrap();
        assert_eq!(summary.first.len(), 64);
        assert_eq!(summary.largest, 1 << 63);
        assert_eq!(summary.evens, 63);
    }
}
