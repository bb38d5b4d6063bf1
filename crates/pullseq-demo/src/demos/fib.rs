//! Ratio between the size of fibonacci numbers and their position in the
//! sequence.

use pullseq::{Generator, Sequence, SequenceExt};

/// A fibonacci index together with `bit_len(fib(idx)) / idx`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatioWithIndex {
    pub idx: usize,
    pub ratio: f64,
}

/// Emits `(idx, fib(idx))` for `idx = 0, 1, 2, ...` until the next term would
/// overflow a `u128`.
pub fn fibonacci_with_index() -> Generator<(usize, u128)> {
    Generator::new(|e| {
        let (mut a, mut b) = (0_u128, 1_u128);
        for idx in 0.. {
            if !e.emit((idx, a)) {
                return;
            }
            let Some(next) = a.checked_add(b) else {
                return;
            };
            (a, b) = (b, next);
        }
    })
}

/// Returns the ratios for every index in `from..to`.
pub fn ratios(from: usize, to: usize) -> Vec<RatioWithIndex> {
    let mut fib = fibonacci_with_index();
    let mut out = Vec::with_capacity(to.saturating_sub(from));

    let mut pair = (0, 0);
    let mut prefix = (&mut fib).take(to);
    while prefix.next(&mut pair) {
        let (idx, num) = pair;
        if idx >= from {
            out.push(RatioWithIndex {
                idx,
                ratio: f64::from(bit_len(num)) / idx as f64,
            });
        }
    }

    fib.close();
    out
}

const fn bit_len(n: u128) -> u32 {
    u128::BITS - n.leading_zeros()
}
