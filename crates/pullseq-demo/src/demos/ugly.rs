//! Numbers of the form `p1^k1 * p2^k2 * ...` for a fixed set of primes, in
//! increasing order. With `[2, 3, 5]` these are the "ugly numbers".

use std::collections::VecDeque;

use pullseq::Sequence;

/// An in-thread [`Sequence`] over the products of `primes`.
///
/// Only the window of previously emitted numbers that some prime still has
/// to multiply is kept. The sequence ends once every next product would
/// overflow a `u64`.
#[derive(Debug, Clone)]
pub struct Ugly {
    // Generated numbers, starting at absolute index `base`.
    history: VecDeque<u64>,
    base: usize,
    // Absolute index of the next number to emit.
    next_index: usize,
    primes: Vec<u64>,
    // products[i] == primes[i] * history[positions[i]], or `None` on overflow.
    positions: Vec<usize>,
    products: Vec<Option<u64>>,
}

impl Ugly {
    /// Every prime must be at least 2.
    pub fn new(primes: &[u64]) -> Self {
        Self {
            history: VecDeque::from([1]),
            base: 0,
            next_index: 0,
            primes: primes.to_vec(),
            positions: vec![0; primes.len()],
            products: primes.iter().copied().map(Some).collect(),
        }
    }

    fn generate(&mut self) -> bool {
        let Some(min) = self.products.iter().flatten().copied().min() else {
            return false;
        };
        self.history.push_back(min);
        for i in 0..self.primes.len() {
            if self.products[i] == Some(min) {
                self.positions[i] += 1;
                let factor = self.history[self.positions[i] - self.base];
                self.products[i] = self.primes[i].checked_mul(factor);
            }
        }
        true
    }

    fn trim(&mut self) {
        let keep_from = self
            .positions
            .iter()
            .copied()
            .min()
            .unwrap_or(self.next_index)
            .min(self.next_index);
        while self.base < keep_from {
            self.history.pop_front();
            self.base += 1;
        }
    }
}

impl Sequence<u64> for Ugly {
    fn next(&mut self, dest: &mut u64) -> bool {
        if self.next_index == self.base + self.history.len() && !self.generate() {
            return false;
        }
        *dest = self.history[self.next_index - self.base];
        self.next_index += 1;
        self.trim();
        true
    }
}

/// Returns every product of `primes` below `limit`.
pub fn below(primes: &[u64], limit: u64) -> Vec<u64> {
    let mut ugly = Ugly::new(primes);
    let mut out = Vec::new();
    let mut n = 0;
    while ugly.next(&mut n) && n < limit {
        out.push(n);
    }
    out
}

#[cfg(test)]
mod tests {
    use pullseq::SequenceExt;

    use super::*;

    #[test]
    fn ugly_numbers_below_100() {
        assert_eq!(
            below(&[2, 3, 5], 100),
            [
                1, 2, 3, 4, 5, 6, 8, 9, 10, 12, 15, 16, 18, 20, 24, 25, 27, 30, 32, 36, 40, 45, 48,
                50, 54, 60, 64, 72, 75, 80, 81, 90, 96
            ]
        );
        assert_eq!(below(&[2, 3, 5], 100_000).len(), 312);
    }

    #[test]
    fn history_window_stays_small() {
        let mut ugly = Ugly::new(&[2, 3, 5]);
        let mut n = 0;
        for _ in 0..1000 {
            assert!(ugly.next(&mut n));
        }
        assert!(ugly.history.len() < 1000);
        assert_eq!(ugly.base + ugly.history.len() - ugly.next_index, 0);
    }

    #[test]
    fn single_prime_ends_at_u64_overflow() {
        let mut powers = Vec::new();
        Ugly::new(&[2]).take(100).append_to(&mut powers);
        assert_eq!(powers.len(), 64);
        assert_eq!(powers[63], 1 << 63);
    }
}
