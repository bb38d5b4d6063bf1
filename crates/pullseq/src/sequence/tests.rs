use crate::{Sequence, SequenceExt, from_iter};
use alloc::{boxed::Box, vec, vec::Vec};

/// An iterator that yields `None` once and then resumes, to check stickiness.
struct Flaky {
    calls: u32,
}

impl Iterator for Flaky {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        self.calls += 1;
        match self.calls {
            1 => Some(10),
            2 => None,
            _ => Some(99),
        }
    }
}

#[test]
fn from_iter_yields_in_order_then_stops() {
    let mut seq = from_iter(vec![3, 1, 4]);
    let mut out = Vec::new();
    seq.append_to(&mut out);
    assert_eq!(out, [3, 1, 4]);

    let mut x = 0;
    assert!(!seq.next(&mut x));
}

#[test]
fn from_iter_exhaustion_is_sticky() {
    let mut seq = from_iter(Flaky { calls: 0 });
    let mut x = 0;
    assert!(seq.next(&mut x));
    assert_eq!(x, 10);
    for _ in 0..5 {
        assert!(!seq.next(&mut x));
    }
}

#[test]
fn take_does_not_over_pull() {
    let mut counter = from_iter(0..);
    let mut out = Vec::new();
    (&mut counter).take(5).append_to(&mut out);
    assert_eq!(out, [0, 1, 2, 3, 4]);

    let mut x = 0;
    assert!(counter.next(&mut x));
    assert_eq!(x, 5);
}

#[test]
fn take_zero_never_touches_inner() {
    let mut counter = from_iter(7..);
    let mut limited = (&mut counter).take(0);
    let mut x = -1;
    assert!(!limited.next(&mut x));
    assert_eq!(x, -1);

    assert!(counter.next(&mut x));
    assert_eq!(x, 7);
}

#[test]
fn take_longer_than_inner_stays_exhausted() {
    let mut limited = from_iter([1, 2]).take(10);
    let mut out = Vec::new();
    limited.append_to(&mut out);
    assert_eq!(out, [1, 2]);

    let mut x = 0;
    assert!(!limited.next(&mut x));
    assert!(!limited.into_inner().next(&mut x));
}

#[test]
fn boxed_and_dyn_sequences_forward() {
    let mut boxed: Box<dyn Sequence<char>> = Box::new(from_iter("ab".chars()));
    let mut c = ' ';
    assert!(boxed.next(&mut c));
    assert_eq!(c, 'a');

    let dynamic: &mut dyn Sequence<char> = &mut boxed;
    let mut rest = Vec::new();
    dynamic.append_to(&mut rest);
    assert_eq!(rest, ['b']);
}
