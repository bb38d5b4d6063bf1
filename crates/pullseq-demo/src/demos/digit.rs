//! Finds the nth digit of 0123456789101112...

use pullseq::{Generator, Sequence, SequenceExt};

/// Emits the decimal digits of 0, 1, 2, ... one character at a time.
pub fn all_digits() -> Generator<char> {
    Generator::new(|e| {
        for number in 0_u64.. {
            for ch in number.to_string().chars() {
                let Some(slot) = e.emit_slot() else {
                    return;
                };
                *slot = ch;
            }
        }
    })
}

/// Returns the digit at zero-based `position`.
pub fn nth_digit(position: usize) -> Option<char> {
    let mut digits = all_digits();
    let mut ch = '0';

    let mut skipped = (&mut digits).take(position);
    while skipped.next(&mut ch) {}
    let found = digits.next(&mut ch);

    digits.close();
    found.then_some(ch)
}
