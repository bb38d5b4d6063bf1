pub mod digit;
pub mod fib;
pub mod split;
pub mod ugly;
