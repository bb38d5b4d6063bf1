mod interface;
mod iter;
mod take;
#[cfg(test)]
mod tests;

pub use interface::*;
pub use iter::*;
pub use take::*;
