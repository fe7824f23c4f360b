//! Physics: the Breit–Wigner resonance curve and the lifetime it implies.
//!
//! Both are small, pure functions so that fitting code can stay generic.

pub mod breit_wigner;
pub mod lifetime;

pub use breit_wigner::*;
pub use lifetime::*;
