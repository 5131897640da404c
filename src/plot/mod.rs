//! Text-mode charts for the one-shot CLI.

pub mod ascii;

pub use ascii::*;
