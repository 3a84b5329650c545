//! Camera input: raw pointer/keyboard state mapped to camera actions.
//!
//! # Invariants
//! - Hosts translate platform events into this crate's types; nothing here
//!   depends on a windowing library.
//! - Every camera kind consumes the same action set and ignores what it
//!   cannot use.

pub mod action;
pub mod pointer;

pub use action::CameraAction;
pub use pointer::{MoveKey, PointerButton, PointerState};

pub fn crate_info() -> &'static str {
    concat!("cubefield-input v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_info_names_the_crate() {
        assert!(crate_info().contains("input"));
    }
}
