//! Input: discrete key presses mapped to camera actions.
//!
//! # Invariants
//! - Input mutates camera state only; it never triggers a redraw.
//! - Unrecognized keys map to no action.

pub mod action;
pub mod keys;

pub use action::CameraAction;
pub use keys::Key;
