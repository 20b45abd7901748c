//! Command implementations for demo-cli

pub mod check;
pub mod resolve;
pub mod simulate;
pub mod slug;

pub use check::run_check;
pub use resolve::run_resolve;
pub use simulate::run_simulate;
pub use slug::{run_slug_decode, run_slug_encode};
