//! The concurrent mirroring engine.
//!
//! `executor` drives the run: list → preflight → filter → bounded fan-out.
//! The remaining submodules are its building blocks.

pub mod executor;
pub mod filter;
pub mod operator;
pub mod outcome;
pub mod path;
pub mod preflight;

pub use executor::MirrorEngine;
pub use operator::clone_or_update;
pub use outcome::{MirrorResult, Outcome};
pub use preflight::Transport;
