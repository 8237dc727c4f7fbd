//! Library entry point for the sandwich-hub crate.
//! This file re-exports key types for use by the binary and the tests.

pub mod api;
pub mod app;
pub mod env;
pub mod fs;
pub mod log;
pub mod net;
pub mod storage;
pub mod terminal;
pub mod utils;

#[macro_use]
pub mod macros;

pub use utils::*;

/// Default buffer size used for the actors' mailboxes.
pub const BUFFER_SIZE: usize = 128;
