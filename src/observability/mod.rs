//! Logging setup.
//!
//! Library code only emits `tracing` events; binaries call [`init_logs`] once
//! at startup to decide where those events go. [`with_startup_logs`] covers
//! the window before that, while configuration is still being read.

pub mod logs;

pub use logs::{init_logs, with_startup_logs};
