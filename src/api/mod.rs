//! Fretboard Trainer WASM API
//!
//! This module provides the JavaScript-facing API for the trainer.
//! It includes shared utilities for serialization and error handling,
//! plus the engine entry points the shell calls: lifecycle
//! (start/reset/tick), input forwarding, deferred-task firing,
//! configuration setters, and the read-only queries the shell needs to
//! build the fretboard.

pub mod core;
pub mod helpers;

pub use self::core::*;
