//! # blinky
//!
//! Two revisions of the ESP32 blinky demo built on the [`hal`] traits:
//!
//! - **Blink loop**: one LED toggled on a fixed period, forever.
//! - **Blink-and-switch loop**: the blink loop plus a lower-priority context
//!   that samples a switch and mirrors it onto a second LED.
//!
//! ## Module Overview
//! - [`config`]  – Board line descriptors, periods and the worker context.
//! - [`console`] – Line-oriented console output and the fixed messages.
//! - [`error`]   – Not-ready and operation-failed errors.
//! - [`context`] – Per-context lifecycle and run budgets.
//! - [`blink`]   – Primary blink loop.
//! - [`switch`]  – Switch-controlled secondary loop.
//!
//! Nothing is shared between the two contexts: each owns its pins, its
//! console handle and its delay.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod blink;
pub mod config;
pub mod console;
pub mod context;
pub mod error;
pub mod switch;

pub use blink::{blink_context, blink_context_while, Blinker};
pub use config::BoardConfig;
pub use console::{Console, Notice};
pub use context::{ContextState, Cycles, Lifecycle};
pub use error::{DemoError, Operation};
pub use switch::{spawn_switch_context, switch_context, Poll, SwitchMirror, SwitchState};

#[cfg(feature = "std")]
pub use console::{StdoutConsole, Transcript};
