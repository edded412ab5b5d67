//! Hardware Abstraction Layer (HAL) for the blinky demo
//!
//! This crate provides vendor-agnostic traits for the peripherals the demo
//! touches: digital GPIO lines and independently scheduled execution contexts.
//! Sleeping goes through [`embedded_hal::delay::DelayNs`].
//!
//! Vendor crates (`hal-esp`) implement the traits; the `sim` feature provides
//! in-memory implementations for host runs and tests.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub mod error;
pub mod gpio;
pub mod thread;

#[cfg(feature = "sim")]
pub mod sim;

// Re-export commonly used types
pub use error::{HalError, HalResult};
pub use gpio::{GpioPin, InputLine, Level, LineSpec, OutputLine, PinMode, Polarity, Pull};
pub use thread::{ContextSpec, Spawn, ThreadPriority};
