//! Execution context abstraction
//!
//! An execution context is an independently scheduled thread of control with
//! its own stack and a fixed priority. Ports decide how the stack is provided
//! (statically on the target, by the OS on a host).

use core::fmt;

/// Priority for execution contexts.
///
/// Larger values are more urgent, matching FreeRTOS numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadPriority(pub u8);

impl ThreadPriority {
    /// Priority the entry context runs at.
    pub const DEFAULT: ThreadPriority = ThreadPriority(2);

    /// One step less urgent than `self`, saturating at zero.
    pub const fn below(self) -> Self {
        ThreadPriority(self.0.saturating_sub(1))
    }

    /// Get the raw priority value
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ThreadPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Priority({})", self.0)
    }
}

/// Static description of an execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextSpec {
    /// Context name (truncated by ports with short name buffers)
    pub name: &'static str,
    /// Fixed scheduling priority
    pub priority: ThreadPriority,
    /// Stack size in bytes
    pub stack_size: usize,
}

impl ContextSpec {
    /// Creates a new context description with a 4KB stack.
    pub const fn new(name: &'static str, priority: ThreadPriority) -> Self {
        Self {
            name,
            priority,
            stack_size: 4096,
        }
    }

    /// Sets the stack size for the context.
    pub const fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = size;
        self
    }
}

/// Starts execution contexts.
///
/// A spawned context is never joined; its lifetime is the program's.
pub trait Spawn {
    /// Error reported when the context cannot be created
    type Error: fmt::Debug;

    /// Start `body` in a new context described by `spec`.
    fn spawn<F>(&mut self, spec: &ContextSpec, body: F) -> Result<(), Self::Error>
    where
        F: FnOnce() + Send + 'static;
}

#[cfg(feature = "defmt")]
impl defmt::Format for ThreadPriority {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Priority({})", self.0);
    }
}
