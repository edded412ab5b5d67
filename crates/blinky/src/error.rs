//! Demo error types
//!
//! Exactly two kinds exist: a line whose controller is not ready, and a GPIO
//! operation that returned a failure status. `Display` renders the console
//! line reported for each.

use core::fmt;

use hal::HalError;

/// GPIO operation that can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Configure,
    Toggle,
    Read,
    Set,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Toggle => "toggle",
            Self::Read => "read",
            Self::Set => "set",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Demo errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoError {
    /// Backing controller failed its readiness check
    NotReady {
        /// Controller label
        controller: &'static str,
    },
    /// GPIO operation returned a failure status
    Failed {
        op: Operation,
        pin: u32,
        source: HalError,
    },
}

impl DemoError {
    pub(crate) fn failed(op: Operation, pin: u32) -> impl FnOnce(HalError) -> Self {
        move |source| Self::Failed { op, pin, source }
    }

    /// Numeric status code.
    pub const fn code(&self) -> i32 {
        match self {
            Self::NotReady { .. } => HalError::NotReady.code(),
            Self::Failed { source, .. } => source.code(),
        }
    }

    pub const fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady { controller } => {
                write!(f, "Error: GPIO device {} is not ready", controller)
            }
            Self::Failed { op, pin, source } => {
                write!(f, "Error {}: Failed to {} GPIO pin {}", source.code(), op, pin)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotReady { .. } => None,
            Self::Failed { source, .. } => Some(source),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DemoError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NotReady { controller } => defmt::write!(fmt, "NotReady({})", controller),
            Self::Failed { op, pin, source } => {
                defmt::write!(fmt, "Failed({}, {}, {})", op.as_str(), pin, source)
            }
        }
    }
}
