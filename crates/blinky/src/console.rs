//! Console output
//!
//! The console is unstructured, line-oriented text for humans. Each context
//! owns its own [`Console`] handle.

use core::fmt;

/// Line sink for console messages.
pub trait Console {
    /// Write one line; the sink adds the terminator.
    fn write_line(&mut self, line: fmt::Arguments<'_>);

    /// Write any displayable value as one line.
    fn emit(&mut self, item: &dyn fmt::Display) {
        self.write_line(format_args!("{}", item));
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    fn write_line(&mut self, line: fmt::Arguments<'_>) {
        (**self).write_line(line);
    }
}

/// Fixed, non-error console messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Printed once the primary LED is configured
    Banner,
    /// New primary LED state after a toggle
    LedState(bool),
    /// Printed once the switch context is configured
    SwitchStarted,
    /// Accepted switch transition
    SwitchChanged(bool),
}

const fn on_off(on: bool) -> &'static str {
    if on {
        "ON"
    } else {
        "OFF"
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Banner => write!(f, "ESP32 Blinky Example"),
            Self::LedState(on) => write!(f, "LED state: {}", on_off(*on)),
            Self::SwitchStarted => write!(f, "Switch-LED control thread started"),
            Self::SwitchChanged(on) => write!(f, "Switch changed to: {}", on_off(*on)),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Notice {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Banner => defmt::write!(fmt, "Banner"),
            Self::LedState(on) => defmt::write!(fmt, "LedState({})", on),
            Self::SwitchStarted => defmt::write!(fmt, "SwitchStarted"),
            Self::SwitchChanged(on) => defmt::write!(fmt, "SwitchChanged({})", on),
        }
    }
}

/// Console backed by the process standard output.
///
/// On ESP-IDF targets stdout is the UART console.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

#[cfg(feature = "std")]
impl Console for StdoutConsole {
    fn write_line(&mut self, line: fmt::Arguments<'_>) {
        println!("{}", line);
    }
}

/// Console that keeps every line in memory.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    lines: Vec<String>,
}

#[cfg(feature = "std")]
impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines starting with `prefix`.
    pub fn count_starting_with(&self, prefix: &str) -> usize {
        self.lines.iter().filter(|line| line.starts_with(prefix)).count()
    }

    /// Most recent line, if any.
    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }
}

#[cfg(feature = "std")]
impl Console for Transcript {
    fn write_line(&mut self, line: fmt::Arguments<'_>) {
        self.lines.push(line.to_string());
    }
}
