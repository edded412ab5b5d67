//! GPIO (General Purpose Input/Output) abstraction
//!
//! Raw pins implement [`GpioPin`] and speak in electrical levels. Application
//! code drives [`OutputLine`] and reads [`InputLine`], which speak in logical
//! terms (active / inactive) and apply the line's [`Polarity`].

use core::ops::Not;

use crate::error::HalResult;

/// GPIO pin modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Input (floating)
    Input,
    /// Input with pull-up resistor
    InputPullUp,
    /// Input with pull-down resistor
    InputPullDown,
    /// Output (push-pull)
    Output,
    /// Output (open-drain)
    OutputOpenDrain,
}

impl PinMode {
    /// Returns true for the output modes.
    pub const fn is_output(self) -> bool {
        matches!(self, Self::Output | Self::OutputOpenDrain)
    }
}

/// GPIO pin levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Low level (0V)
    Low,
    /// High level (VCC)
    High,
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Which electrical level means "asserted"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// High level is active
    ActiveHigh,
    /// Low level is active
    ActiveLow,
}

impl Polarity {
    /// Electrical level that represents the given logical state.
    pub const fn level(self, active: bool) -> Level {
        match (self, active) {
            (Polarity::ActiveHigh, true) | (Polarity::ActiveLow, false) => Level::High,
            (Polarity::ActiveHigh, false) | (Polarity::ActiveLow, true) => Level::Low,
        }
    }

    /// Logical state represented by an electrical level.
    pub const fn is_active(self, level: Level) -> bool {
        matches!(
            (self, level),
            (Polarity::ActiveHigh, Level::High) | (Polarity::ActiveLow, Level::Low)
        )
    }
}

/// Input bias resistor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    /// Floating
    None,
    /// Pull-up
    Up,
    /// Pull-down
    Down,
}

/// Static description of one GPIO line on a board.
///
/// Descriptors are plain `const` data; they never change after definition and
/// are handed to the code that configures the line by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpec {
    /// Label of the controller the pin belongs to (e.g. `gpio0`)
    pub controller: &'static str,
    /// Pin number on that controller
    pub pin: u32,
    /// Active polarity
    pub polarity: Polarity,
    /// Bias resistor (inputs only)
    pub pull: Pull,
}

impl LineSpec {
    /// Describe an output line.
    pub const fn output(controller: &'static str, pin: u32, polarity: Polarity) -> Self {
        Self {
            controller,
            pin,
            polarity,
            pull: Pull::None,
        }
    }

    /// Describe an input line.
    pub const fn input(controller: &'static str, pin: u32, polarity: Polarity, pull: Pull) -> Self {
        Self {
            controller,
            pin,
            polarity,
            pull,
        }
    }

    /// Pin mode used when configuring this line as an input.
    pub const fn input_mode(&self) -> PinMode {
        match self.pull {
            Pull::None => PinMode::Input,
            Pull::Up => PinMode::InputPullUp,
            Pull::Down => PinMode::InputPullDown,
        }
    }
}

/// GPIO pin trait (object-safe)
pub trait GpioPin: Send {
    /// Whether the backing controller is ready for use
    fn is_ready(&self) -> bool;

    /// Configure pin mode
    fn set_mode(&mut self, mode: PinMode) -> HalResult<()>;

    /// Read current level
    fn read(&self) -> HalResult<Level>;

    /// Write level (for output pins)
    fn write(&mut self, level: Level) -> HalResult<()>;

    /// Get pin number
    fn pin_number(&self) -> u32;
}

/// A pin configured as an output, driven in logical terms.
///
/// The commanded state is tracked here and never read back from hardware;
/// output-only pads do not report their own level on every chip.
#[derive(Debug)]
pub struct OutputLine<P> {
    pin: P,
    polarity: Polarity,
    active: bool,
}

impl<P: GpioPin> OutputLine<P> {
    /// Configure `pin` as a push-pull output and drive its initial state.
    pub fn configure(mut pin: P, spec: &LineSpec, initially_active: bool) -> HalResult<Self> {
        pin.set_mode(PinMode::Output)?;
        pin.write(spec.polarity.level(initially_active))?;
        Ok(Self {
            pin,
            polarity: spec.polarity,
            active: initially_active,
        })
    }

    /// Drive the line to the given logical state.
    ///
    /// The tracked state only changes when the write succeeds.
    pub fn set_active(&mut self, active: bool) -> HalResult<()> {
        self.pin.write(self.polarity.level(active))?;
        self.active = active;
        Ok(())
    }

    /// Invert the line and return the new logical state.
    pub fn toggle(&mut self) -> HalResult<bool> {
        self.set_active(!self.active)?;
        Ok(self.active)
    }

    /// Last successfully commanded logical state.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pin_number(&self) -> u32 {
        self.pin.pin_number()
    }

    /// Give the raw pin back.
    pub fn release(self) -> P {
        self.pin
    }
}

/// A pin configured as an input, read in logical terms.
#[derive(Debug)]
pub struct InputLine<P> {
    pin: P,
    polarity: Polarity,
}

impl<P: GpioPin> InputLine<P> {
    /// Configure `pin` as an input using the descriptor's bias.
    pub fn configure(mut pin: P, spec: &LineSpec) -> HalResult<Self> {
        pin.set_mode(spec.input_mode())?;
        Ok(Self {
            pin,
            polarity: spec.polarity,
        })
    }

    /// Sample the line; `true` means asserted.
    pub fn is_active(&self) -> HalResult<bool> {
        self.pin.read().map(|level| self.polarity.is_active(level))
    }

    pub fn pin_number(&self) -> u32 {
        self.pin.pin_number()
    }

    /// Give the raw pin back.
    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Level {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Level::Low => defmt::write!(fmt, "Low"),
            Level::High => defmt::write!(fmt, "High"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LineSpec {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}/{}", self.controller, self.pin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_low_inverts() {
        assert_eq!(Polarity::ActiveLow.level(true), Level::Low);
        assert_eq!(Polarity::ActiveLow.level(false), Level::High);
        assert!(Polarity::ActiveLow.is_active(Level::Low));
        assert!(!Polarity::ActiveLow.is_active(Level::High));
    }

    #[test]
    fn active_high_passes_through() {
        assert_eq!(Polarity::ActiveHigh.level(true), Level::High);
        assert!(Polarity::ActiveHigh.is_active(Level::High));
    }

    #[test]
    fn input_mode_follows_pull() {
        let sw = LineSpec::input("gpio0", 5, Polarity::ActiveLow, Pull::Up);
        assert_eq!(sw.input_mode(), PinMode::InputPullUp);
        let floating = LineSpec::input("gpio0", 6, Polarity::ActiveHigh, Pull::None);
        assert_eq!(floating.input_mode(), PinMode::Input);
    }

    #[test]
    fn level_not() {
        assert_eq!(!Level::Low, Level::High);
        assert_eq!(Level::from(true), Level::High);
    }
}
