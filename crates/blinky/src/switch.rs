//! Switch-controlled secondary loop
//!
//! The switch is sampled on a fixed period and compared with the last
//! accepted state; only a difference is reported and mirrored onto the LED.
//! The sampling period doubles as the debounce window. There is no
//! interrupt-driven edge detection and no multi-sample filter.

use embedded_hal::delay::DelayNs;
use hal::{GpioPin, InputLine, LineSpec, OutputLine, Spawn};

use crate::config::BoardConfig;
use crate::console::{Console, Notice};
use crate::context::{ContextState, Cycles, Lifecycle};
use crate::error::{DemoError, Operation};

/// Last accepted switch reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchState {
    /// Nothing accepted yet
    #[default]
    Unknown,
    /// Released
    Off,
    /// Pressed
    On,
}

impl SwitchState {
    pub const fn from_active(active: bool) -> Self {
        if active {
            SwitchState::On
        } else {
            SwitchState::Off
        }
    }
}

/// Outcome of one switch sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// Reading matched the accepted state
    Unchanged,
    /// Reading differed and was accepted; carries the new state
    Changed(bool),
    /// Reading failed; nothing changed
    ReadFailed,
}

/// Mirrors a switch onto an LED.
#[derive(Debug)]
pub struct SwitchMirror<O, I> {
    led: OutputLine<O>,
    switch: InputLine<I>,
    last: SwitchState,
    period_ms: u32,
}

fn ensure_ready<P: GpioPin, C: Console>(
    pin: &P,
    spec: &LineSpec,
    console: &mut C,
) -> Result<(), DemoError> {
    if pin.is_ready() {
        return Ok(());
    }
    let err = DemoError::NotReady {
        controller: spec.controller,
    };
    console.emit(&err);
    Err(err)
}

impl<O: GpioPin, I: GpioPin> SwitchMirror<O, I> {
    /// Check both lines, configure the LED (initially inactive) and the
    /// switch input, then announce the context.
    ///
    /// The first failure is reported on `console` and returned; no further
    /// GPIO operation happens after it.
    pub fn start<C: Console>(
        board: &BoardConfig,
        led: O,
        switch: I,
        console: &mut C,
    ) -> Result<Self, DemoError> {
        ensure_ready(&led, &board.led1, console)?;
        ensure_ready(&switch, &board.sw0, console)?;

        let led = OutputLine::configure(led, &board.led1, false)
            .map_err(DemoError::failed(Operation::Configure, board.led1.pin))
            .inspect_err(|err| console.emit(err))?;
        let switch = InputLine::configure(switch, &board.sw0)
            .map_err(DemoError::failed(Operation::Configure, board.sw0.pin))
            .inspect_err(|err| console.emit(err))?;

        console.emit(&Notice::SwitchStarted);

        Ok(Self {
            led,
            switch,
            last: SwitchState::Unknown,
            period_ms: board.poll_period_ms,
        })
    }

    /// Take one sample and mirror it if it changed.
    ///
    /// Read and LED failures are reported and otherwise ignored. A failed read
    /// leaves both the LED and the accepted state alone; a failed LED write
    /// still records the new state.
    pub fn poll<C: Console>(&mut self, console: &mut C) -> Poll {
        let active = match self.switch.is_active() {
            Ok(active) => active,
            Err(source) => {
                let err = DemoError::failed(Operation::Read, self.switch.pin_number())(source);
                console.emit(&err);
                return Poll::ReadFailed;
            }
        };

        let state = SwitchState::from_active(active);
        if state == self.last {
            return Poll::Unchanged;
        }

        console.emit(&Notice::SwitchChanged(active));
        if let Err(source) = self.led.set_active(active) {
            let err = DemoError::failed(Operation::Set, self.led.pin_number())(source);
            console.emit(&err);
        }
        self.last = state;
        Poll::Changed(active)
    }

    /// [`poll`](Self::poll), then sleep one period.
    pub fn step<C: Console, D: DelayNs>(&mut self, console: &mut C, delay: &mut D) -> Poll {
        let outcome = self.poll(console);
        delay.delay_ms(self.period_ms);
        outcome
    }

    /// Last accepted switch state.
    pub fn state(&self) -> SwitchState {
        self.last
    }

    pub fn led(&self) -> &OutputLine<O> {
        &self.led
    }
}

/// Body of the switch context: start the mirror on `board.led1`/`board.sw0`
/// and loop.
///
/// Returns `Terminated` when configuration fails (the caller's context keeps
/// running) and `Polling` when a bounded run used up its cycles. Runtime
/// failures never stop the loop.
pub fn switch_context<O, I, C, D>(
    board: &BoardConfig,
    led: O,
    switch: I,
    console: &mut C,
    delay: &mut D,
    cycles: Cycles,
) -> ContextState
where
    O: GpioPin,
    I: GpioPin,
    C: Console,
    D: DelayNs,
{
    let mut lifecycle = Lifecycle::new(board.switch_context.name);
    lifecycle.advance(ContextState::Configuring);

    let mut mirror = match SwitchMirror::start(board, led, switch, console) {
        Ok(mirror) => mirror,
        Err(err) => return lifecycle.advance(ContextState::Terminated(err)),
    };
    lifecycle.advance(ContextState::Polling);

    let mut done = 0u32;
    while cycles.allows(done) {
        mirror.step(console, delay);
        done = done.wrapping_add(1);
    }
    lifecycle.state()
}

/// Start the switch context through `spawner` with the board's context
/// descriptor.
///
/// The context owns everything it is given; nothing is shared with the
/// caller, and it is never joined.
pub fn spawn_switch_context<S, O, I, C, D>(
    spawner: &mut S,
    board: &'static BoardConfig,
    led: O,
    switch: I,
    mut console: C,
    mut delay: D,
    cycles: Cycles,
) -> Result<(), S::Error>
where
    S: Spawn,
    O: GpioPin + 'static,
    I: GpioPin + 'static,
    C: Console + Send + 'static,
    D: DelayNs + Send + 'static,
{
    log::info!(
        "spawning {} at {} with {} byte stack",
        board.switch_context.name,
        board.switch_context.priority,
        board.switch_context.stack_size
    );
    spawner.spawn(&board.switch_context, move || {
        let state = switch_context(board, led, switch, &mut console, &mut delay, cycles);
        log::debug!("{} exited in {:?}", board.switch_context.name, state);
    })
}

#[cfg(feature = "defmt")]
impl defmt::Format for SwitchState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SwitchState::Unknown => defmt::write!(fmt, "Unknown"),
            SwitchState::Off => defmt::write!(fmt, "Off"),
            SwitchState::On => defmt::write!(fmt, "On"),
        }
    }
}
