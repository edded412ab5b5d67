//! Primary blink loop

use embedded_hal::delay::DelayNs;
use hal::{GpioPin, LineSpec, OutputLine};

use crate::config::BoardConfig;
use crate::console::{Console, Notice};
use crate::context::{ContextState, Cycles, Lifecycle};
use crate::error::{DemoError, Operation};

/// Name the entry context reports in diagnostics
pub const MAIN_CONTEXT_NAME: &str = "main";

/// Toggles one LED on a fixed period.
#[derive(Debug)]
pub struct Blinker<P> {
    led: OutputLine<P>,
    led_on: bool,
    period_ms: u32,
}

impl<P: GpioPin> Blinker<P> {
    /// Check readiness, configure the LED as an output (initially active) and
    /// print the banner.
    ///
    /// Failures are reported on `console` before they are returned. A line
    /// that is not ready sees no further GPIO operation.
    pub fn start<C: Console>(
        spec: &LineSpec,
        period_ms: u32,
        pin: P,
        console: &mut C,
    ) -> Result<Self, DemoError> {
        if !pin.is_ready() {
            let err = DemoError::NotReady {
                controller: spec.controller,
            };
            console.emit(&err);
            return Err(err);
        }

        let led = OutputLine::configure(pin, spec, true)
            .map_err(DemoError::failed(Operation::Configure, spec.pin))
            .inspect_err(|err| console.emit(err))?;

        console.emit(&Notice::Banner);

        Ok(Self {
            led,
            led_on: true,
            period_ms,
        })
    }

    /// Toggle the LED, report the new state and sleep one period.
    ///
    /// Returns the new on/off state. A toggle failure is reported and
    /// returned without sleeping.
    pub fn step<C: Console, D: DelayNs>(
        &mut self,
        console: &mut C,
        delay: &mut D,
    ) -> Result<bool, DemoError> {
        let pin = self.led.pin_number();
        self.led_on = self
            .led
            .toggle()
            .map_err(DemoError::failed(Operation::Toggle, pin))
            .inspect_err(|err| console.emit(err))?;

        console.emit(&Notice::LedState(self.led_on));
        delay.delay_ms(self.period_ms);
        Ok(self.led_on)
    }

    /// Current on/off flag.
    pub fn is_on(&self) -> bool {
        self.led_on
    }

    pub fn led(&self) -> &OutputLine<P> {
        &self.led
    }
}

/// Body of the entry context: start the blinker on `board.led0` and loop.
///
/// Returns the state the context ended in: `Terminated` after a fatal error,
/// `Polling` when a bounded run used up its cycles.
pub fn blink_context<P, C, D>(
    board: &BoardConfig,
    pin: P,
    console: &mut C,
    delay: &mut D,
    cycles: Cycles,
) -> ContextState
where
    P: GpioPin,
    C: Console,
    D: DelayNs,
{
    blink_context_while(board, pin, console, delay, cycles, || true)
}

/// [`blink_context`] that also stops once `keep_running` returns false.
///
/// `keep_running` is checked before every toggle, so a stop request takes
/// effect after at most one period.
pub fn blink_context_while<P, C, D, K>(
    board: &BoardConfig,
    pin: P,
    console: &mut C,
    delay: &mut D,
    cycles: Cycles,
    mut keep_running: K,
) -> ContextState
where
    P: GpioPin,
    C: Console,
    D: DelayNs,
    K: FnMut() -> bool,
{
    let mut lifecycle = Lifecycle::new(MAIN_CONTEXT_NAME);
    lifecycle.advance(ContextState::Configuring);

    let mut blinker = match Blinker::start(&board.led0, board.blink_period_ms, pin, console) {
        Ok(blinker) => blinker,
        Err(err) => return lifecycle.advance(ContextState::Terminated(err)),
    };
    lifecycle.advance(ContextState::Polling);

    let mut done = 0u32;
    while cycles.allows(done) && keep_running() {
        if let Err(err) = blinker.step(console, delay) {
            return lifecycle.advance(ContextState::Terminated(err));
        }
        done = done.wrapping_add(1);
    }
    log::debug!("{}: stopped after {} toggles", MAIN_CONTEXT_NAME, done);
    lifecycle.state()
}
