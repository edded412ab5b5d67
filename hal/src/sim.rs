//! Simulated GPIO pins and delays
//!
//! [`SimPin`] behaves like a board pin backed by shared state. The matching
//! [`SimProbe`] stays with the test (or the host simulator) to flip readiness,
//! drive the input level, script reads, inject failures and inspect writes.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use embedded_hal::delay::DelayNs;

use crate::error::{HalError, HalResult};
use crate::gpio::{GpioPin, Level, PinMode};

#[derive(Debug)]
struct PinState {
    ready: bool,
    mode: Option<PinMode>,
    level: Level,
    driven: bool,
    reads: VecDeque<HalResult<Level>>,
    mode_error: Option<HalError>,
    write_error: Option<(HalError, usize)>,
    writes: Vec<Level>,
    operations: usize,
}

impl PinState {
    fn new() -> Self {
        Self {
            ready: true,
            mode: None,
            level: Level::Low,
            driven: false,
            reads: VecDeque::new(),
            mode_error: None,
            write_error: None,
            writes: Vec::new(),
            operations: 0,
        }
    }
}

fn lock(state: &Mutex<PinState>) -> MutexGuard<'_, PinState> {
    // A panicking test thread must not hide the pin from the others.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Simulated GPIO pin
#[derive(Debug)]
pub struct SimPin {
    pin: u32,
    state: Arc<Mutex<PinState>>,
}

/// Test-side handle onto a [`SimPin`]
#[derive(Debug, Clone)]
pub struct SimProbe {
    state: Arc<Mutex<PinState>>,
}

impl SimPin {
    /// Create a ready, unconfigured pin and its probe.
    pub fn new(pin: u32) -> (Self, SimProbe) {
        let state = Arc::new(Mutex::new(PinState::new()));
        let probe = SimProbe {
            state: Arc::clone(&state),
        };
        (Self { pin, state }, probe)
    }
}

impl GpioPin for SimPin {
    fn is_ready(&self) -> bool {
        lock(&self.state).ready
    }

    fn set_mode(&mut self, mode: PinMode) -> HalResult<()> {
        let mut state = lock(&self.state);
        state.operations += 1;
        if let Some(err) = state.mode_error {
            return Err(err);
        }
        if mode == PinMode::InputPullUp && !state.driven {
            state.level = Level::High;
        }
        state.mode = Some(mode);
        Ok(())
    }

    fn read(&self) -> HalResult<Level> {
        let mut state = lock(&self.state);
        state.operations += 1;
        match state.reads.pop_front() {
            Some(scripted) => scripted,
            None => Ok(state.level),
        }
    }

    fn write(&mut self, level: Level) -> HalResult<()> {
        let mut state = lock(&self.state);
        state.operations += 1;
        if let Some((err, successes_left)) = state.write_error {
            if successes_left == 0 {
                return Err(err);
            }
            state.write_error = Some((err, successes_left - 1));
        }
        if !state.mode.map_or(false, PinMode::is_output) {
            return Err(HalError::InvalidParameter);
        }
        state.level = level;
        state.writes.push(level);
        Ok(())
    }

    fn pin_number(&self) -> u32 {
        self.pin
    }
}

impl SimProbe {
    /// Make the backing controller pass or fail its readiness check.
    pub fn set_ready(&self, ready: bool) {
        lock(&self.state).ready = ready;
    }

    /// Drive the electrical level seen by reads (external signal).
    pub fn drive(&self, level: Level) {
        let mut state = lock(&self.state);
        state.level = level;
        state.driven = true;
    }

    /// Queue a scripted read result, consumed before the driven level.
    pub fn push_read(&self, result: HalResult<Level>) {
        lock(&self.state).reads.push_back(result);
    }

    /// Make every mode change fail with `err` (or succeed again with `None`).
    pub fn fail_set_mode(&self, err: Option<HalError>) {
        lock(&self.state).mode_error = err;
    }

    /// Make every write fail with `err` (or succeed again with `None`).
    pub fn fail_writes(&self, err: Option<HalError>) {
        lock(&self.state).write_error = err.map(|err| (err, 0));
    }

    /// Let `successes` more writes through, then fail every write with `err`.
    pub fn fail_writes_after(&self, successes: usize, err: HalError) {
        lock(&self.state).write_error = Some((err, successes));
    }

    /// Current electrical level.
    pub fn level(&self) -> Level {
        lock(&self.state).level
    }

    /// Configured mode, if any.
    pub fn mode(&self) -> Option<PinMode> {
        lock(&self.state).mode
    }

    /// Every successful write, oldest first.
    pub fn writes(&self) -> Vec<Level> {
        lock(&self.state).writes.clone()
    }

    /// Number of mode, read and write calls made on the pin.
    pub fn operations(&self) -> usize {
        lock(&self.state).operations
    }

    /// Scripted reads not consumed yet.
    pub fn pending_reads(&self) -> usize {
        lock(&self.state).reads.len()
    }
}

/// Delay that records requested sleeps instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    sleeps_ns: Vec<u64>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested sleeps in milliseconds, oldest first.
    pub fn sleeps_ms(&self) -> Vec<u64> {
        self.sleeps_ns.iter().map(|ns| ns / 1_000_000).collect()
    }

    /// Total simulated time slept, in milliseconds.
    pub fn total_ms(&self) -> u64 {
        self.sleeps_ns.iter().sum::<u64>() / 1_000_000
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.sleeps_ns.push(u64::from(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.sleeps_ns.push(u64::from(ms) * 1_000_000);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_up_reads_high_until_driven() {
        let (mut pin, probe) = SimPin::new(5);
        pin.set_mode(PinMode::InputPullUp).unwrap();
        assert_eq!(pin.read(), Ok(Level::High));
        probe.drive(Level::Low);
        assert_eq!(pin.read(), Ok(Level::Low));
    }

    #[test]
    fn scripted_reads_come_first() {
        let (pin, probe) = SimPin::new(5);
        probe.push_read(Err(HalError::HardwareError));
        assert_eq!(pin.read(), Err(HalError::HardwareError));
        assert_eq!(pin.read(), Ok(Level::Low));
        assert_eq!(probe.operations(), 2);
    }

    #[test]
    fn write_requires_output_mode() {
        let (mut pin, probe) = SimPin::new(2);
        assert_eq!(pin.write(Level::High), Err(HalError::InvalidParameter));
        pin.set_mode(PinMode::Output).unwrap();
        pin.write(Level::High).unwrap();
        assert_eq!(probe.writes(), vec![Level::High]);
    }

    #[test]
    fn delay_records_milliseconds() {
        let mut delay = RecordingDelay::new();
        delay.delay_ms(50);
        delay.delay_ms(1000);
        assert_eq!(delay.sleeps_ms(), vec![50, 1000]);
        assert_eq!(delay.total_ms(), 1050);
    }
}
