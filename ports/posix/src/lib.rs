//! POSIX-specific pieces for hosting the blinky demo.
//!
//! Execution contexts become named `std` threads, sleeping uses
//! `std::thread::sleep`, and the board is simulated with [`hal::sim`] pins so
//! both variants can run on a development machine.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use blinky::BoardConfig;
use embedded_hal::delay::DelayNs;
use hal::sim::{SimPin, SimProbe};
use hal::{ContextSpec, Level, Spawn};

/// Smallest stack handed to a host thread.
///
/// Host frames are far larger than target frames.
pub const MIN_HOST_STACK: usize = 64 * 1024;

/// Delay that blocks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Spawns execution contexts as detached `std` threads.
///
/// Thread priorities are not portable across hosts; the requested priority
/// is only logged.
#[derive(Debug, Default)]
pub struct ThreadSpawner {
    spawned: usize,
}

impl ThreadSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of contexts started so far.
    pub fn spawned(&self) -> usize {
        self.spawned
    }
}

impl Spawn for ThreadSpawner {
    type Error = io::Error;

    fn spawn<F>(&mut self, spec: &ContextSpec, body: F) -> io::Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        log::debug!(
            "{}: host thread ignores {}, stack {} bytes",
            spec.name,
            spec.priority,
            spec.stack_size.max(MIN_HOST_STACK)
        );
        // The handle is dropped: contexts are never joined.
        thread::Builder::new()
            .name(spec.name.to_owned())
            .stack_size(spec.stack_size.max(MIN_HOST_STACK))
            .spawn(body)?;
        self.spawned += 1;
        Ok(())
    }
}

/// Board lines that can be simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardLine {
    Led0,
    Led1,
    Sw0,
}

/// Simulated DevKitC board: three pins and their probes.
#[derive(Debug)]
pub struct SimBoard {
    pub led0: SimPin,
    pub led1: SimPin,
    pub sw0: SimPin,
    led0_probe: SimProbe,
    led1_probe: SimProbe,
    sw0_probe: SimProbe,
}

impl SimBoard {
    pub fn new(board: &BoardConfig) -> Self {
        let (led0, led0_probe) = SimPin::new(board.led0.pin);
        let (led1, led1_probe) = SimPin::new(board.led1.pin);
        let (sw0, sw0_probe) = SimPin::new(board.sw0.pin);
        Self {
            led0,
            led1,
            sw0,
            led0_probe,
            led1_probe,
            sw0_probe,
        }
    }

    /// Probe for one of the board lines.
    pub fn probe(&self, line: BoardLine) -> SimProbe {
        match line {
            BoardLine::Led0 => self.led0_probe.clone(),
            BoardLine::Led1 => self.led1_probe.clone(),
            BoardLine::Sw0 => self.sw0_probe.clone(),
        }
    }
}

/// Simulated finger on the switch: flips its level on a fixed period.
#[derive(Debug)]
pub struct SwitchPresser {
    stop: Arc<AtomicBool>,
}

impl SwitchPresser {
    /// Start flipping `switch` every `period`, beginning released (high).
    pub fn start(switch: SimProbe, period: Duration) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        thread::Builder::new()
            .name("sim_presser".to_owned())
            .spawn(move || {
                let mut level = Level::High;
                switch.drive(level);
                while !flag.load(Ordering::Relaxed) {
                    thread::sleep(period);
                    level = !level;
                    log::trace!("simulated switch -> {:?}", level);
                    switch.drive(level);
                }
            })?;
        Ok(Self { stop })
    }
}

impl Drop for SwitchPresser {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::sync::{mpsc, Mutex};

    use blinky::{blink_context, spawn_switch_context, Console, ContextState, Cycles, Transcript};
    use hal::sim::RecordingDelay;
    use hal::ThreadPriority;

    /// Transcript that stays readable after its context moved to a thread.
    #[derive(Clone, Default)]
    struct SharedTranscript(Arc<Mutex<Transcript>>);

    impl SharedTranscript {
        fn lines(&self) -> Vec<String> {
            self.0.lock().unwrap().lines().to_vec()
        }
    }

    impl Console for SharedTranscript {
        fn write_line(&mut self, line: fmt::Arguments<'_>) {
            self.0.lock().unwrap().write_line(line);
        }
    }

    #[test]
    fn spawner_names_thread() {
        let (tx, rx) = mpsc::channel();
        let mut spawner = ThreadSpawner::new();
        let spec = ContextSpec::new("probe_ctx", ThreadPriority(1)).with_stack_size(1024);

        spawner
            .spawn(&spec, move || {
                let name = thread::current().name().map(str::to_owned);
                tx.send(name).unwrap();
            })
            .expect("spawn should succeed");

        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some("probe_ctx"));
        assert_eq!(spawner.spawned(), 1);
    }

    #[test]
    fn switch_context_runs_on_its_own_thread() {
        static BOARD: BoardConfig = BoardConfig::DEVKITC;
        let sim = SimBoard::new(&BOARD);
        let led1 = sim.probe(BoardLine::Led1);
        let sw0 = sim.probe(BoardLine::Sw0);
        sw0.drive(Level::Low);

        let mut spawner = ThreadSpawner::new();
        spawn_switch_context(
            &mut spawner,
            &BOARD,
            sim.led1,
            sim.sw0,
            Transcript::new(),
            RecordingDelay::new(),
            Cycles::Limit(1),
        )
        .expect("spawn should succeed");

        // Configured inactive (high), then one sample drives it active (low).
        let mut waited = 0;
        while led1.writes().len() < 2 && waited < 5000 {
            thread::sleep(Duration::from_millis(10));
            waited += 10;
        }
        assert_eq!(led1.writes(), vec![Level::High, Level::Low]);
    }

    #[test]
    fn presser_flips_switch() {
        let (_pin, probe) = SimPin::new(5);
        probe.drive(Level::High);
        let presser = SwitchPresser::start(probe.clone(), Duration::from_millis(5)).unwrap();

        let mut seen_low = false;
        for _ in 0..200 {
            if probe.level() == Level::Low {
                seen_low = true;
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        drop(presser);
        assert!(seen_low);
    }

    #[test]
    fn worker_configure_failure_leaves_entry_context_running() {
        static BOARD: BoardConfig = BoardConfig::DEVKITC;
        let sim = SimBoard::new(&BOARD);
        let led0 = sim.probe(BoardLine::Led0);
        let led1 = sim.probe(BoardLine::Led1);
        let sw0 = sim.probe(BoardLine::Sw0);
        led1.set_ready(false);

        let worker_console = SharedTranscript::default();
        spawn_switch_context(
            &mut ThreadSpawner::new(),
            &BOARD,
            sim.led1,
            sim.sw0,
            worker_console.clone(),
            RecordingDelay::new(),
            Cycles::Forever,
        )
        .expect("spawn should succeed");

        let mut main_console = Transcript::new();
        let state = blink_context(
            &BOARD,
            sim.led0,
            &mut main_console,
            &mut RecordingDelay::new(),
            Cycles::Limit(3),
        );

        let mut waited = 0;
        while worker_console.lines().is_empty() && waited < 5000 {
            thread::sleep(Duration::from_millis(10));
            waited += 10;
        }
        // Give a runaway worker the chance to print more than it should.
        thread::sleep(Duration::from_millis(50));

        assert_eq!(worker_console.lines(), ["Error: GPIO device gpio0 is not ready"]);
        assert_eq!(led1.operations(), 0);
        assert_eq!(sw0.operations(), 0);

        assert_eq!(state, ContextState::Polling);
        assert_eq!(led0.writes().len(), 4);
        assert_eq!(main_console.count_starting_with("LED state: "), 3);
    }
}
