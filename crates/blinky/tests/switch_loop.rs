//! Switch loop behaviour against simulated pins

use blinky::{
    spawn_switch_context, switch_context, BoardConfig, ContextState, Cycles, DemoError, Poll,
    SwitchMirror, SwitchState, Transcript,
};
use hal::sim::{RecordingDelay, SimPin, SimProbe};
use hal::{ContextSpec, HalError, Level, Polarity, Spawn};

const CHANGED: &str = "Switch changed to: ";

fn started(board: &BoardConfig) -> (SwitchMirror<SimPin, SimPin>, SimProbe, SimProbe, Transcript) {
    let (led, led_probe) = SimPin::new(board.led1.pin);
    let (sw, sw_probe) = SimPin::new(board.sw0.pin);
    let mut console = Transcript::new();
    let mirror = SwitchMirror::start(board, led, sw, &mut console).expect("start should succeed");
    (mirror, led_probe, sw_probe, console)
}

#[test]
fn test_one_high_then_ten_lows_log_one_transition_for_the_run() {
    let board = BoardConfig::DEVKITC;
    let (mut mirror, _led_probe, sw_probe, mut console) = started(&board);

    sw_probe.push_read(Ok(Level::High));
    for _ in 0..10 {
        sw_probe.push_read(Ok(Level::Low));
    }

    let outcomes: Vec<Poll> = (0..11).map(|_| mirror.poll(&mut console)).collect();

    assert_eq!(outcomes[0], Poll::Changed(false));
    assert_eq!(outcomes[1], Poll::Changed(true));
    assert!(outcomes[2..].iter().all(|o| *o == Poll::Unchanged));
    assert_eq!(
        console.lines(),
        [
            "Switch-LED control thread started",
            "Switch changed to: OFF",
            "Switch changed to: ON",
        ]
    );
}

#[test]
fn test_change_logged_iff_state_differs() {
    let board = BoardConfig::DEVKITC;
    let (mut mirror, _led_probe, sw_probe, mut console) = started(&board);

    let script = [
        Level::High,
        Level::High,
        Level::Low,
        Level::Low,
        Level::High,
        Level::Low,
        Level::Low,
        Level::High,
    ];
    for level in script {
        sw_probe.push_read(Ok(level));
    }

    let mut previous: Option<Level> = None;
    for level in script {
        let logged_before = console.count_starting_with(CHANGED);
        mirror.poll(&mut console);
        let logged = console.count_starting_with(CHANGED) - logged_before;
        let expected = if previous == Some(level) { 0 } else { 1 };
        assert_eq!(logged, expected, "reading {:?} after {:?}", level, previous);
        previous = Some(level);
    }
}

#[test]
fn test_led_follows_last_successful_read() {
    let board = BoardConfig::DEVKITC;
    let (mut mirror, led_probe, sw_probe, mut console) = started(&board);

    let script = [
        Ok(Level::Low),
        Err(HalError::HardwareError),
        Ok(Level::Low),
        Ok(Level::High),
        Err(HalError::VendorError(263)),
        Ok(Level::Low),
    ];
    let mut last_ok: Option<Level> = None;
    for result in script {
        sw_probe.push_read(result);
        mirror.poll(&mut console);
        if let Ok(level) = result {
            last_ok = Some(level);
        }

        // Both lines are active-low, so the LED level equals the switch level.
        if let Some(level) = last_ok {
            assert_eq!(led_probe.level(), level);
            let expected = SwitchState::from_active(Polarity::ActiveLow.is_active(level));
            assert_eq!(mirror.state(), expected);
        }
    }
}

#[test]
fn test_read_failure_keeps_led_and_state() {
    let board = BoardConfig::DEVKITC;
    let (mut mirror, led_probe, sw_probe, mut console) = started(&board);

    sw_probe.push_read(Ok(Level::Low));
    mirror.poll(&mut console);
    let writes = led_probe.writes();
    let state = mirror.state();

    sw_probe.push_read(Err(HalError::HardwareError));
    sw_probe.push_read(Err(HalError::HardwareError));
    assert_eq!(mirror.poll(&mut console), Poll::ReadFailed);
    assert_eq!(mirror.poll(&mut console), Poll::ReadFailed);

    assert_eq!(led_probe.writes(), writes);
    assert_eq!(mirror.state(), state);
    assert_eq!(console.count_starting_with("Error -5: Failed to read GPIO pin 5"), 2);
}

#[test]
fn test_runtime_failures_do_not_stop_the_loop() {
    let board = BoardConfig::DEVKITC;
    let (led, led_probe) = SimPin::new(4);
    let (sw, sw_probe) = SimPin::new(5);
    let mut console = Transcript::new();
    let mut delay = RecordingDelay::new();

    led_probe.fail_writes_after(1, HalError::HardwareError);
    sw_probe.push_read(Err(HalError::HardwareError));
    sw_probe.drive(Level::Low);

    let state = switch_context(&board, led, sw, &mut console, &mut delay, Cycles::Limit(4));

    assert_eq!(state, ContextState::Polling);
    assert_eq!(delay.sleeps_ms(), vec![50, 50, 50, 50]);
    assert_eq!(
        console.lines(),
        [
            "Switch-LED control thread started",
            "Error -5: Failed to read GPIO pin 5",
            "Switch changed to: ON",
            "Error -5: Failed to set GPIO pin 4",
        ]
    );
}

#[test]
fn test_not_ready_switch_logs_once_and_touches_nothing() {
    let board = BoardConfig::DEVKITC;
    let (led, led_probe) = SimPin::new(4);
    let (sw, sw_probe) = SimPin::new(5);
    sw_probe.set_ready(false);
    let mut console = Transcript::new();
    let mut delay = RecordingDelay::new();

    let state = switch_context(&board, led, sw, &mut console, &mut delay, Cycles::Forever);

    assert!(state.error().map_or(false, |err| err.is_not_ready()));
    assert_eq!(console.lines(), ["Error: GPIO device gpio0 is not ready"]);
    assert_eq!(led_probe.operations(), 0);
    assert_eq!(sw_probe.operations(), 0);
    assert!(delay.sleeps_ms().is_empty());
}

#[test]
fn test_not_ready_led_logs_once_and_touches_nothing() {
    let board = BoardConfig::DEVKITC;
    let (led, led_probe) = SimPin::new(4);
    let (sw, sw_probe) = SimPin::new(5);
    led_probe.set_ready(false);
    let mut console = Transcript::new();
    let mut delay = RecordingDelay::new();

    let state = switch_context(&board, led, sw, &mut console, &mut delay, Cycles::Forever);

    assert_eq!(
        state,
        ContextState::Terminated(DemoError::NotReady { controller: "gpio0" })
    );
    assert_eq!(console.lines(), ["Error: GPIO device gpio0 is not ready"]);
    assert_eq!(led_probe.operations(), 0);
    assert_eq!(sw_probe.operations(), 0);
    assert!(delay.sleeps_ms().is_empty());
}

#[test]
fn test_input_configure_failure_is_fatal_to_context() {
    let board = BoardConfig::DEVKITC;
    let (led, _led_probe) = SimPin::new(4);
    let (sw, sw_probe) = SimPin::new(5);
    sw_probe.fail_set_mode(Some(HalError::NotSupported));
    let mut console = Transcript::new();
    let mut delay = RecordingDelay::new();

    let state = switch_context(&board, led, sw, &mut console, &mut delay, Cycles::Forever);

    assert!(state.is_terminated());
    assert_eq!(console.lines(), ["Error -134: Failed to configure GPIO pin 5"]);
}

/// Runs the context body on the calling thread.
#[derive(Default)]
struct InlineSpawner {
    spawned: Vec<ContextSpec>,
}

impl Spawn for InlineSpawner {
    type Error = ();

    fn spawn<F>(&mut self, spec: &ContextSpec, body: F) -> Result<(), ()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.spawned.push(*spec);
        body();
        Ok(())
    }
}

#[test]
fn test_spawn_uses_board_context() {
    static BOARD: BoardConfig = BoardConfig::DEVKITC;
    let (led, led_probe) = SimPin::new(4);
    let (sw, sw_probe) = SimPin::new(5);
    sw_probe.drive(Level::Low);
    let mut spawner = InlineSpawner::default();

    spawn_switch_context(
        &mut spawner,
        &BOARD,
        led,
        sw,
        Transcript::new(),
        RecordingDelay::new(),
        Cycles::Limit(3),
    )
    .expect("inline spawn cannot fail");

    assert_eq!(spawner.spawned, [BOARD.switch_context]);
    assert!(spawner.spawned[0].priority < BOARD.main_priority);
    assert_eq!(led_probe.level(), Level::Low);
}
