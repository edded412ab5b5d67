//! Board configuration
//!
//! Line descriptors stand in for the board's hardware description: a fixed
//! mapping from symbolic name to controller and pin. Everything here is
//! `const` and is passed by reference into the contexts that use it.

use hal::{ContextSpec, LineSpec, Polarity, Pull, ThreadPriority};

/// Label of the GPIO controller all demo lines live on
pub const GPIO_CONTROLLER: &str = "gpio0";

/// 1000 msec = 1 sec
pub const BLINK_PERIOD_MS: u32 = 1000;

/// Switch sampling period, also the implicit debounce window
pub const POLL_PERIOD_MS: u32 = 50;

/// Stack reserved for the switch context, in bytes
///
/// The context formats and prints through std and the IDF logger, which needs
/// the same headroom as the IDF main task (`CONFIG_ESP_MAIN_TASK_STACK_SIZE`).
pub const SWITCH_STACK_SIZE: usize = 8 * 1024;

/// Name of the switch context
pub const SWITCH_CONTEXT_NAME: &str = "switch_led";

/// Lines, periods and contexts of one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// Primary LED, toggled by the blink loop
    pub led0: LineSpec,
    /// Secondary LED, mirrors the switch
    pub led1: LineSpec,
    /// Switch input
    pub sw0: LineSpec,
    /// Blink loop period
    pub blink_period_ms: u32,
    /// Switch loop period
    pub poll_period_ms: u32,
    /// Entry context priority
    pub main_priority: ThreadPriority,
    /// Switch context descriptor
    pub switch_context: ContextSpec,
}

impl BoardConfig {
    /// ESP32 DevKitC wiring.
    ///
    /// The built-in LED on pin 2 is active low on most DevKitC boards; the
    /// second LED and the switch follow the same convention, the switch
    /// closing to ground against the internal pull-up.
    pub const DEVKITC: BoardConfig = BoardConfig {
        led0: LineSpec::output(GPIO_CONTROLLER, 2, Polarity::ActiveLow),
        led1: LineSpec::output(GPIO_CONTROLLER, 4, Polarity::ActiveLow),
        sw0: LineSpec::input(GPIO_CONTROLLER, 5, Polarity::ActiveLow, Pull::Up),
        blink_period_ms: BLINK_PERIOD_MS,
        poll_period_ms: POLL_PERIOD_MS,
        main_priority: ThreadPriority::DEFAULT,
        switch_context: ContextSpec::new(SWITCH_CONTEXT_NAME, ThreadPriority::DEFAULT.below())
            .with_stack_size(SWITCH_STACK_SIZE),
    };
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::DEVKITC
    }
}
