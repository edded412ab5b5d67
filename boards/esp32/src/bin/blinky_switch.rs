//! Blink GPIO2 and mirror the switch on GPIO5 onto the LED on GPIO4.
//!
//! The switch loop runs in its own FreeRTOS task, one priority level below
//! the entry task, on a statically allocated stack.

use blinky::config::SWITCH_STACK_SIZE;
use blinky::{blink_context, spawn_switch_context, Cycles, StdoutConsole};
use blinky_esp32::{init, BOARD};
use hal_esp::task::set_current_priority;
use hal_esp::{EspDelay, EspGpioPin, EspSpawner, TaskSlot};

static SWITCH_TASK: TaskSlot<SWITCH_STACK_SIZE> = TaskSlot::new();

fn main() {
    init();

    // The IDF main task starts at priority 1; the worker must sit below it.
    set_current_priority(BOARD.main_priority);

    if let Err(err) = spawn_switch_context(
        &mut EspSpawner::new(&SWITCH_TASK),
        &BOARD,
        EspGpioPin::new(BOARD.led1.pin),
        EspGpioPin::new(BOARD.sw0.pin),
        StdoutConsole,
        EspDelay::new(),
        Cycles::Forever,
    ) {
        log::error!("failed to start {}: {}", BOARD.switch_context.name, err);
    }

    let state = blink_context(
        &BOARD,
        EspGpioPin::new(BOARD.led0.pin),
        &mut StdoutConsole,
        &mut EspDelay::new(),
        Cycles::Forever,
    );

    // The switch task keeps running after the main task is deleted.
    log::warn!("entry context ended in {:?}", state);
}
