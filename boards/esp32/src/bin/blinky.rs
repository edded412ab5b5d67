//! Blink the DevKitC LED on GPIO2 once per second.

use blinky::{blink_context, Cycles, StdoutConsole};
use blinky_esp32::{init, BOARD};
use hal_esp::{EspDelay, EspGpioPin};

fn main() {
    init();

    let state = blink_context(
        &BOARD,
        EspGpioPin::new(BOARD.led0.pin),
        &mut StdoutConsole,
        &mut EspDelay::new(),
        Cycles::Forever,
    );

    // Returning deletes the main task.
    log::warn!("entry context ended in {:?}", state);
}
