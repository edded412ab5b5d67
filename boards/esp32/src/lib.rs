//! ESP32 DevKitC firmware for the blinky demo
//!
//! Both binaries share the board description and the runtime setup here.
//! `blinky` runs the blink loop alone; `blinky-switch` also starts the
//! switch-mirror task before entering the blink loop.

use blinky::BoardConfig;
use esp_idf_svc::log::EspLogger;

/// Line and context layout of the ESP32 DevKitC
pub static BOARD: BoardConfig = BoardConfig::DEVKITC;

/// Apply the ESP-IDF runtime patches and route `log` to the IDF logger.
///
/// Must run first in `main`.
pub fn init() {
    esp_idf_sys::link_patches();
    EspLogger::initialize_default();
    log::info!("board ready, controller {}", hal_esp::gpio::CONTROLLER);
}
