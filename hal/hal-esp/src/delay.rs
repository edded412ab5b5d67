//! FreeRTOS-backed delay

use embedded_hal::delay::DelayNs;
use esp_idf_sys as sys;

/// Convert milliseconds to scheduler ticks for `vTaskDelay`.
///
/// `vTaskDelay(n)` counts tick interrupts, so the first one may arrive almost
/// immediately. A non-zero delay is rounded up and given one extra tick so the
/// task never wakes before `ms` have elapsed.
pub const fn ms_to_ticks(ms: u32) -> sys::TickType_t {
    if ms == 0 {
        return 0;
    }
    let ticks = (ms as u64 * sys::configTICK_RATE_HZ as u64).div_ceil(1000) + 1;
    if ticks > sys::TickType_t::MAX as u64 {
        sys::TickType_t::MAX
    } else {
        ticks as sys::TickType_t
    }
}

/// Delay that suspends the calling task.
///
/// Millisecond delays block in the scheduler and let other tasks run.
/// Sub-millisecond remainders spin in ROM, since they are shorter than a tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct EspDelay;

impl EspDelay {
    pub const fn new() -> Self {
        Self
    }
}

impl DelayNs for EspDelay {
    fn delay_ns(&mut self, ns: u32) {
        let ms = ns / 1_000_000;
        if ms > 0 {
            self.delay_ms(ms);
        }
        let rest_us = (ns % 1_000_000).div_ceil(1000);
        if rest_us > 0 {
            unsafe { sys::esp_rom_delay_us(rest_us) };
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        unsafe { sys::vTaskDelay(ms_to_ticks(ms)) };
    }
}
