//! ESP32 GPIO implementation using ESP-IDF

use esp_idf_sys as sys;
use hal::error::{HalError, HalResult};
use hal::gpio::{GpioPin, Level, PinMode};

/// Label of the single GPIO controller on ESP32 chips
pub const CONTROLLER: &str = "gpio0";

/// Pads bonded out on the selected chip, one bit per GPIO number.
///
/// Mirrors `SOC_GPIO_VALID_GPIO_MASK` from ESP-IDF `soc_caps.h`. The ESP32 has
/// no GPIO24 or GPIO28 to GPIO31; the ESP32-S3 has no GPIO22 to GPIO25.
#[cfg(feature = "esp32s3")]
pub const VALID_GPIO_MASK: u64 = 0x1_FFFF_FFFF_FFFF & !(0xF << 22);
#[cfg(feature = "esp32c6")]
pub const VALID_GPIO_MASK: u64 = (1 << 31) - 1;
#[cfg(not(any(feature = "esp32s3", feature = "esp32c6")))]
pub const VALID_GPIO_MASK: u64 = 0xFF_FFFF_FFFF & !(1 << 24) & !(0xF << 28);

/// Whether `pin` names a pad that exists on the selected chip.
pub const fn pin_exists(pin: u32) -> bool {
    pin < u64::BITS && VALID_GPIO_MASK & (1 << pin) != 0
}

/// Whether `pin` can drive an output on the selected chip.
///
/// On the original ESP32, GPIO34 to GPIO39 are input-only pads.
pub const fn output_capable(pin: u32) -> bool {
    if cfg!(feature = "esp32") {
        pin < 34
    } else {
        true
    }
}

fn check(ret: sys::esp_err_t) -> HalResult<()> {
    if ret == sys::ESP_OK as i32 {
        Ok(())
    } else {
        Err(HalError::VendorError(ret))
    }
}

/// ESP32 GPIO pin implementation
#[derive(Debug)]
pub struct EspGpioPin {
    pin: u32,
    mode: Option<PinMode>,
}

impl EspGpioPin {
    /// Create a handle for a GPIO pin
    ///
    /// # Arguments
    /// * `pin` - GPIO pin number; validated by [`GpioPin::is_ready`]
    pub const fn new(pin: u32) -> Self {
        Self { pin, mode: None }
    }

    /// Mode set by the last successful `set_mode`
    pub fn mode(&self) -> Option<PinMode> {
        self.mode
    }

    fn gpio_num(&self) -> sys::gpio_num_t {
        self.pin as sys::gpio_num_t
    }
}

impl GpioPin for EspGpioPin {
    fn is_ready(&self) -> bool {
        pin_exists(self.pin)
    }

    fn set_mode(&mut self, mode: PinMode) -> HalResult<()> {
        if mode.is_output() && !output_capable(self.pin) {
            return Err(HalError::InvalidParameter);
        }

        let esp_mode = match mode {
            PinMode::Input | PinMode::InputPullUp | PinMode::InputPullDown => {
                sys::gpio_mode_t_GPIO_MODE_INPUT
            }
            PinMode::Output => sys::gpio_mode_t_GPIO_MODE_OUTPUT,
            PinMode::OutputOpenDrain => sys::gpio_mode_t_GPIO_MODE_OUTPUT_OD,
        };
        let pull = match mode {
            PinMode::InputPullUp => sys::gpio_pull_mode_t_GPIO_PULLUP_ONLY,
            PinMode::InputPullDown => sys::gpio_pull_mode_t_GPIO_PULLDOWN_ONLY,
            _ => sys::gpio_pull_mode_t_GPIO_FLOATING,
        };

        unsafe {
            // Route the pad to the GPIO matrix before changing direction
            check(sys::gpio_reset_pin(self.gpio_num()))?;
            check(sys::gpio_set_direction(self.gpio_num(), esp_mode))?;
            check(sys::gpio_set_pull_mode(self.gpio_num(), pull))?;
        }

        self.mode = Some(mode);
        Ok(())
    }

    fn read(&self) -> HalResult<Level> {
        if !self.is_ready() {
            return Err(HalError::InvalidParameter);
        }
        let level = unsafe { sys::gpio_get_level(self.gpio_num()) };
        Ok(if level != 0 { Level::High } else { Level::Low })
    }

    fn write(&mut self, level: Level) -> HalResult<()> {
        let val = match level {
            Level::Low => 0,
            Level::High => 1,
        };
        unsafe { check(sys::gpio_set_level(self.gpio_num(), val)) }
    }

    fn pin_number(&self) -> u32 {
        self.pin
    }
}
