use esp_hal::gpio::{Level, Output, OutputConfig, OutputPin};
use led_webserver_core::SharedLed;
use static_cell::StaticCell;

use crate::infrastructure::types::AppLed;

static LED: StaticCell<AppLed> = StaticCell::new();

/// Configure the LED pin as a push-pull output, starting low.
pub fn init_led(pin: impl OutputPin + 'static) -> &'static AppLed {
    let output = Output::new(pin, Level::Low, OutputConfig::default());
    LED.init(SharedLed::new(output))
}
