use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::RawMutex};
use embedded_hal::digital::OutputPin;

/// Logical LED level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedLevel {
    Off,
    On,
}

impl LedLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            LedLevel::Off => "off",
            LedLevel::On => "on",
        }
    }
}

/// Port for driving the LED output.
pub trait LedSwitch {
    fn set_level(&self, level: LedLevel);
}

/// GPIO output shared between HTTP workers.
///
/// The level is not mirrored in software, the pin register is the state.
pub struct SharedLed<M: RawMutex, P: OutputPin> {
    pin: Mutex<M, RefCell<P>>,
}

impl<M: RawMutex, P: OutputPin> SharedLed<M, P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin: Mutex::new(RefCell::new(pin)),
        }
    }
}

impl<M: RawMutex, P: OutputPin> LedSwitch for SharedLed<M, P> {
    fn set_level(&self, level: LedLevel) {
        let result = self.pin.lock(|pin| {
            let mut pin = pin.borrow_mut();
            match level {
                LedLevel::On => pin.set_high(),
                LedLevel::Off => pin.set_low(),
            }
        });
        if let Err(_e) = result {
            log::error!("led: failed to switch {}", level.as_str());
        }
    }
}
