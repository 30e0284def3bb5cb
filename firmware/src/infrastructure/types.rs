use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use esp_hal::gpio::Output;
use esp_storage::FlashStorage;
use led_webserver_core::{FileServer, FlashFileSystem, SharedLed};

pub type AppLed = SharedLed<CriticalSectionRawMutex, Output<'static>>;
pub type AppFileSystem = FlashFileSystem<CriticalSectionRawMutex, FlashStorage<'static>>;
pub type AppFileServer = FileServer<'static, AppFileSystem, AppLed>;
