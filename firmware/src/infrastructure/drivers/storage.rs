//! Flash partition holding the served files.

use esp_hal::peripherals::FLASH;
use esp_storage::FlashStorage;
use led_webserver_core::FlashFileSystem;
use static_cell::StaticCell;

use crate::{config, infrastructure::types::AppFileSystem};

static FILE_SYSTEM: StaticCell<AppFileSystem> = StaticCell::new();

/// Mount the `storage` partition at the configured base path.
///
/// A partition without a valid file table is mounted empty, the
/// built-in pages are still served.
pub fn mount_storage(flash: FLASH<'static>) -> &'static AppFileSystem {
    let storage = config::STORAGE;
    let fs = FlashFileSystem::mount_or_empty(
        FlashStorage::new(flash),
        storage.base_path,
        storage.partition_offset,
        storage.partition_size,
    );
    for (name, size) in fs.files() {
        log::info!("storage: {} ({} bytes)", name, size);
    }
    FILE_SYSTEM.init(fs)
}
