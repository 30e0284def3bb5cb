//! Compile-time device configuration.

pub struct WifiConfig {
    pub ssid: &'static str,
    pub password: &'static str,
}

pub struct DeviceConfig {
    pub name: &'static str,
    pub hostname: &'static str,
}

pub struct HttpConfig {
    pub port: u16,
    pub socket_timeout_secs: u64,
}

pub struct StorageConfig {
    /// Where the file table is mounted, the only base path the server accepts.
    pub base_path: &'static str,
    /// `storage` partition from `partitions.csv`.
    pub partition_offset: u32,
    pub partition_size: u32,
}

pub const BUILD_VERSION: &str = env!("BUILD_VERSION");

pub const WIFI: WifiConfig = WifiConfig {
    ssid: env!("WIFI_SSID"),
    password: env!("WIFI_PASSWORD"),
};

pub const DEVICE: DeviceConfig = DeviceConfig {
    name: "LED Web Server",
    hostname: "led-webserver",
};

pub const HTTP: HttpConfig = HttpConfig {
    port: 80,
    socket_timeout_secs: 30,
};

/// Number of connections served at the same time.
pub const HTTP_WORKERS: usize = 2;

pub const STORAGE: StorageConfig = StorageConfig {
    base_path: "/spiffs",
    partition_offset: 0x11_0000,
    partition_size: 0xF_0000,
};

/// GPIO driving the LED.
#[macro_export]
macro_rules! led_gpio {
    ($p:expr) => {
        $p.GPIO27
    };
}
