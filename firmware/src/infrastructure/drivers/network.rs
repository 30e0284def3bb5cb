use embassy_net::{DhcpConfig, Runner, Stack, StackResources, StaticConfigV4};
use embassy_time::{Duration, Timer};
use esp_hal::peripherals::WIFI;
use esp_radio::wifi::{Config as WifiConfig, WifiController, WifiDevice};
use heapless::String;
use static_cell::StaticCell;

use super::random::network_seed;
use crate::config;

/// One socket per HTTP worker, plus DHCP and DNS.
const SOCKET_COUNT: usize = config::HTTP_WORKERS + 2;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

static RADIO: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
static RESOURCES: StaticCell<StackResources<SOCKET_COUNT>> = StaticCell::new();

/// Parts of the station network, each handed to its own owner.
pub struct WifiNetwork {
    pub stack: Stack<'static>,
    pub runner: Runner<'static, WifiDevice<'static>>,
    pub controller: WifiController<'static>,
}

/// Bring up the radio in station mode with a DHCP client.
pub fn init_network_stack(wifi: WIFI<'static>) -> WifiNetwork {
    let radio = RADIO.init(esp_radio::init().expect("radio init failed"));
    let (controller, interfaces) =
        esp_radio::wifi::new(radio, wifi, WifiConfig::default()).expect("wifi init failed");

    let mut hostname = String::new();
    hostname
        .push_str(config::DEVICE.hostname)
        .expect("hostname fits DHCP option");
    let mut dhcp = DhcpConfig::default();
    dhcp.hostname = Some(hostname);

    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        embassy_net::Config::dhcpv4(dhcp),
        RESOURCES.init(StackResources::new()),
        network_seed(),
    );

    WifiNetwork {
        stack,
        runner,
        controller,
    }
}

/// Resolve once the link is up and DHCP has assigned an address.
pub async fn wait_for_connection(stack: Stack<'_>) -> StaticConfigV4 {
    loop {
        if stack.is_link_up() {
            if let Some(v4) = stack.config_v4() {
                return v4;
            }
        }
        Timer::after(POLL_INTERVAL).await;
    }
}
