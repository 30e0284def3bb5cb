//! Wi-Fi station link and the embassy-net runner.

use embassy_net::Runner;
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{
    AuthMethod,
    ClientConfig,
    ModeConfig,
    WifiController,
    WifiDevice,
    WifiEvent,
    WifiStaState,
};

use crate::config;

const RECONNECT_DELAY: Duration = Duration::from_secs(2);
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Station configuration for the compiled-in network, open when no password is set.
fn station_config() -> ModeConfig {
    let client = ClientConfig::default().with_ssid(config::WIFI.ssid.into());
    let client = if config::WIFI.password.is_empty() {
        client.with_auth_method(AuthMethod::None)
    } else {
        client.with_password(config::WIFI.password.into())
    };
    ModeConfig::Client(client)
}

async fn ensure_started(controller: &mut WifiController<'static>) -> bool {
    if matches!(controller.is_started(), Ok(true)) {
        return true;
    }
    if let Err(e) = controller.set_config(&station_config()) {
        log::error!("wifi: rejected station config: {:?}", e);
        return false;
    }
    match controller.start_async().await {
        Ok(()) => true,
        Err(e) => {
            log::error!("wifi: start failed: {:?}", e);
            false
        }
    }
}

/// Keeps the station associated, reconnecting after every drop.
#[embassy_executor::task]
pub async fn wifi_connection_task(mut controller: WifiController<'static>) {
    loop {
        if esp_radio::wifi::sta_state() == WifiStaState::Connected {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            log::warn!("wifi: link lost");
            Timer::after(RECONNECT_DELAY).await;
        }
        if !ensure_started(&mut controller).await {
            Timer::after(RETRY_DELAY).await;
            continue;
        }

        log::info!("wifi: joining '{}'", config::WIFI.ssid);
        match controller.connect_async().await {
            Ok(()) => log::info!("wifi: associated"),
            Err(e) => {
                log::warn!("wifi: join failed: {:?}", e);
                Timer::after(RETRY_DELAY).await;
            }
        }
    }
}

#[embassy_executor::task]
pub async fn network_runner_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}
