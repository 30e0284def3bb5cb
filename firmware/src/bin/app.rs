#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{clock::CpuClock, timer::timg::TimerGroup};
use esp_println::println;

use led_webserver::config;
use led_webserver::infrastructure::drivers::{
    init_led, init_network_stack, mount_storage, wait_for_connection,
};
use led_webserver::infrastructure::tasks::{
    http_worker_task, network_runner_task, wifi_connection_task,
};
use led_webserver::infrastructure::types::AppFileServer;
use led_webserver_core::{ContextSlot, FileServer};
use static_cell::StaticCell;

esp_bootloader_esp_idf::esp_app_desc!();

static SERVER_CONTEXT: ContextSlot = ContextSlot::new();
static FILE_SERVER: StaticCell<AppFileServer> = StaticCell::new();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();
    println!("{} {}", config::DEVICE.name, config::BUILD_VERSION);

    // Initialize hardware
    let hal_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(hal_config);

    // Allocate heap memory for the radio (64 KB)
    esp_alloc::heap_allocator!(
        #[unsafe(link_section = ".dram2_uninit")] size: 64 * 1024
    );

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let led = init_led(led_webserver::led_gpio!(peripherals));
    let fs = mount_storage(peripherals.FLASH);

    let context = match SERVER_CONTEXT.start(config::STORAGE.base_path) {
        Ok(context) => context,
        Err(e) => {
            log::error!("app: file server not started: {:?}", e);
            loop {
                Timer::after(Duration::from_secs(5)).await;
            }
        }
    };
    let server: &'static AppFileServer = FILE_SERVER.init(FileServer::new(context, fs, led));

    // Initialize network stack and spawn network tasks
    let network = init_network_stack(peripherals.WIFI);
    let stack = network.stack;
    spawner.spawn(wifi_connection_task(network.controller)).ok();
    spawner.spawn(network_runner_task(network.runner)).ok();

    let ip_config = wait_for_connection(stack).await;
    println!("Connected, serving on http://{}/", ip_config.address.address());

    for worker_id in 0..config::HTTP_WORKERS {
        if let Err(e) = spawner.spawn(http_worker_task(stack, server, worker_id)) {
            log::error!("app: failed to spawn http worker {}: {:?}", worker_id, e);
        }
    }

    loop {
        Timer::after(Duration::from_secs(5)).await;
    }
}
