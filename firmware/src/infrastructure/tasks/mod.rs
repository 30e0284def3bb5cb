mod http_server;
mod network;

pub use http_server::http_worker_task;
pub use network::{network_runner_task, wifi_connection_task};
