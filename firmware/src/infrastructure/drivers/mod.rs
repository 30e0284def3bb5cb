mod led;
mod network;
mod random;
mod storage;

pub use led::init_led;
pub use network::{WifiNetwork, init_network_stack, wait_for_connection};
pub use storage::mount_storage;
