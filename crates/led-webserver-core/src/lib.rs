#![cfg_attr(not(test), no_std)]

pub mod fs;
pub mod http;
pub mod led;
pub mod server;

pub use fs::{FileStat, FileSystem, FlashFileSystem, FsError};
pub use http::{HttpConnection, HttpHandler};
pub use led::{LedLevel, LedSwitch, SharedLed};
pub use server::{ContextSlot, FileServer, ServerContext, StartError};
