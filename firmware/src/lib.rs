//! ESP32 firmware serving the LED switch and the flash file system over HTTP.

#![no_std]

pub mod config;
pub mod infrastructure;
