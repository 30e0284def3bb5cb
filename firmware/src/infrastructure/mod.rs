//! Hardware and network glue around the file server.

pub mod drivers;
pub mod tasks;
pub mod types;
