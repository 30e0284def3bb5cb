//! Web pages embedded into the firmware image.
//!
//! The HTML pages are body fragments: the server sends the
//! `<!DOCTYPE html><html><body>` opening before them.

#![no_std]

/// Page served after the LED was switched on.
pub const INDEX_ON_HTML: &[u8] = include_bytes!("../assets/index_on.html");

/// Page served after the LED was switched off. Also used as the
/// directory listing page.
pub const INDEX_OFF_HTML: &[u8] = include_bytes!("../assets/index_off.html");

/// Stylesheet shared by both pages.
pub const STYLE_CSS: &[u8] = include_bytes!("../assets/style.css");
