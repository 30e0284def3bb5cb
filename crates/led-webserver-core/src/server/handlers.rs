//! Fixed responses: LED pages, built-in fallback pages and errors.

use embedded_io_async::{Read, Write};
use led_webserver_page::{INDEX_OFF_HTML, INDEX_ON_HTML, STYLE_CSS};

use crate::{
    http::{
        Charset,
        ContentHeaders,
        ContentType,
        HttpConnection,
        HttpResult,
        ResponseHeaders,
        Status,
    },
    led::{LedLevel, LedSwitch},
};

/// First chunk of every generated HTML page.
pub const HTML_OPENING: &[u8] = b"<!DOCTYPE html><html><body>";

/// A response built into the firmware.
#[derive(Debug, PartialEq, Eq)]
pub enum StaticPage {
    /// `307 Temporary Redirect` to the location.
    Redirect(&'static str),
    Content {
        content_type: ContentType,
        body: &'static [u8],
    },
}

/// Page served for a file name missing from the filesystem.
#[derive(Debug)]
pub struct FallbackPage {
    pub path: &'static str,
    pub page: StaticPage,
}

/// Built-in pages, consulted only when the file is not on flash.
pub static FALLBACK_PAGES: [FallbackPage; 3] = [
    FallbackPage {
        path: "/index_on.html",
        page: StaticPage::Redirect("/"),
    },
    FallbackPage {
        path: "/index_off.html",
        page: StaticPage::Redirect("/"),
    },
    FallbackPage {
        path: "/style.css",
        page: StaticPage::Content {
            content_type: ContentType::TextCss,
            body: STYLE_CSS,
        },
    },
];

/// Find the built-in page for a path relative to the base path.
pub fn fallback_page(path: &str) -> Option<&'static StaticPage> {
    FALLBACK_PAGES
        .iter()
        .find(|fallback| fallback.path == path)
        .map(|fallback| &fallback.page)
}

/// Error status with a short diagnostic body.
#[derive(Debug, PartialEq, Eq)]
pub struct ErrorReply {
    pub status: Status,
    pub message: &'static str,
}

pub const BAD_REQUEST: ErrorReply = ErrorReply {
    status: Status::BadRequest,
    message: "Bad request syntax",
};
pub const URI_NOT_FOUND: ErrorReply = ErrorReply {
    status: Status::NotFound,
    message: "This URI does not exist",
};
pub const FILE_NOT_FOUND: ErrorReply = ErrorReply {
    status: Status::NotFound,
    message: "File does not exist",
};
pub const DIR_NOT_FOUND: ErrorReply = ErrorReply {
    status: Status::NotFound,
    message: "Directory does not exist",
};
pub const METHOD_NOT_ALLOWED: ErrorReply = ErrorReply {
    status: Status::MethodNotAllowed,
    message: "Request method for this URI is not handled by server",
};
pub const URI_TOO_LONG: ErrorReply = ErrorReply {
    status: Status::UriTooLong,
    message: "URI is too long",
};
pub const FILENAME_TOO_LONG: ErrorReply = ErrorReply {
    status: Status::InternalServerError,
    message: "Filename too long",
};

/// Body of the page shown after switching to `level`.
pub const fn led_page(level: LedLevel) -> &'static [u8] {
    match level {
        LedLevel::On => INDEX_ON_HTML,
        LedLevel::Off => INDEX_OFF_HTML,
    }
}

/// Switch the LED, then answer with the matching page.
pub async fn handle_led<S: Read + Write>(
    conn: &mut HttpConnection<S>,
    led: &impl LedSwitch,
    level: LedLevel,
) -> HttpResult {
    led.set_level(level);
    log::info!("led: {}", level.as_str());
    send_html_page(conn, led_page(level)).await
}

/// Send an HTML body fragment as a chunked page.
pub async fn send_html_page<S: Read + Write>(
    conn: &mut HttpConnection<S>,
    body: &[u8],
) -> HttpResult {
    let content = ContentHeaders::new(ContentType::TextHtml)
        .with_charset(Charset::Utf8)
        .chunked();
    conn.write_headers(&ResponseHeaders::ok().with_content(content))
        .await?;
    conn.write_chunk(HTML_OPENING).await?;
    conn.write_chunk(body).await?;
    conn.finish_chunks().await
}

pub async fn send_static_page<S: Read + Write>(
    conn: &mut HttpConnection<S>,
    page: &StaticPage,
) -> HttpResult {
    match page {
        StaticPage::Redirect(location) => {
            conn.write_headers(&ResponseHeaders::redirect(*location))
                .await
        }
        StaticPage::Content { content_type, body } => {
            let content = ContentHeaders::new(*content_type).with_length(body.len());
            conn.write_headers(&ResponseHeaders::ok().with_content(content))
                .await?;
            conn.write_body(body).await
        }
    }
}

pub async fn send_error<S: Read + Write>(
    conn: &mut HttpConnection<S>,
    reply: &ErrorReply,
) -> HttpResult {
    let content = ContentHeaders::new(ContentType::TextHtml).with_length(reply.message.len());
    let headers = ResponseHeaders::new(reply.status).with_content(content);
    conn.write_headers(&headers).await?;
    conn.write_body(reply.message.as_bytes()).await
}
