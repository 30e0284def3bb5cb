//! Decide what the wildcard file handler answers.

use embedded_io_async::{Read, Write};
use heapless::String;

use super::{
    context::ServerContext,
    handlers::{
        DIR_NOT_FOUND,
        ErrorReply,
        FILE_NOT_FOUND,
        FILENAME_TOO_LONG,
        StaticPage,
        fallback_page,
        send_error,
        send_html_page,
        send_static_page,
    },
    mime::content_type_for,
    path::{FILE_PATH_MAX, resolve_path},
};
use crate::{
    fs::{FileStat, FileSystem},
    http::{
        BodySourceError,
        ContentHeaders,
        ContentType,
        Error,
        HttpConnection,
        HttpResult,
        ResponseHeaders,
    },
};

/// The single response chosen for a request.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    /// Directory listing page.
    Listing,
    /// Existing file on the filesystem.
    File {
        stat: FileStat,
        content_type: ContentType,
    },
    /// Built-in page for a missing file.
    Fallback(&'static StaticPage),
    Error(&'static ErrorReply),
}

/// Pick the reply for `uri`, checked in order: directory, file on the
/// filesystem, built-in page, not found.
pub fn plan_reply<FS: FileSystem>(context: &ServerContext, fs: &FS, uri: &str) -> Reply {
    let mut filepath = String::<FILE_PATH_MAX>::new();
    let Ok(resolved) = resolve_path(&mut filepath, context.base_path(), uri) else {
        log::error!("file_server: filename is too long");
        return Reply::Error(&FILENAME_TOO_LONG);
    };

    if resolved.relative().ends_with('/') {
        return match fs.open_dir(resolved.full()) {
            Ok(()) => Reply::Listing,
            Err(_) => {
                log::error!("file_server: failed to stat dir: {}", resolved.full());
                Reply::Error(&DIR_NOT_FOUND)
            }
        };
    }

    match fs.stat(resolved.full()) {
        Ok(stat) => Reply::File {
            stat,
            content_type: content_type_for(resolved.relative()),
        },
        Err(_) => match fallback_page(resolved.relative()) {
            Some(page) => Reply::Fallback(page),
            None => {
                log::error!("file_server: failed to stat file: {}", resolved.full());
                Reply::Error(&FILE_NOT_FOUND)
            }
        },
    }
}

/// Write `reply` as one complete response.
pub async fn send_reply<S: Read + Write, FS: FileSystem>(
    conn: &mut HttpConnection<S>,
    fs: &FS,
    reply: Reply,
) -> HttpResult {
    match reply {
        // Entries are not enumerated, the listing is the upload form page.
        Reply::Listing => send_html_page(conn, led_webserver_page::INDEX_OFF_HTML).await,
        Reply::File { stat, content_type } => send_file(conn, fs, &stat, content_type).await,
        Reply::Fallback(page) => send_static_page(conn, page).await,
        Reply::Error(error) => send_error(conn, error).await,
    }
}

async fn send_file<S: Read + Write, FS: FileSystem>(
    conn: &mut HttpConnection<S>,
    fs: &FS,
    stat: &FileStat,
    content_type: ContentType,
) -> HttpResult {
    let size = stat.size as usize;
    let content = ContentHeaders::new(content_type).with_length(size);
    conn.write_headers(&ResponseHeaders::ok().with_content(content))
        .await?;

    #[allow(clippy::cast_possible_truncation)]
    let result = conn
        .write_body_from(size, |offset, buf| fs.read(stat, offset as u32, buf))
        .await;
    match result {
        Ok(()) => Ok(()),
        Err(BodySourceError::Source(e)) => {
            log::error!("file_server: read failed mid-body: {:?}", e);
            Err(Error::NoData)
        }
        Err(BodySourceError::Http(e)) => Err(e),
    }
}
