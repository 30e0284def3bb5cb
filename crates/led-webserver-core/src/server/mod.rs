//! LED toggle and static file server.

pub mod context;
pub mod dispatch;
pub mod handlers;
pub mod mime;
pub mod path;

pub use context::{ACCEPTED_BASE_PATH, BASE_PATH_MAX, ContextSlot, ServerContext, StartError};
pub use dispatch::{Reply, plan_reply, send_reply};
pub use handlers::{FALLBACK_PAGES, HTML_OPENING, StaticPage};
pub use path::{FILE_PATH_MAX, PathTooLong, ResolvedPath, resolve_path};

use embedded_io_async::{Read, Write};

use crate::{
    fs::FileSystem,
    http::{HttpConnection, HttpHandler, HttpResult, RequestHead, Route, RouteError, Router},
    led::{LedLevel, LedSwitch},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    LedOn,
    LedOff,
    Files,
}

/// Registered handlers, `/on` and `/off` ahead of the wildcard.
pub static ROUTES: [Route<Endpoint>; 3] = [
    Route::get("/on", Endpoint::LedOn),
    Route::get("/off", Endpoint::LedOff),
    Route::get("/*", Endpoint::Files),
];

/// HTTP handler serving the LED endpoints and the mounted filesystem.
pub struct FileServer<'a, FS: FileSystem, L: LedSwitch> {
    context: &'a ServerContext,
    fs: &'a FS,
    led: &'a L,
    router: Router<Endpoint>,
}

impl<'a, FS: FileSystem, L: LedSwitch> FileServer<'a, FS, L> {
    pub fn new(context: &'a ServerContext, fs: &'a FS, led: &'a L) -> Self {
        Self {
            context,
            fs,
            led,
            router: Router::new(&ROUTES),
        }
    }

    async fn serve_files<S: Read + Write>(
        &self,
        conn: &mut HttpConnection<S>,
        uri: &str,
    ) -> HttpResult {
        let reply = plan_reply(self.context, self.fs, uri);
        send_reply(conn, self.fs, reply).await
    }
}

impl<FS: FileSystem, L: LedSwitch> HttpHandler for FileServer<'_, FS, L> {
    async fn handle_request<S: Read + Write>(&self, conn: &mut HttpConnection<S>) -> HttpResult {
        let (method, uri) = match conn.head().clone() {
            RequestHead::Valid { method, uri } => (method, uri),
            RequestHead::UriTooLong => {
                log::warn!("http: uri is too long");
                return handlers::send_error(conn, &handlers::URI_TOO_LONG).await;
            }
            RequestHead::Malformed => {
                log::warn!("http: malformed request");
                return handlers::send_error(conn, &handlers::BAD_REQUEST).await;
            }
        };

        match self.router.find(method, &uri) {
            Ok(Endpoint::LedOn) => handlers::handle_led(conn, self.led, LedLevel::On).await,
            Ok(Endpoint::LedOff) => handlers::handle_led(conn, self.led, LedLevel::Off).await,
            Ok(Endpoint::Files) => self.serve_files(conn, &uri).await,
            Err(RouteError::MethodNotAllowed) => {
                log::warn!("http: {:?} not allowed for {}", method, uri.as_str());
                handlers::send_error(conn, &handlers::METHOD_NOT_ALLOWED).await
            }
            Err(RouteError::NotFound) => {
                handlers::send_error(conn, &handlers::URI_NOT_FOUND).await
            }
        }
    }
}
