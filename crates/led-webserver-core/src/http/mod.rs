pub mod connection;
pub mod headers;
pub mod router;

pub use connection::{BodySourceError, HttpConnection, MAX_URI_LEN, RequestHead, SCRATCH_SIZE};
pub use headers::{BodyFraming, Charset, ContentHeaders, ContentType, HttpMethod, ResponseHeaders, Status};
pub use router::{Route, RouteError, Router, strip_query, uri_match_wildcard};

use embedded_io_async::{Read, Write};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    Closed,
    NoData,
    FormatHeaders,
}

impl From<core::fmt::Error> for Error {
    fn from(_error: core::fmt::Error) -> Self {
        Error::FormatHeaders
    }
}

pub type HttpResult = Result<(), Error>;

/// Something that answers one HTTP request per connection.
#[allow(async_fn_in_trait)]
pub trait HttpHandler {
    async fn handle_request<S: Read + Write>(&self, conn: &mut HttpConnection<S>) -> HttpResult;
}
