//! Response head serialization and request line parsing.

use core::fmt::{self, Write};

/// Response status sent by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    TemporaryRedirect,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    UriTooLong,
    InternalServerError,
}

impl Status {
    pub const fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::TemporaryRedirect => 307,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::MethodNotAllowed => 405,
            Status::UriTooLong => 414,
            Status::InternalServerError => 500,
        }
    }

    pub const fn reason(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::TemporaryRedirect => "Temporary Redirect",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::MethodNotAllowed => "Method Not Allowed",
            Status::UriTooLong => "URI Too Long",
            Status::InternalServerError => "Internal Server Error",
        }
    }
}

/// Media type of a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    TextHtml,
    TextCss,
    TextPlain,
    Javascript,
    Json,
    Png,
    Jpeg,
    Icon,
    Svg,
    Pdf,
}

impl ContentType {
    pub const fn mime(self) -> &'static str {
        match self {
            ContentType::TextHtml => "text/html",
            ContentType::TextCss => "text/css",
            ContentType::TextPlain => "text/plain",
            ContentType::Javascript => "application/javascript",
            ContentType::Json => "application/json",
            ContentType::Png => "image/png",
            ContentType::Jpeg => "image/jpeg",
            ContentType::Icon => "image/x-icon",
            ContentType::Svg => "image/svg+xml",
            ContentType::Pdf => "application/pdf",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
}

impl Charset {
    const fn label(self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
        }
    }
}

/// How the body length is communicated to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFraming {
    /// `Content-Length: n`
    Length(usize),
    /// `Transfer-Encoding: chunked`
    Chunked,
}

/// Serialization of a header block into a formatter sink.
pub(super) trait TargetWriter {
    fn write_to(&self, writer: &mut impl Write) -> fmt::Result;
}

/// Headers describing the body.
#[derive(Debug, Clone, Copy)]
pub struct ContentHeaders {
    content_type: ContentType,
    charset: Option<Charset>,
    framing: Option<BodyFraming>,
}

impl ContentHeaders {
    pub const fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            charset: None,
            framing: None,
        }
    }

    #[must_use]
    pub const fn with_length(mut self, length: usize) -> Self {
        self.framing = Some(BodyFraming::Length(length));
        self
    }

    /// Body follows as chunks, see [`super::HttpConnection::write_chunk`].
    #[must_use]
    pub const fn chunked(mut self) -> Self {
        self.framing = Some(BodyFraming::Chunked);
        self
    }

    #[must_use]
    pub const fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = Some(charset);
        self
    }
}

impl TargetWriter for ContentHeaders {
    fn write_to(&self, writer: &mut impl Write) -> fmt::Result {
        writer.write_str("Content-Type: ")?;
        writer.write_str(self.content_type.mime())?;
        if let Some(charset) = self.charset {
            write!(writer, "; charset={}", charset.label())?;
        }
        writer.write_str("\r\n")?;
        match self.framing {
            Some(BodyFraming::Length(length)) => write!(writer, "Content-Length: {}\r\n", length),
            Some(BodyFraming::Chunked) => writer.write_str("Transfer-Encoding: chunked\r\n"),
            None => Ok(()),
        }
    }
}

/// Status line and headers of a response.
///
/// Every response closes the connection afterwards. Without content
/// headers an empty body is announced.
#[derive(Debug, Clone, Copy)]
pub struct ResponseHeaders {
    status: Status,
    location: Option<&'static str>,
    content: Option<ContentHeaders>,
}

impl ResponseHeaders {
    pub const fn new(status: Status) -> Self {
        Self {
            status,
            location: None,
            content: None,
        }
    }

    pub const fn ok() -> Self {
        Self::new(Status::Ok)
    }

    /// `307` to `location` with an empty body.
    pub const fn redirect(location: &'static str) -> Self {
        let mut headers = Self::new(Status::TemporaryRedirect);
        headers.location = Some(location);
        headers
    }

    #[must_use]
    pub const fn with_content(mut self, content: ContentHeaders) -> Self {
        self.content = Some(content);
        self
    }
}

impl TargetWriter for ResponseHeaders {
    fn write_to(&self, writer: &mut impl Write) -> fmt::Result {
        write!(
            writer,
            "HTTP/1.1 {} {}\r\n",
            self.status.code(),
            self.status.reason()
        )?;
        if let Some(location) = self.location {
            write!(writer, "Location: {}\r\n", location)?;
        }
        match &self.content {
            Some(content) => content.write_to(writer)?,
            None => writer.write_str("Content-Length: 0\r\n")?,
        }
        writer.write_str("Connection: close\r\n\r\n")
    }
}

/// Request method token.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Trace,
    Connect,
}

impl HttpMethod {
    const TOKENS: [(&'static str, HttpMethod); 9] = [
        ("GET", HttpMethod::Get),
        ("HEAD", HttpMethod::Head),
        ("POST", HttpMethod::Post),
        ("PUT", HttpMethod::Put),
        ("PATCH", HttpMethod::Patch),
        ("DELETE", HttpMethod::Delete),
        ("OPTIONS", HttpMethod::Options),
        ("TRACE", HttpMethod::Trace),
        ("CONNECT", HttpMethod::Connect),
    ];

    /// Method names are case sensitive.
    pub(super) fn from_token(token: &str) -> Option<Self> {
        Self::TOKENS
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, method)| *method)
    }
}

/// Split `METHOD target VERSION` off the start of a request heading.
///
/// The target is left as raw bytes, it may be cut anywhere when the heading
/// did not fit the read buffer.
pub(super) fn parse_request_line(heading: &[u8]) -> Option<(HttpMethod, &[u8])> {
    let request_line = heading.split(|&b| b == b'\n').next()?;
    let mut parts = request_line
        .split(u8::is_ascii_whitespace)
        .filter(|part| !part.is_empty());
    let token = core::str::from_utf8(parts.next()?).ok()?;
    let method = HttpMethod::from_token(token)?;
    let target = parts.next()?;
    Some((method, target))
}
