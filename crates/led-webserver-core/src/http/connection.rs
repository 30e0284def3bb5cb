use core::fmt::Write as _;

use embedded_io_async::{Read, Write};
use heapless::{String, Vec};

use super::{
    Error,
    HttpResult,
    headers::{HttpMethod, ResponseHeaders, TargetWriter as _, parse_request_line},
};

/// Maximum accepted request target length, query string included.
pub const MAX_URI_LEN: usize = 512;

/// Size of the per-connection scratch buffer used to stream bodies.
pub const SCRATCH_SIZE: usize = 1024;

const HEADER_BUFFER_SIZE: usize = 1024;
const RESPONSE_HEADER_SIZE: usize = 256;
const STREAM_CHUNK_SIZE: usize = 1024;

/// What was read from the start line of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestHead {
    Valid {
        method: HttpMethod,
        uri: String<MAX_URI_LEN>,
    },
    UriTooLong,
    Malformed,
}

/// HTTP connection context
///
/// Owns the socket for a single request and the scratch buffer used while
/// answering it, so concurrent connections never share transfer storage.
pub struct HttpConnection<S> {
    head: RequestHead,
    socket: S,
    scratch: Vec<u8, SCRATCH_SIZE>,
}

impl<S: Read + Write> HttpConnection<S> {
    /// Read the request heading from the socket.
    ///
    /// A heading that cannot be parsed is not an error here: the request
    /// is kept as [`RequestHead::Malformed`] so a 400 can still be sent.
    pub async fn from_socket(mut socket: S) -> Result<Self, Error> {
        let mut header_buf = [0u8; HEADER_BUFFER_SIZE];
        let header_end = read_heading(&mut header_buf, &mut socket).await?;
        let head = parse_head(&header_buf[..header_end]);

        Ok(Self {
            head,
            socket,
            scratch: Vec::new(),
        })
    }

    /// Get the parsed request heading.
    pub fn head(&self) -> &RequestHead {
        &self.head
    }

    /// Write the headers to the connection
    pub async fn write_headers(&mut self, headers: &ResponseHeaders) -> HttpResult {
        let mut buf = String::<RESPONSE_HEADER_SIZE>::new();
        headers.write_to(&mut buf)?;
        self.write_all(buf.as_bytes()).await
    }

    /// Write the body to the connection
    pub async fn write_body(&mut self, body: &[u8]) -> HttpResult {
        for chunk in body.chunks(STREAM_CHUNK_SIZE) {
            self.write_all(chunk).await?;
        }
        Ok(())
    }

    /// Write a single chunk of a chunked response.
    ///
    /// Empty input is skipped, use [`Self::finish_chunks`] to end the body.
    pub async fn write_chunk(&mut self, data: &[u8]) -> HttpResult {
        if data.is_empty() {
            return Ok(());
        }
        let mut size_line = String::<16>::new();
        write!(size_line, "{:X}\r\n", data.len())?;
        self.write_all(size_line.as_bytes()).await?;
        self.write_body(data).await?;
        self.write_all(b"\r\n").await
    }

    /// Write the terminating empty chunk.
    pub async fn finish_chunks(&mut self) -> HttpResult {
        self.write_all(b"0\r\n\r\n").await
    }

    /// Stream `len` bytes produced by `fill` through the scratch buffer.
    ///
    /// `fill` receives the offset of the next block and a buffer to fill,
    /// and returns how many bytes it wrote.
    pub async fn write_body_from<E>(
        &mut self,
        len: usize,
        mut fill: impl FnMut(usize, &mut [u8]) -> Result<usize, E>,
    ) -> Result<(), BodySourceError<E>> {
        let mut sent = 0;
        while sent < len {
            self.scratch.clear();
            let want = (len - sent).min(SCRATCH_SIZE);
            self.scratch
                .resize_default(want)
                .map_err(|()| BodySourceError::Http(Error::NoData))?;
            let n = fill(sent, self.scratch.as_mut_slice())
                .map_err(BodySourceError::Source)?
                .min(want);
            if n == 0 {
                return Err(BodySourceError::Http(Error::NoData));
            }
            self.socket
                .write_all(&self.scratch[..n])
                .await
                .map_err(|_| BodySourceError::Http(Error::Closed))?;
            sent += n;
        }
        self.socket
            .flush()
            .await
            .map_err(|_| BodySourceError::Http(Error::Closed))
    }

    /// Give the socket back, e.g. to close it.
    pub fn into_socket(self) -> S {
        self.socket
    }

    async fn write_all(&mut self, buf: &[u8]) -> HttpResult {
        self.socket.write_all(buf).await.map_err(|_| Error::Closed)?;
        self.socket.flush().await.map_err(|_| Error::Closed)?;
        Ok(())
    }
}

/// Failure while streaming a body from an external source.
#[derive(Debug)]
pub enum BodySourceError<E> {
    /// The source failed before the body was complete.
    Source(E),
    Http(Error),
}

fn parse_head(heading: &[u8]) -> RequestHead {
    let Some((method, target)) = parse_request_line(heading) else {
        return RequestHead::Malformed;
    };
    // Length first: a target cut by the read buffer may end mid character.
    if target.len() > MAX_URI_LEN {
        return RequestHead::UriTooLong;
    }
    let Ok(target) = core::str::from_utf8(target) else {
        return RequestHead::Malformed;
    };
    let mut uri = String::new();
    if uri.push_str(target).is_err() {
        return RequestHead::UriTooLong;
    }
    RequestHead::Valid { method, uri }
}

/// Read the start line and headers from the socket.
///
/// Returns the position of the end of the headers, or the amount read when
/// the buffer filled up before the blank line.
async fn read_heading<S: Read>(buf: &mut [u8], socket: &mut S) -> Result<usize, Error> {
    let mut header_len = 0;
    loop {
        let n = socket
            .read(&mut buf[header_len..])
            .await
            .map_err(|_| Error::Closed)?;
        if n == 0 {
            if header_len == 0 {
                return Err(Error::Closed);
            }
            return Ok(header_len);
        }
        header_len += n;
        if let Some(pos) = buf[..header_len].windows(4).position(|w| w == b"\r\n\r\n") {
            return Ok(pos + 4);
        }
        if header_len >= buf.len() {
            return Ok(header_len);
        }
    }
}
