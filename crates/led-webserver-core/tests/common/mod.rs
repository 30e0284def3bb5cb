//! Shared test doubles for the integration tests.

#![allow(dead_code)]

use std::{cell::RefCell, convert::Infallible, rc::Rc};

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_io::ErrorKind;
use embedded_storage::nor_flash::{
    ErrorType as FlashErrorType,
    NorFlashError,
    NorFlashErrorKind,
    ReadNorFlash,
};
use led_webserver_core::{
    FlashFileSystem,
    HttpConnection,
    HttpHandler,
    fs::{ENTRY_SIZE, HEADER_SIZE, MAGIC_HEADER, NAME_LEN, VERSION},
};

// -----------------------------------------------------------------------------
// Socket
// -----------------------------------------------------------------------------

/// In-memory socket: reads from a fixed request, records everything written.
pub struct MockSocket {
    request: Vec<u8>,
    read_pos: usize,
    max_read: usize,
    pub written: Vec<u8>,
}

impl MockSocket {
    pub fn new(request: &str) -> Self {
        Self {
            request: request.as_bytes().to_vec(),
            read_pos: 0,
            max_read: usize::MAX,
            written: Vec::new(),
        }
    }

    /// Deliver the request in pieces of at most `max_read` bytes.
    pub fn with_max_read(mut self, max_read: usize) -> Self {
        self.max_read = max_read;
        self
    }
}

impl embedded_io_async::ErrorType for MockSocket {
    type Error = ErrorKind;
}

impl embedded_io_async::Read for MockSocket {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let rest = &self.request[self.read_pos..];
        let n = rest.len().min(buf.len()).min(self.max_read);
        buf[..n].copy_from_slice(&rest[..n]);
        self.read_pos += n;
        Ok(n)
    }
}

impl embedded_io_async::Write for MockSocket {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }
}

// -----------------------------------------------------------------------------
// LED pin
// -----------------------------------------------------------------------------

/// Output pin recording every level written to it.
#[derive(Clone, Default)]
pub struct RecordingPin {
    pub levels: Rc<RefCell<Vec<bool>>>,
}

impl RecordingPin {
    pub fn last(&self) -> Option<bool> {
        self.levels.borrow().last().copied()
    }
}

impl PinErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push(true);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Flash
// -----------------------------------------------------------------------------

#[derive(Debug)]
pub struct MockFlashError;

impl NorFlashError for MockFlashError {
    fn kind(&self) -> NorFlashErrorKind {
        NorFlashErrorKind::Other
    }
}

/// RAM-backed flash enforcing 4 byte read alignment like the ESP32 driver.
pub struct MockFlash {
    pub data: Vec<u8>,
}

impl FlashErrorType for MockFlash {
    type Error = MockFlashError;
}

impl ReadNorFlash for MockFlash {
    const READ_SIZE: usize = 4;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let start = offset as usize;
        if start % Self::READ_SIZE != 0 || bytes.len() % Self::READ_SIZE != 0 {
            return Err(MockFlashError);
        }
        let end = start + bytes.len();
        if end > self.data.len() {
            return Err(MockFlashError);
        }
        bytes.copy_from_slice(&self.data[start..end]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }
}

/// Flash whose reads fail from `fail_from` onwards, like a worn-out sector.
pub struct FailingFlash {
    pub inner: MockFlash,
    pub fail_from: u32,
}

impl FlashErrorType for FailingFlash {
    type Error = MockFlashError;
}

impl ReadNorFlash for FailingFlash {
    const READ_SIZE: usize = MockFlash::READ_SIZE;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let end = offset as usize + bytes.len();
        if end > self.fail_from as usize {
            return Err(MockFlashError);
        }
        self.inner.read(offset, bytes)
    }

    fn capacity(&self) -> usize {
        self.inner.capacity()
    }
}

pub const PARTITION_OFFSET: u32 = 0x1000;
pub const PARTITION_SIZE: u32 = 0x4000;

/// Build a flash holding a file table with `files` at [`PARTITION_OFFSET`].
pub fn flash_with_files(files: &[(&str, &[u8])]) -> MockFlash {
    let mut data = vec![0xffu8; (PARTITION_OFFSET + PARTITION_SIZE) as usize];
    let base = PARTITION_OFFSET as usize;

    data[base..base + 4].copy_from_slice(&MAGIC_HEADER.to_le_bytes());
    data[base + 4..base + 6].copy_from_slice(&VERSION.to_le_bytes());
    data[base + 6..base + 8].copy_from_slice(&(files.len() as u16).to_le_bytes());

    // Odd start so file data is not aligned to the read size.
    let mut data_offset = HEADER_SIZE + files.len() * ENTRY_SIZE + 3;
    for (index, (name, contents)) in files.iter().enumerate() {
        let entry = base + HEADER_SIZE + index * ENTRY_SIZE;
        let mut raw_name = [0u8; NAME_LEN];
        raw_name[..name.len()].copy_from_slice(name.as_bytes());
        data[entry..entry + NAME_LEN].copy_from_slice(&raw_name);
        data[entry + NAME_LEN..entry + NAME_LEN + 4]
            .copy_from_slice(&(data_offset as u32).to_le_bytes());
        data[entry + NAME_LEN + 4..entry + ENTRY_SIZE]
            .copy_from_slice(&(contents.len() as u32).to_le_bytes());

        data[base + data_offset..base + data_offset + contents.len()].copy_from_slice(contents);
        data_offset += contents.len();
    }

    MockFlash { data }
}

pub type TestFs = FlashFileSystem<NoopRawMutex, MockFlash>;

pub fn mount(files: &[(&str, &[u8])]) -> TestFs {
    FlashFileSystem::mount(flash_with_files(files), "/spiffs", PARTITION_OFFSET, PARTITION_SIZE)
        .expect("test image mounts")
}

// -----------------------------------------------------------------------------
// HTTP exchange
// -----------------------------------------------------------------------------

/// A parsed HTTP response.
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub raw_body: Vec<u8>,
}

impl Response {
    pub fn parse(bytes: &[u8]) -> Self {
        let split = bytes
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("response has a header terminator");
        let head = std::str::from_utf8(&bytes[..split]).expect("headers are utf-8");
        let mut lines = head.split("\r\n");
        let status_line = lines.next().expect("status line");
        let status = status_line
            .split_whitespace()
            .nth(1)
            .and_then(|code| code.parse().ok())
            .expect("status code");
        let headers = lines
            .map(|line| {
                let (name, value) = line.split_once(": ").expect("header line");
                (name.to_ascii_lowercase(), value.to_string())
            })
            .collect();

        Self {
            status,
            headers,
            raw_body: bytes[split + 4..].to_vec(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Body with chunked framing removed when present.
    pub fn body(&self) -> Vec<u8> {
        if self.header("transfer-encoding") == Some("chunked") {
            dechunk(&self.raw_body)
        } else {
            self.raw_body.clone()
        }
    }

    /// Sizes of the chunks, terminating chunk included.
    pub fn chunk_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        let mut rest = self.raw_body.as_slice();
        loop {
            let (size, after) = next_chunk(rest);
            sizes.push(size);
            if size == 0 {
                return sizes;
            }
            rest = &after[size + 2..];
        }
    }
}

fn next_chunk(bytes: &[u8]) -> (usize, &[u8]) {
    let line_end = bytes
        .windows(2)
        .position(|w| w == b"\r\n")
        .expect("chunk size line");
    let size_str = std::str::from_utf8(&bytes[..line_end]).expect("chunk size is ascii");
    let size = usize::from_str_radix(size_str, 16).expect("chunk size is hex");
    (size, &bytes[line_end + 2..])
}

fn dechunk(bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    let mut rest = bytes;
    loop {
        let (size, after) = next_chunk(rest);
        if size == 0 {
            assert_eq!(after, b"\r\n", "terminating chunk ends the body");
            return body;
        }
        body.extend_from_slice(&after[..size]);
        assert_eq!(&after[size..size + 2], b"\r\n", "chunk data is CRLF terminated");
        rest = &after[size + 2..];
    }
}

/// Run one request through `handler` and parse what it wrote.
pub fn exchange(handler: &impl HttpHandler, request: &str) -> Response {
    embassy_futures::block_on(async {
        let mut conn = HttpConnection::from_socket(MockSocket::new(request))
            .await
            .expect("request heading is read");
        handler
            .handle_request(&mut conn)
            .await
            .expect("response is written");
        Response::parse(&conn.into_socket().written)
    })
}

pub fn get(path: &str) -> String {
    format!("GET {path} HTTP/1.1\r\nHost: 192.168.1.10\r\n\r\n")
}
