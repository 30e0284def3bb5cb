//! Wildcard file handler: files, listing, built-in pages and errors.

mod common;

use common::{
    FailingFlash,
    MockSocket,
    PARTITION_OFFSET,
    PARTITION_SIZE,
    RecordingPin,
    Response,
    TestFs,
    exchange,
    flash_with_files,
    get,
    mount,
};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use led_webserver_core::{
    ContextSlot,
    FileServer,
    HttpConnection,
    HttpHandler,
    FlashFileSystem,
    ServerContext,
    SharedLed,
    http::Error,
    server::HTML_OPENING,
};
use led_webserver_page::{INDEX_OFF_HTML, STYLE_CSS};

type TestLed = SharedLed<NoopRawMutex, RecordingPin>;

fn led() -> TestLed {
    SharedLed::new(RecordingPin::default())
}

fn context(slot: &'static ContextSlot) -> &'static ServerContext {
    slot.start("/spiffs").expect("first start succeeds")
}

fn files() -> TestFs {
    mount(&[
        ("/index.html", b"<h1>stored index</h1>"),
        ("/style.css", b"body { color: red; }"),
        ("/img/logo.png", &[0x89, b'P', b'N', b'G', 0, 1, 2, 3, 4, 5]),
    ])
}

// -----------------------------------------------------------------------------
// Built-in pages
// -----------------------------------------------------------------------------

#[test]
fn missing_style_css_falls_back_to_embedded_stylesheet() {
    static SLOT: ContextSlot = ContextSlot::new();
    let fs = mount(&[]);
    let led = led();
    let server = FileServer::new(context(&SLOT), &fs, &led);

    let response = exchange(&server, &get("/style.css"));

    assert_eq!(response.status, 200);
    assert_eq!(response.header("content-type"), Some("text/css"));
    assert_eq!(response.body(), STYLE_CSS);
}

#[test]
fn missing_state_pages_redirect_to_root() {
    static SLOT: ContextSlot = ContextSlot::new();
    let fs = mount(&[]);
    let led = led();
    let server = FileServer::new(context(&SLOT), &fs, &led);

    for page in ["/index_on.html", "/index_off.html"] {
        let response = exchange(&server, &get(page));
        assert_eq!(response.status, 307, "{page}");
        assert_eq!(response.header("location"), Some("/"), "{page}");
        assert!(response.body().is_empty(), "{page}");
    }
}

#[test]
fn fallback_ignores_query_string() {
    static SLOT: ContextSlot = ContextSlot::new();
    let fs = mount(&[]);
    let led = led();
    let server = FileServer::new(context(&SLOT), &fs, &led);

    let response = exchange(&server, &get("/style.css?v=3"));

    assert_eq!(response.status, 200);
    assert_eq!(response.body(), STYLE_CSS);
}

// -----------------------------------------------------------------------------
// Files on flash
// -----------------------------------------------------------------------------

#[test]
fn stored_file_is_served_with_content_type_from_extension() {
    static SLOT: ContextSlot = ContextSlot::new();
    let fs = files();
    let led = led();
    let server = FileServer::new(context(&SLOT), &fs, &led);

    let response = exchange(&server, &get("/img/logo.png"));

    assert_eq!(response.status, 200);
    assert_eq!(response.header("content-type"), Some("image/png"));
    assert_eq!(response.header("content-length"), Some("10"));
    assert_eq!(response.body(), [0x89, b'P', b'N', b'G', 0, 1, 2, 3, 4, 5]);
}

#[test]
fn stored_file_overrides_built_in_page() {
    static SLOT: ContextSlot = ContextSlot::new();
    let fs = files();
    let led = led();
    let server = FileServer::new(context(&SLOT), &fs, &led);

    let response = exchange(&server, &get("/style.css#section"));

    assert_eq!(response.status, 200);
    assert_eq!(response.body(), b"body { color: red; }");
}

#[test]
fn large_file_is_streamed_completely() {
    static SLOT: ContextSlot = ContextSlot::new();
    let contents: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
    let fs = mount(&[("/big.bin", contents.as_slice())]);
    let led = led();
    let server = FileServer::new(context(&SLOT), &fs, &led);

    let response = exchange(&server, &get("/big.bin"));

    assert_eq!(response.status, 200);
    assert_eq!(response.header("content-type"), Some("text/plain"));
    assert_eq!(response.body(), contents);
}

#[test]
fn flash_failure_mid_body_aborts_the_response() {
    static SLOT: ContextSlot = ContextSlot::new();
    let contents = vec![b'x'; 5000];
    // File table and the first scratch block read fine, the rest does not.
    let flash = FailingFlash {
        inner: flash_with_files(&[("/big.bin", contents.as_slice())]),
        fail_from: PARTITION_OFFSET + 2048,
    };
    let fs = FlashFileSystem::<NoopRawMutex, _>::mount(flash, "/spiffs", PARTITION_OFFSET, PARTITION_SIZE)
        .expect("file table is readable");
    let led = led();
    let server = FileServer::new(context(&SLOT), &fs, &led);

    let (result, written) = embassy_futures::block_on(async {
        let mut conn = HttpConnection::from_socket(MockSocket::new(&get("/big.bin")))
            .await
            .unwrap();
        let result = server.handle_request(&mut conn).await;
        (result, conn.into_socket().written)
    });

    assert_eq!(result, Err(Error::NoData));
    let response = Response::parse(&written);
    assert_eq!(response.status, 200);
    assert_eq!(response.header("content-length"), Some("5000"));
    assert!(response.raw_body.len() < contents.len());
    assert!(response.raw_body.iter().all(|&b| b == b'x'));
}

// -----------------------------------------------------------------------------
// Directories
// -----------------------------------------------------------------------------

#[test]
fn trailing_slash_returns_listing_page() {
    static SLOT: ContextSlot = ContextSlot::new();
    let fs = files();
    let led = led();
    let server = FileServer::new(context(&SLOT), &fs, &led);

    for dir in ["/", "/img/"] {
        let response = exchange(&server, &get(dir));
        assert_eq!(response.status, 200, "{dir}");
        assert_eq!(response.header("transfer-encoding"), Some("chunked"), "{dir}");
        assert_eq!(response.body(), [HTML_OPENING, INDEX_OFF_HTML].concat(), "{dir}");
    }
}

#[test]
fn unknown_directory_is_not_found() {
    static SLOT: ContextSlot = ContextSlot::new();
    let fs = files();
    let led = led();
    let server = FileServer::new(context(&SLOT), &fs, &led);

    let response = exchange(&server, &get("/missing/"));

    assert_eq!(response.status, 404);
    assert_eq!(response.body(), b"Directory does not exist");
}

// -----------------------------------------------------------------------------
// Errors
// -----------------------------------------------------------------------------

#[test]
fn nonexistent_file_is_not_found() {
    static SLOT: ContextSlot = ContextSlot::new();
    let fs = files();
    let led = led();
    let server = FileServer::new(context(&SLOT), &fs, &led);

    let response = exchange(&server, &get("/nonexistent.file"));

    assert_eq!(response.status, 404);
    assert_eq!(response.body(), b"File does not exist");
}

#[test]
fn overlong_path_is_a_server_error() {
    static SLOT: ContextSlot = ContextSlot::new();
    let fs = files();
    let pin = RecordingPin::default();
    let led = SharedLed::<NoopRawMutex, _>::new(pin.clone());
    let server = FileServer::new(context(&SLOT), &fs, &led);
    let long = format!("/{}", "a".repeat(64));

    let response = exchange(&server, &get(&long));

    assert_eq!(response.status, 500);
    assert_eq!(response.body(), b"Filename too long");
    assert_eq!(pin.last(), None);
}

#[test]
fn long_query_does_not_count_towards_path_length() {
    static SLOT: ContextSlot = ContextSlot::new();
    let fs = mount(&[]);
    let led = led();
    let server = FileServer::new(context(&SLOT), &fs, &led);
    let uri = format!("/style.css?{}", "q".repeat(200));

    let response = exchange(&server, &get(&uri));

    assert_eq!(response.status, 200);
    assert_eq!(response.body(), STYLE_CSS);
}

#[test]
fn uri_beyond_request_limit_is_rejected() {
    static SLOT: ContextSlot = ContextSlot::new();
    let fs = mount(&[]);
    let led = led();
    let server = FileServer::new(context(&SLOT), &fs, &led);
    let uri = format!("/{}", "x".repeat(600));

    let response = exchange(&server, &get(&uri));

    assert_eq!(response.status, 414);
}

#[test]
fn overlong_uri_cut_inside_a_character_is_rejected_as_too_long() {
    static SLOT: ContextSlot = ContextSlot::new();
    let fs = mount(&[]);
    let led = led();
    let server = FileServer::new(context(&SLOT), &fs, &led);
    // The heading buffer ends between the two bytes of the `é`.
    let uri = format!("/{}\u{e9}{}", "a".repeat(1018), "b".repeat(10));

    let response = exchange(&server, &get(&uri));

    assert_eq!(response.status, 414);
}

#[test]
fn garbage_request_line_is_bad_request() {
    static SLOT: ContextSlot = ContextSlot::new();
    let fs = mount(&[]);
    let led = led();
    let server = FileServer::new(context(&SLOT), &fs, &led);

    let response = exchange(&server, "HELLO\r\n\r\n");

    assert_eq!(response.status, 400);
}

#[test]
fn heading_split_across_reads_is_reassembled() {
    static SLOT: ContextSlot = ContextSlot::new();
    let fs = mount(&[]);
    let led = led();
    let server = FileServer::new(context(&SLOT), &fs, &led);

    let written = embassy_futures::block_on(async {
        let socket = MockSocket::new(&get("/style.css")).with_max_read(3);
        let mut conn = HttpConnection::from_socket(socket).await.unwrap();
        server.handle_request(&mut conn).await.unwrap();
        conn.into_socket().written
    });
    let response = Response::parse(&written);

    assert_eq!(response.status, 200);
    assert_eq!(response.body(), STYLE_CSS);
}
