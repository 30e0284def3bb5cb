//! HTTP worker pool.
//!
//! Every worker owns its socket buffers and accepts on the shared port, so
//! up to [`config::HTTP_WORKERS`] requests are answered at the same time.

use embassy_net::{Stack, tcp::TcpSocket};
use embassy_time::Duration;
use led_webserver_core::{HttpConnection, HttpHandler as _};

use crate::{config, infrastructure::types::AppFileServer};

const RX_BUFFER_SIZE: usize = 2048;
const TX_BUFFER_SIZE: usize = 4096;

#[embassy_executor::task(pool_size = config::HTTP_WORKERS)]
pub async fn http_worker_task(
    stack: Stack<'static>,
    server: &'static AppFileServer,
    worker_id: usize,
) {
    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];

    log::info!("http_server: worker {} listening on port {}", worker_id, config::HTTP.port);

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(config::HTTP.socket_timeout_secs)));

        if let Err(e) = socket.accept(config::HTTP.port).await {
            log::warn!("http_server: worker {} accept error: {:?}", worker_id, e);
            continue;
        }

        let mut conn = match HttpConnection::from_socket(socket).await {
            Ok(connection) => connection,
            Err(e) => {
                log::warn!("http_server: connection startup error: {:?}", e);
                continue;
            }
        };

        if let Err(e) = server.handle_request(&mut conn).await {
            log::warn!("http_server: connection error: {:?}", e);
        }

        let mut socket = conn.into_socket();
        socket.close();
        if let Err(e) = socket.flush().await {
            log::warn!("http_server: close error: {:?}", e);
        }
    }
}
