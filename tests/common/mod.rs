//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use cors_relay::{HttpServer, RelayConfig, Shutdown};

/// One request as observed by the mock upstream.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
}

impl SeenRequest {
    /// Look up a header by name (case-insensitive).
    #[allow(dead_code)]
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Start a mock upstream that answers every request with a fixed status line
/// and body, recording the request line and headers it received.
#[allow(dead_code)]
pub async fn start_mock_upstream(
    addr: SocketAddr,
    status_line: &'static str,
    body: &'static str,
) -> Arc<Mutex<Vec<SeenRequest>>> {
    let listener = TcpListener::bind(addr).await.unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = seen.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        // Read up to the end of the header block.
                        let mut buf = Vec::new();
                        let mut chunk = [0u8; 1024];
                        loop {
                            match socket.read(&mut chunk).await {
                                Ok(0) | Err(_) => break,
                                Ok(n) => {
                                    buf.extend_from_slice(&chunk[..n]);
                                    if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                                        break;
                                    }
                                }
                            }
                        }

                        // Drain any body so the peer is not mid-write when we
                        // close the socket. The body content itself is
                        // irrelevant to these tests.
                        let header_end = buf
                            .windows(4)
                            .position(|w| w == b"\r\n\r\n")
                            .map(|p| p + 4);
                        if let Some(start) = header_end {
                            let head = String::from_utf8_lossy(&buf[..start]).to_lowercase();
                            if head.contains("transfer-encoding: chunked") {
                                while !buf.ends_with(b"0\r\n\r\n") {
                                    match socket.read(&mut chunk).await {
                                        Ok(0) | Err(_) => break,
                                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                                    }
                                }
                            } else if let Some(length) = head
                                .lines()
                                .find_map(|line| line.strip_prefix("content-length:"))
                                .and_then(|value| value.trim().parse::<usize>().ok())
                            {
                                while buf.len() < start + length {
                                    match socket.read(&mut chunk).await {
                                        Ok(0) | Err(_) => break,
                                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                                    }
                                }
                            }
                        }

                        let text = String::from_utf8_lossy(&buf);
                        let mut lines = text.lines();
                        let request_line = lines.next().unwrap_or_default().to_string();
                        let headers = lines
                            .take_while(|line| !line.is_empty())
                            .filter_map(|line| line.split_once(':'))
                            .map(|(name, value)| {
                                (name.to_ascii_lowercase(), value.trim().to_string())
                            })
                            .collect();
                        recorded.lock().unwrap().push(SeenRequest {
                            request_line,
                            headers,
                        });

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_line,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    seen
}

/// Start the relay on `addr` with the given origin allow-list.
///
/// The returned `Shutdown` must be kept alive for the duration of the test;
/// dropping it stops the server.
pub async fn start_relay(addr: SocketAddr, allowed_origins: Vec<String>) -> Shutdown {
    let mut config = RelayConfig::default();
    config.listener.bind_address = addr.to_string();
    config.cors.allowed_origins = allowed_origins;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown
}

/// Non-pooled client so every request opens a fresh connection.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
