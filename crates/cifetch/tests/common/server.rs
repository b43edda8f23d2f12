//! Minimal canned-response HTTP server for exercising the artifact client
//! against real sockets. Each connection is read up to the end of the request
//! headers, answered from the configured handler, and closed.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub struct StubResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl StubResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// A 200 carrying an attachment content-disposition for `filename`.
    pub fn attachment(filename: &str) -> Self {
        Self::new(200).header(
            "content-disposition",
            &format!("attachment; filename=\"{}\"", filename),
        )
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        _ => "Unknown",
    }
}

/// Loopback server answering every request through `handler(method, path)`.
pub struct StubServer {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    handle: tokio::task::JoinHandle<()>,
}

impl StubServer {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&str, &str) -> StubResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub server");
        let addr = listener.local_addr().expect("stub server addr");
        let hits = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(handler);

        let accept_hits = hits.clone();
        let handle = tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                accept_hits.fetch_add(1, Ordering::SeqCst);
                let handler = handler.clone();

                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    loop {
                        match stream.read(&mut chunk).await {
                            Ok(0) => break,
                            Ok(n) => {
                                buf.extend_from_slice(&chunk[..n]);
                                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                                    break;
                                }
                            }
                            Err(_) => return,
                        }
                    }

                    let request = String::from_utf8_lossy(&buf);
                    let mut parts = request.split_whitespace();
                    let method = parts.next().unwrap_or("").to_string();
                    let path = parts.next().unwrap_or("").to_string();

                    let response = handler(&method, &path);
                    let body_len = if method == "HEAD" {
                        0
                    } else {
                        response.body.len()
                    };

                    let mut head = format!(
                        "HTTP/1.1 {} {}\r\nconnection: close\r\n",
                        response.status,
                        reason(response.status)
                    );
                    for (name, value) in &response.headers {
                        head.push_str(&format!("{}: {}\r\n", name, value));
                    }
                    head.push_str(&format!("content-length: {}\r\n\r\n", body_len));

                    let _ = stream.write_all(head.as_bytes()).await;
                    if method != "HEAD" {
                        let _ = stream.write_all(&response.body).await;
                    }
                    let _ = stream.shutdown().await;
                });
            }
        });

        Self { addr, hits, handle }
    }

    /// Service root, e.g. `http://127.0.0.1:49152`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of connections accepted so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
