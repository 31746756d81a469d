//! Throw-away HTTP responder and gzip fixtures for tests

use std::{io::Write, time::Duration};

use flate2::{Compression, write::GzEncoder};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpListener,
};

pub enum Reply {
    Body(Vec<u8>),
    /// Accept the request but never answer
    Stall,
}

pub struct Route {
    pub path: &'static str,
    pub reply: Reply,
}

impl Route {
    pub fn ok(path: &'static str, body: Vec<u8>) -> Self {
        Self {
            path,
            reply: Reply::Body(body),
        }
    }

    pub fn stall(path: &'static str) -> Self {
        Self {
            path,
            reply: Reply::Stall,
        }
    }
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Serves `routes` on an ephemeral localhost port, answering 404 for unknown paths.
/// Returns the base URL, e.g. `http://127.0.0.1:41234`
pub async fn serve(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = std::sync::Arc::new(routes);

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let routes = routes.clone();

            tokio::spawn(async move {
                let mut reader = BufReader::new(&mut stream);
                let mut request_line = String::new();
                reader.read_line(&mut request_line).await.unwrap();
                let path = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .to_string();

                // Drain headers
                let mut line = String::new();
                loop {
                    line.clear();
                    let n = reader.read_line(&mut line).await.unwrap();
                    if n == 0 || line == "\r\n" {
                        break;
                    }
                }

                let (status, body) = match routes.iter().find(|r| r.path == path) {
                    Some(Route {
                        reply: Reply::Body(body),
                        ..
                    }) => ("200 OK", body.clone()),
                    Some(Route {
                        reply: Reply::Stall,
                        ..
                    }) => {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        return;
                    }
                    None => ("404 Not Found", b"not found".to_vec()),
                };

                let head = format!(
                    "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                    body.len()
                );
                stream.write_all(head.as_bytes()).await.ok();
                stream.write_all(&body).await.ok();
                stream.shutdown().await.ok();
            });
        }
    });

    format!("http://{addr}")
}
