//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use edge_router::config::RouterConfig;
use edge_router::fetch::HttpTransport;
use edge_router::lifecycle::Shutdown;
use edge_router::HttpServer;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const MANIFEST: &str = r#"{"apps": ["demo", "admin"], "default": "demo", "config": {"v": 1}}"#;
pub const GLOBAL_CONFIG: &str = r#"{"k": "x", "v": 0}"#;
pub const DEMO_INDEX: &str = concat!(
    r#"<html><head><link rel="stylesheet" href="demo/s.css">"#,
    r#"<link rel="icon" href="//fonts.test/icon.png"></head>"#,
    r#"<body><script src="demo/config.js"></script>"#,
    r#"<script src="demo/app.js"></script></body></html>"#,
);

#[derive(Clone)]
struct Reply {
    status: u16,
    body: String,
    failures_left: u32,
    delay: Duration,
}

type Replies = Arc<Mutex<HashMap<String, Reply>>>;
type Hits = Arc<Mutex<HashMap<String, u32>>>;

/// A path-programmable upstream serving both the asset and API origins.
///
/// Assets live under `/assets/`, the API under `/api/`. Unknown paths
/// answer 404.
pub struct MockUpstream {
    addr: SocketAddr,
    replies: Replies,
    hits: Hits,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let replies: Replies = Arc::default();
        let hits: Hits = Arc::default();

        let (r, h) = (replies.clone(), hits.clone());
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((socket, _)) => {
                        tokio::spawn(handle(socket, r.clone(), h.clone()));
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            addr,
            replies,
            hits,
        }
    }

    /// Upstream serving the standard `demo` catalog.
    pub async fn with_demo_catalog() -> Self {
        let upstream = Self::start().await;
        upstream.respond("/assets/manifest.json", MANIFEST);
        upstream.respond("/api/config.json", GLOBAL_CONFIG);
        upstream.respond("/assets/demo/index.html", DEMO_INDEX);
        upstream
    }

    pub fn assets_url(&self) -> String {
        format!("http://{}/assets/", self.addr)
    }

    pub fn api_url(&self) -> String {
        format!("http://{}/api/", self.addr)
    }

    pub fn respond(&self, path: &str, body: &str) {
        self.script(path, 200, body, 0, Duration::ZERO);
    }

    pub fn respond_status(&self, path: &str, status: u16) {
        self.script(path, status, "", 0, Duration::ZERO);
    }

    /// Answer 503 `times` times, then 200 with `body`.
    pub fn fail_times(&self, path: &str, times: u32, body: &str) {
        self.script(path, 200, body, times, Duration::ZERO);
    }

    pub fn respond_slowly(&self, path: &str, delay: Duration, body: &str) {
        self.script(path, 200, body, 0, delay);
    }

    pub fn hits(&self, path: &str) -> u32 {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    fn script(&self, path: &str, status: u16, body: &str, failures: u32, delay: Duration) {
        self.replies.lock().unwrap().insert(
            path.to_string(),
            Reply {
                status,
                body: body.to_string(),
                failures_left: failures,
                delay,
            },
        );
    }

    /// Router configuration pointing at this upstream, with fast retries.
    pub fn config(&self) -> RouterConfig {
        let mut config = RouterConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.upstream.assets_url = self.assets_url();
        config.upstream.api_url = self.api_url();
        config.fetch.base_delay_ms = 1;
        config.fetch.max_delay_ms = 5;
        config
    }
}

async fn handle(mut socket: TcpStream, replies: Replies, hits: Hits) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let request = String::from_utf8_lossy(&buf);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    *hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

    let reply = {
        let mut replies = replies.lock().unwrap();
        match replies.get_mut(&path) {
            Some(reply) if reply.failures_left > 0 => {
                reply.failures_left -= 1;
                Reply {
                    status: 503,
                    body: "unavailable".into(),
                    failures_left: 0,
                    delay: reply.delay,
                }
            }
            Some(reply) => reply.clone(),
            None => Reply {
                status: 404,
                body: "not found".into(),
                failures_left: 0,
                delay: Duration::ZERO,
            },
        }
    };

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    let status_text = match reply.status {
        200 => "200 OK",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "500 Internal Server Error",
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        reply.body.len(),
        reply.body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// A running edge router and the handles needed to drive it.
pub struct RunningRouter {
    pub base_url: String,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<RouterConfig>,
    pub task: JoinHandle<Result<(), std::io::Error>>,
}

pub async fn start_router(config: RouterConfig) -> RunningRouter {
    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let server = HttpServer::with_transport(config, Arc::new(HttpTransport::with_client(client)));

    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(server.run(listener, updates_rx, shutdown.subscribe()));

    RunningRouter {
        base_url: format!("http://{addr}"),
        shutdown,
        config_updates,
        task,
    }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
