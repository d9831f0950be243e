//! Test doubles for point sources.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::{HttpSource, PointSource};
use crate::error::LoadError;

/// Replays queued responses and counts how often it was asked.
///
/// Once the queue is down to one response that response repeats.
pub struct StubSource {
    id: String,
    responses: Mutex<VecDeque<Result<String, LoadError>>>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl StubSource {
    pub fn new(responses: impl IntoIterator<Item = Result<String, LoadError>>) -> Self {
        Self {
            id: "stub://points".to_string(),
            responses: Mutex::new(responses.into_iter().collect()),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn ok(body: &str) -> Self {
        Self::new([Ok(body.to_string())])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Handle that keeps counting after the source moves into a model.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl PointSource for StubSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn fetch(&self) -> BoxFuture<'static, Result<String, LoadError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = {
            let mut responses = self.responses.lock().unwrap();
            if responses.len() > 1 {
                responses.pop_front().unwrap()
            } else {
                responses.front().cloned().unwrap()
            }
        };
        let delay = self.delay;

        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            response
        }
        .boxed()
    }
}

/// Serve one canned HTTP response on a loopback port and return its URL.
pub async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{addr}/data.json")
}

/// HTTP source that talks to loopback directly, ignoring proxy settings.
pub fn local_source(url: &str) -> HttpSource {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpSource::with_client(client, url)
}
