// Canned HTTP server for exercising GitHubClient without the network.
// One response per path; every request target (path and query) is recorded.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::config::Config;

use super::GitHubClient;

/// A fixed HTTP response.
#[derive(Debug, Clone)]
pub(crate) struct Canned {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

impl Canned {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    fn render(&self) -> String {
        let mut out = format!("HTTP/1.1 {} Canned\r\n", self.status);
        for (name, value) in &self.headers {
            out.push_str(&format!("{}: {}\r\n", name, value));
        }
        out.push_str(&format!(
            "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.body.len(),
            self.body
        ));
        out
    }
}

/// Running server and the request targets it has seen.
pub(crate) struct CannedServer {
    pub base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    /// Serve `routes` (keyed by path without query). Unknown paths answer 404.
    pub async fn start(routes: Vec<(&str, Canned)>) -> Self {
        let routes: Arc<HashMap<String, Canned>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, canned)| (path.to_string(), canned))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let seen = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let routes = routes.clone();
                let seen = seen.clone();
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }

                    let head = String::from_utf8_lossy(&buf);
                    let target = head
                        .lines()
                        .next()
                        .and_then(|line| line.split_whitespace().nth(1))
                        .unwrap_or("/")
                        .to_string();
                    let path = target.split('?').next().unwrap_or("/").to_string();
                    seen.lock().unwrap().push(target);

                    let response = routes.get(&path).cloned().unwrap_or_else(|| {
                        Canned::json(404, serde_json::json!({"message": "Not Found"}))
                    });
                    let _ = socket.write_all(response.render().as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self { base, requests }
    }

    pub fn client(&self) -> GitHubClient {
        let config = Config {
            api_base: self.base.clone(),
            ..Config::default()
        };
        GitHubClient::with_client_builder(&config, reqwest::Client::builder().no_proxy())
            .unwrap()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}
