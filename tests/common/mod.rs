//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{Value, json};
use tempfile::TempDir;

pub const HISTORY_FILE: &str = "github-search-history.json";

/// Builder for an isolated data directory
pub struct DataDirBuilder {
    temp_dir: TempDir,
}

impl DataDirBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a raw history file
    pub fn with_history(self, content: &str) -> Self {
        fs::write(self.temp_dir.path().join(HISTORY_FILE), content)
            .expect("Failed to write history file");
        self
    }

    /// Write history entries programmatically
    pub fn with_history_entries(self, entries: &[HistoryEntryBuilder]) -> Self {
        let content = Value::Array(entries.iter().map(|e| e.to_json()).collect());
        self.with_history(&content.to_string())
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for DataDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for persisted history entries
pub struct HistoryEntryBuilder {
    id: String,
    query: String,
    timestamp: i64,
    result_count: usize,
    mode: String,
}

impl HistoryEntryBuilder {
    pub fn new(query: &str) -> Self {
        Self {
            id: format!("id-{}", query.replace(' ', "-")),
            query: query.to_string(),
            timestamp: 1_700_000_000_000,
            result_count: 20,
            mode: "quick".to_string(),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn timestamp(mut self, millis: i64) -> Self {
        self.timestamp = millis;
        self
    }

    pub fn result_count(mut self, count: usize) -> Self {
        self.result_count = count;
        self
    }

    pub fn mode(mut self, mode: &str) -> Self {
        self.mode = mode.to_string();
        self
    }

    /// Epoch-millisecond timestamps, the format browser storage produced
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "query": self.query,
            "timestamp": self.timestamp,
            "resultCount": self.result_count,
            "searchMode": self.mode,
        })
    }
}

/// One search API item
pub fn repository_json(id: u64, full_name: &str, language: Option<&str>, stars: u64) -> Value {
    let name = full_name.rsplit('/').next().unwrap_or(full_name);
    json!({
        "id": id,
        "name": name,
        "full_name": full_name,
        "description": format!("{} description", name),
        "html_url": format!("https://github.com/{}", full_name),
        "clone_url": format!("https://github.com/{}.git", full_name),
        "owner": { "login": full_name.split('/').next().unwrap_or_default(), "avatar_url": "" },
        "stargazers_count": stars,
        "forks_count": stars / 10,
        "language": language,
        "default_branch": "main",
        "topics": [],
    })
}

/// Search API response body
pub fn search_body(items: &[Value]) -> String {
    json!({ "total_count": items.len(), "incomplete_results": false, "items": items }).to_string()
}

/// Minimal HTTP server answering every request with the same response.
///
/// Request targets (path + query) are recorded in arrival order.
pub struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn start(status: u16, body: impl Into<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let body = body.into();

        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                handle_connection(stream, status, &body, &recorded);
            }
        });

        Self { base_url, requests }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::start(200, body)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn handle_connection(mut stream: TcpStream, status: u16, body: &str, requests: &Mutex<Vec<String>>) {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buffer.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buffer.extend_from_slice(&chunk[..n]),
        }
    }

    let request = String::from_utf8_lossy(&buffer);
    if let Some(target) = request.lines().next().and_then(|line| line.split(' ').nth(1)) {
        requests.lock().unwrap().push(target.to_string());
    }

    let reason = if status == 200 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// The binary with an isolated data dir and no proxy in the way
pub fn explorer(data_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_github-repo-explorer"));
    cmd.env("GH_EXPLORER_DATA_DIR", data_dir)
        .env("NO_PROXY", "127.0.0.1,localhost")
        .env("no_proxy", "127.0.0.1,localhost")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("HTTPS_PROXY")
        .env_remove("https_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .env_remove("RUST_LOG");
    cmd
}
