//! Shared integration-test harness: runs the `bestdori-epub` binary and
//! serves a fake mirror over plain HTTP.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Returns the path to a test fixture.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Reads a fixture to a string.
#[allow(clippy::missing_panics_doc)]
#[must_use]
pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("fixture not readable")
}

/// Runs the binary to completion with `args`, isolated from the caller's
/// environment.
#[allow(clippy::missing_panics_doc)]
#[must_use]
pub fn run_command(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_bestdori-epub"))
        .args(args)
        .env_remove("BESTDORI_EPUB_CONFIG")
        .env_remove("BESTDORI_EPUB_BASE_URL")
        .env_remove("BESTDORI_EPUB_REGION")
        .output()
        .expect("failed to run bestdori-epub")
}

/// Async variant of [`run_command`] for tests that serve a mirror from the
/// same runtime.
#[allow(clippy::missing_panics_doc)]
pub async fn run_command_async(args: &[&str]) -> Output {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_bestdori-epub"))
        .args(args)
        .env_remove("BESTDORI_EPUB_CONFIG")
        .env_remove("BESTDORI_EPUB_BASE_URL")
        .env_remove("BESTDORI_EPUB_REGION")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .kill_on_drop(true)
        .output()
        .await
        .expect("failed to run bestdori-epub")
}

/// Process exit code, panicking if it was killed by a signal.
#[allow(clippy::missing_panics_doc)]
#[must_use]
pub fn exit_code(output: &Output) -> i32 {
    output.status.code().expect("terminated by signal")
}

/// Lists every file under `dir`, relative to it.
#[allow(clippy::missing_panics_doc)]
#[must_use]
pub fn files_under(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current).expect("read_dir failed") {
            let path = entry.expect("bad dir entry").path();
            if path.is_dir() {
                pending.push(path);
            } else {
                found.push(path.strip_prefix(dir).expect("outside dir").to_path_buf());
            }
        }
    }
    found.sort();
    found
}

/// A mirror serving fixed documents by path. Unknown paths get a 404.
pub struct FakeMirror {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeMirror {
    /// Binds an ephemeral port and starts serving `documents`.
    #[allow(clippy::missing_panics_doc)]
    pub async fn start(documents: HashMap<String, String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind");
        let addr = listener.local_addr().expect("no local addr");
        let documents = Arc::new(documents);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                let documents = Arc::clone(&documents);
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    let mut head = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => head.extend_from_slice(&buf[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&head);
                    let path = head
                        .lines()
                        .next()
                        .and_then(|line| line.split_whitespace().nth(1))
                        .unwrap_or("/")
                        .to_string();
                    log.lock().unwrap().push(path.clone());

                    let response = match documents.get(&path) {
                        Some(body) => format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                            body.len()
                        ),
                        None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                            .to_string(),
                    };
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Root URL to pass as `--base-url`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Paths requested so far, in arrival order.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}
