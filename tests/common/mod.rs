/*!
 * Common test utilities for the signplay test suite
 */

use anyhow::Result;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use signplay::media::{ClipFactory, ClipSettings, MediaBase};
use signplay::sequence::{SignSequence, UnitSpec};

/// Route log output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Lay out `static/videos/<word>.mp4` for each word, the way the service serves them
pub fn create_clip_library(dir: &Path, words: &[&str]) -> Result<()> {
    for word in words {
        create_test_file(dir, &format!("static/videos/{}.mp4", word), b"clip")?;
    }
    Ok(())
}

/// Clip factory reading from `dir` with short clips
pub fn short_clip_factory(dir: &Path, clip_ms: u64) -> ClipFactory {
    ClipFactory::new(ClipSettings::new(
        MediaBase::Directory(dir.to_path_buf()),
        Duration::from_millis(clip_ms),
        Duration::from_secs(2),
    ))
}

/// `hello` (clip), `zed` (fingerspelled, no clip), `you` (clip)
pub fn sample_sequence() -> SignSequence {
    SignSequence::new(vec![
        UnitSpec::sign("hello", Some("/static/videos/hello.mp4")),
        UnitSpec::fingerspell("zed", None),
        UnitSpec::sign("you", Some("/static/videos/you.mp4")),
    ])
}

/// Minimal HTTP server answering with canned JSON responses in order
///
/// Once the list runs out the last response is repeated.
pub struct StubServer {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
    task: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(responses: Vec<(u16, &str)>) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}", listener.local_addr()?);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let responses: Vec<(u16, String)> = responses.into_iter().map(|(code, body)| (code, body.to_string())).collect();

        let seen = Arc::clone(&requests);
        let task = tokio::spawn(async move {
            let mut served = 0usize;
            while let Ok((mut stream, _)) = listener.accept().await {
                let request = read_request(&mut stream).await;
                seen.lock().push(request);

                let Some((code, body)) = responses.get(served.min(responses.len().saturating_sub(1))) else {
                    break;
                };
                served += 1;

                let reply = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    code,
                    reason_phrase(*code),
                    body.len(),
                    body
                );
                let _ = stream.write_all(reply.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Ok(Self { url, requests, task })
    }

    /// Request line and body of every request received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let Ok(n) = stream.read(&mut chunk).await else {
            break;
        };
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buffer);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buffer.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    let text = String::from_utf8_lossy(&buffer);
    let request_line = text.lines().next().unwrap_or_default().to_string();
    let body = text.split_once("\r\n\r\n").map(|(_, body)| body).unwrap_or_default();
    format!("{}\n{}", request_line, body)
}

fn reason_phrase(code: u16) -> &'static str {
    match code {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
