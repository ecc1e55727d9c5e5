use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::Track;
use crate::input::{json::parse_json, TrackError, TrackResult, TrackSource};

/// A flight-data service answering one GET with a JSON array of samples.
///
/// No pagination, no streaming, no authentication. An empty array is a valid
/// (empty) track.
pub struct HttpSource {
    url: String,
    file_name: Option<String>,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: &str, timeout: Duration) -> TrackResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.to_string(),
            file_name: None,
            client,
        })
    }

    /// Only return samples from one uploaded log
    pub fn with_file_name(mut self, file_name: &str) -> Self {
        self.file_name = Some(file_name.to_string());
        self
    }
}

#[async_trait]
impl TrackSource for HttpSource {
    fn describe(&self) -> String {
        match &self.file_name {
            Some(name) => format!("{} ({})", self.url, name),
            None => self.url.clone(),
        }
    }

    async fn fetch(&self) -> TrackResult<Track> {
        let mut request = self.client.get(&self.url);
        if let Some(name) = &self.file_name {
            request = request.query(&[("file_name", name)]);
        }

        debug!("GET {}", self.describe());
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackError::Status {
                url: self.url.clone(),
                status,
            });
        }

        let body = response.bytes().await?;
        let track = parse_json(&body)?;
        info!("Fetched {} samples from {}", track.len(), self.url);
        Ok(track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned response; the task yields the request head it received
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/flight-data/", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&head).into_owned()
        });

        (url, handle)
    }

    #[tokio::test]
    async fn test_fetch_track() {
        let body = r#"[{"id":1,"file_name":"a.tlog","lat":50.3168118,"lon":-4.2199067,"alt":100.62,"heading":173.3}]"#;
        let (url, server) = serve_once("200 OK", body).await;

        let source = HttpSource::new(&url, Duration::from_secs(5)).unwrap();
        let track = source.fetch().await.unwrap();
        assert_eq!(track.len(), 1);
        assert_eq!(track.at(0).unwrap().alt, 100.62);

        let head = server.await.unwrap();
        assert!(head.starts_with("GET /flight-data/ HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_file_name_query() {
        let (url, server) = serve_once("200 OK", "[]").await;

        let source = HttpSource::new(&url, Duration::from_secs(5))
            .unwrap()
            .with_file_name("run 1.tlog");
        let track = source.fetch().await.unwrap();
        assert!(track.is_empty());

        let head = server.await.unwrap();
        assert!(head.starts_with("GET /flight-data/?file_name=run+1.tlog HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_error_status() {
        let (url, server) = serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#).await;

        let source = HttpSource::new(&url, Duration::from_secs(5)).unwrap();
        match source.fetch().await {
            Err(TrackError::Status { status, .. }) => assert_eq!(status.as_u16(), 500),
            other => panic!("unexpected result: {:?}", other.map(|t| t.len())),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpSource::new(&format!("http://{}/", addr), Duration::from_secs(5)).unwrap();
        assert!(matches!(source.fetch().await, Err(TrackError::Http(_))));
    }
}
