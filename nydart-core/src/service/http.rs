//! Shared HTTP plumbing for the service clients.

use reqwest::{Client, Response, StatusCode};
use tracing::warn;

use crate::error::{AdvisorError, Result};

/// Build a client. No overall timeout is set here; upload deadlines are
/// enforced by the submitter.
pub(crate) fn build_client(service: &str) -> Result<Client> {
    Client::builder()
        .user_agent(concat!("nydart/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            warn!(service, error = %e, "Failed to create HTTP client");
            AdvisorError::Config(format!("Failed to create HTTP client for {service}: {e}"))
        })
}

/// Turn a 401 into [`AdvisorError::Unauthorized`]; leave other statuses to
/// the caller.
pub(crate) fn reject_unauthorized(response: &Response, service: &str) -> Result<()> {
    if response.status() == StatusCode::UNAUTHORIZED {
        warn!(service, "Credential rejected");
        return Err(AdvisorError::Unauthorized {
            service: service.to_string(),
        });
    }
    Ok(())
}

/// Response body as text, empty when unreadable.
pub(crate) async fn body_text(response: Response) -> String {
    response.text().await.unwrap_or_default()
}

/// One-shot loopback HTTP server for exercising the clients' wire format.
#[cfg(test)]
pub(crate) mod stub {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Answer the next request with `status` and `body`.
    ///
    /// Returns the base URL to point a client at and a handle yielding the
    /// raw request as received.
    pub(crate) async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (base_url, handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if is_complete(&buf) {
                break;
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn is_complete(buf: &[u8]) -> bool {
        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
        let body = &buf[end + 4..];

        if head.contains("transfer-encoding: chunked") {
            return body.ends_with(b"0\r\n\r\n");
        }
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        body.len() >= length
    }
}
