// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Document retrieval.
//!
//! Trust lists and status lists are fetched through [`DocumentFetcher`] so that
//! callers (and tests) can substitute their own transport. Every fetch carries a
//! hard timeout; a timed-out request is reported as [`FetchError::Timeout`] rather
//! than being folded into a generic transport failure.

use std::error::Error as _;
use std::io;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("fetch_timeout: {url} did not respond within {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u128 },

    #[error("fetch_failed: {url} returned http_status_{status}")]
    HttpStatus { url: String, status: u16 },

    #[error("fetch_failed: {url}: {message}")]
    Transport { url: String, message: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Timeout { url, .. }
            | FetchError::HttpStatus { url, .. }
            | FetchError::Transport { url, .. } => url,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}

/// Retrieves a remote document as text.
pub trait DocumentFetcher: Send + Sync {
    /// Fetch `url`, sending `accept` as the `Accept` header and giving up after `timeout`.
    fn fetch(&self, url: &str, accept: &str, timeout: Duration) -> Result<String, FetchError>;
}

/// Blocking HTTP(S) fetcher.
#[derive(Debug, Clone, Default)]
pub struct HttpDocumentFetcher;

impl HttpDocumentFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentFetcher for HttpDocumentFetcher {
    fn fetch(&self, url: &str, accept: &str, timeout: Duration) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::Transport {
            url: url.to_string(),
            message: format!("invalid url: {e}"),
        })?;

        tracing::debug!(url = %parsed, timeout_ms = timeout.as_millis() as u64, "fetching document");

        let resp = ureq::get(parsed.as_str())
            .set("Accept", accept)
            .timeout(timeout)
            .call();

        match resp {
            Ok(r) => {
                let status = r.status();
                if !(200..300).contains(&status) {
                    return Err(FetchError::HttpStatus {
                        url: url.to_string(),
                        status,
                    });
                }
                r.into_string().map_err(|e| classify_io(url, timeout, &e))
            }
            Err(ureq::Error::Status(code, _)) => Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: code,
            }),
            Err(ureq::Error::Transport(t)) => {
                if transport_timed_out(&t) {
                    Err(FetchError::Timeout {
                        url: url.to_string(),
                        timeout_ms: timeout.as_millis(),
                    })
                } else {
                    Err(FetchError::Transport {
                        url: url.to_string(),
                        message: t.to_string(),
                    })
                }
            }
        }
    }
}

fn is_timeout_kind(kind: io::ErrorKind) -> bool {
    matches!(kind, io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

fn classify_io(url: &str, timeout: Duration, e: &io::Error) -> FetchError {
    if is_timeout_kind(e.kind()) {
        FetchError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: format!("failed to read response body: {e}"),
        }
    }
}

// ureq reports read/connect timeouts as transport errors wrapping an io::Error.
fn transport_timed_out(t: &ureq::Transport) -> bool {
    let mut source = t.source();
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if is_timeout_kind(io_err.kind()) {
                return true;
            }
        }
        source = err.source();
    }
    t.to_string().contains("timed out")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read as _, Write as _};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    #[test]
    fn invalid_url_is_a_transport_error_naming_the_url() {
        let err = HttpDocumentFetcher::new()
            .fetch("not a url", "application/json", Duration::from_millis(10))
            .unwrap_err();
        assert_eq!(err.url(), "not a url");
        assert!(!err.is_timeout());
        assert!(err.to_string().starts_with("fetch_failed: not a url"));
    }

    /// Serve one connection on a local port with `respond`, returning the base url.
    fn serve_once(respond: impl FnOnce(TcpStream) + Send + 'static) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                respond(stream);
            }
        });
        format!("http://{addr}")
    }

    fn read_request(stream: &mut TcpStream) {
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf);
    }

    #[test]
    fn silent_server_is_reported_as_timeout() {
        let base = serve_once(|stream| {
            // Hold the connection open without answering.
            thread::sleep(Duration::from_secs(3));
            drop(stream);
        });
        let url = format!("{base}/lote");

        let err = HttpDocumentFetcher::new()
            .fetch(&url, "application/json", Duration::from_millis(300))
            .unwrap_err();
        assert!(err.is_timeout(), "{err}");
        assert_eq!(err.url(), url);
        assert_eq!(err.to_string(), format!("fetch_timeout: {url} did not respond within 300ms"));
    }

    #[test]
    fn error_status_is_reported_with_its_code() {
        let base = serve_once(|mut stream| {
            read_request(&mut stream);
            let _ = stream.write_all(b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        });
        let url = format!("{base}/lote");

        let err = HttpDocumentFetcher::new()
            .fetch(&url, "application/json", Duration::from_secs(5))
            .unwrap_err();
        assert_eq!(err, FetchError::HttpStatus { url, status: 503 });
    }

    #[test]
    fn successful_response_body_is_returned() {
        let base = serve_once(|mut stream| {
            read_request(&mut stream);
            let _ = stream.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 8\r\nConnection: close\r\n\r\n{\"a\": 1}");
        });

        let body = HttpDocumentFetcher::new()
            .fetch(&format!("{base}/lote"), "application/json", Duration::from_secs(5))
            .unwrap();
        assert_eq!(body, "{\"a\": 1}");
    }
}
