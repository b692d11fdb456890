//! Single authenticated HTTP GET, body buffered in memory.
//!
//! Exactly one request per call: redirects are not followed and nothing is
//! retried. Runs on the current thread; call from `spawn_blocking` in async code.

use curl::easy::{Easy, List};
use std::path::PathBuf;
use std::time::Duration;

/// Why one fetch failed. Always recovered at the item boundary.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Body arrived but could not be written to disk.
    #[error("write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// HTTP status for non-2xx responses.
    pub fn status(&self) -> Option<u32> {
        match self {
            FetchError::Http(code) => Some(*code),
            _ => None,
        }
    }
}

/// Per-request limits.
#[derive(Debug, Clone, Copy)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(300),
        }
    }
}

/// GETs `url` with `Authorization: Bearer <token>` and returns the full body.
pub fn get_with_bearer(url: &str, token: &str, opts: &HttpOptions) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();

    let mut easy = Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(false)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;

    let mut list = List::new();
    list.append(&format!("Authorization: Bearer {}", token.trim()))?;
    easy.http_headers(list)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    Ok(body)
}
