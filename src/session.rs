use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Method;
use tracing::{debug, warn};

use crate::error::{PortalError, Result};
use crate::settings::Settings;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "pt-BR,pt;q=0.8,en-US;q=0.5,en;q=0.3";

/// Browser-like headers sent with every request of a run.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE));
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    );
    headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
    headers
}

/// One HTTP client per run. Cookies set by the login response are replayed on
/// every later request made through the same `Session`.
pub struct Session {
    client: Client,
    settings: Settings,
}

impl Session {
    pub fn new(settings: Settings) -> Result<Self> {
        let client = Client::builder()
            .default_headers(default_headers())
            .cookie_store(true)
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Session { client, settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Request builder carrying the session cookies and the default timeout.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .timeout(self.settings.request_timeout())
    }

    /// GET with bounded retry on connect errors and timeouts. HTTP statuses
    /// and malformed URLs are returned as-is and never retried.
    pub fn get(&self, url: &str, timeout: Duration) -> Result<Response> {
        let mut attempt = 0u32;
        loop {
            match self.client.get(url).timeout(timeout).send() {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < self.settings.max_retries && is_transient(&e) => {
                    attempt += 1;
                    let delay = self.settings.backoff(attempt);
                    warn!("GET {} failed ({}), retry {} in {:?}", url, e, attempt, delay);
                    thread::sleep(delay);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// GET a page and return its body, failing on anything but 2xx.
    pub fn get_text(&self, url: &str, timeout: Duration) -> Result<String> {
        let resp = self.get(url, timeout)?;
        let status = resp.status();
        debug!("GET {} -> {}", url, status.as_u16());
        if !status.is_success() {
            return Err(PortalError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.text()?)
    }
}

fn is_transient(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout()
}
