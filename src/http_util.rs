use std::time::Duration;

use anyhow::anyhow;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use scraper::Selector;
use url::Url;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

pub const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";

pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9,es;q=0.8";

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Outbound request settings, fixed once the server has started.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub headers: HeaderMap,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            headers: browser_headers(),
            timeout: FETCH_TIMEOUT,
            connect_timeout: CONNECT_TIMEOUT,
            max_body_bytes: MAX_BODY_BYTES,
        }
    }
}

/// Headers of a desktop Chrome on Windows. Some sites refuse to serve pages without them.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(5);
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE),
    );
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers
}

pub fn http_client(config: &FetchConfig) -> anyhow::Result<Client> {
    Ok(Client::builder()
        .default_headers(config.headers.clone())
        .use_rustls_tls()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()?)
}

pub fn s(selector: &str) -> Selector {
    Selector::parse(selector).unwrap()
}

/// Parses `input` as an absolute url, which must have both a scheme and an authority.
pub fn absolute_url(input: &str) -> anyhow::Result<Url> {
    let parsed = Url::parse(input)?;
    if parsed.cannot_be_a_base() || parsed.host_str().map_or(true, str::is_empty) {
        return Err(anyhow!("Didn't find host name in the {input}"));
    }
    Ok(parsed)
}
