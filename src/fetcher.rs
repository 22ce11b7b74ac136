use std::error::Error as StdError;
use std::time::Instant;

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{Client, Response};
use thiserror::Error;
use tracing::*;
use url::Url;

use crate::http_util::{http_client, FetchConfig};

/// Successfully loaded target page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch page: {status} {reason}")]
    Status { status: u16, reason: String },
    #[error("Failed to fetch page: {0}")]
    Transport(String),
}

impl FetchError {
    fn transport(e: reqwest::Error) -> Self {
        let mut message = e.to_string();
        let mut source = e.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        if e.is_timeout() {
            message = format!("request timed out ({message})");
        }
        FetchError::Transport(message)
    }
}

pub trait PageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<FetchedPage, FetchError>>;
}

/// Fetches pages over http, dressed up as a desktop browser.
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        Ok(HttpFetcher {
            client: http_client(config)?,
            max_body_bytes: config.max_body_bytes,
        })
    }

    async fn read_body(&self, mut response: Response) -> Result<String, FetchError> {
        let too_large =
            || FetchError::Transport(format!("body exceeds {} bytes", self.max_body_bytes));
        if response
            .content_length()
            .map_or(false, |len| len > self.max_body_bytes as u64)
        {
            return Err(too_large());
        }
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(FetchError::transport)? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<FetchedPage, FetchError>> {
        async move {
            let start = Instant::now();
            let response = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(FetchError::transport)?;
            let status = response.status();
            if !status.is_success() {
                warn!("{url} responded with {status}");
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
                });
            }
            let body = self.read_body(response).await.map_err(|e| {
                warn!("Failed reading {url}: {e}");
                e
            })?;
            debug!(
                "Fetched {url}: status={status}, {} bytes in {:?}",
                body.len(),
                start.elapsed()
            );
            Ok(FetchedPage {
                status: status.as_u16(),
                body,
            })
        }
        .boxed()
    }
}
