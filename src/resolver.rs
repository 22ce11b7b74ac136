use std::sync::Arc;
use std::time::Instant;

use tokio::task;
use tracing::*;

use crate::error::ResolveError;
use crate::extractor::{Extraction, StrategyChain};
use crate::fetcher::PageFetcher;
use crate::http_util::absolute_url;

/// Turns a page url into the url of the video embedded in it.
#[derive(Clone)]
pub struct Resolver {
    fetcher: Arc<dyn PageFetcher>,
    chain: Arc<StrategyChain>,
}

impl Resolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, chain: StrategyChain) -> Self {
        Resolver {
            fetcher,
            chain: Arc::new(chain),
        }
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, raw_url: &str) -> Result<String, ResolveError> {
        let start = Instant::now();
        let url = absolute_url(raw_url).map_err(|e| {
            info!("Rejecting malformed url: {e}");
            ResolveError::MalformedUrl
        })?;

        let page = self.fetcher.fetch(&url).await?;
        debug!("Loaded {url} with status {}", page.status);

        let chain = self.chain.clone();
        let extraction = task::spawn_blocking(move || chain.extract_from_html(&page.body))
            .await
            .map_err(|e| ResolveError::Unexpected(format!("Failed to extract video: {e}")))?;

        match extraction {
            Some(Extraction {
                video_url,
                strategy,
            }) => {
                info!(
                    "Found video via '{strategy}' in {:?}: {video_url}",
                    start.elapsed()
                );
                Ok(video_url)
            }
            None => {
                info!("No video on {url}, took {:?}", start.elapsed());
                Err(ResolveError::NoVideoFound)
            }
        }
    }
}
