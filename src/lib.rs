use std::sync::Arc;

use anyhow::Context;
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::*;

use crate::extractor::StrategyChain;
use crate::fetcher::HttpFetcher;
use crate::resolver::Resolver;

pub use crate::http_util::FetchConfig;

mod document;
mod error;
mod extractor;
mod fetcher;
mod get_video;
mod http_util;
mod models;
mod resolver;

pub struct ServerConfig {
    pub port: u16,
    pub async_threads: usize,
    pub io_threads: usize,
    pub fetch: FetchConfig,
}

pub fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.async_threads)
        .max_blocking_threads(config.io_threads)
        .enable_all()
        .build()?;
    info!(
        "Created tokio runtime with {} async-workers & {} blocking-workers",
        config.async_threads, config.io_threads,
    );
    rt.block_on(_start_server(config))
}

async fn _start_server(config: ServerConfig) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new(&config.fetch).context("Building http client failed")?;
    info!(
        "Fetching pages with timeout {:?} (connect {:?})",
        config.fetch.timeout, config.fetch.connect_timeout
    );
    let resolver = Resolver::new(Arc::new(fetcher), StrategyChain::default());

    let address = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listing for http requests at '{address}'");
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Binding to {address} failed"))?;

    axum::serve(listener, app(resolver))
        .await
        .context("Starting video resolver server failed")
}

fn app(resolver: Resolver) -> Router {
    Router::new()
        .route("/api/getVideo", any(get_video::get_video))
        .layer(TraceLayer::new_for_http())
        .with_state(resolver)
}
