use std::env;
use std::time::Duration;

use mimalloc::MiMalloc;
use structopt::StructOpt;
use video_resolver::{start_server, FetchConfig, ServerConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const RUST_LOG: &str = "RUST_LOG";

fn main() -> anyhow::Result<()> {
    if env::var_os(RUST_LOG).is_none() {
        env::set_var(RUST_LOG, "warn,video_resolver=debug,tower_http=info");
    }
    tracing_subscriber::fmt::init();
    println!("Log level: {:?}", env::var_os(RUST_LOG).unwrap_or_default());

    let opts = Opts::from_args();
    start_server(ServerConfig {
        port: opts.port,
        async_threads: opts.async_threads,
        io_threads: opts.io_threads,
        fetch: FetchConfig {
            timeout: Duration::from_secs(opts.fetch_timeout),
            connect_timeout: Duration::from_secs(opts.connect_timeout),
            max_body_bytes: opts.max_body_bytes,
            ..FetchConfig::default()
        },
    })
}

#[derive(StructOpt)]
#[structopt(
    name = "video_resolver",
    about = "Resolves a web page url into the url of the video it embeds"
)]
struct Opts {
    #[structopt(short = "p", long = "port", default_value = "3000")]
    port: u16,

    /// Total time allowed for fetching a target page, in seconds
    #[structopt(long = "fetch-timeout", default_value = "30")]
    fetch_timeout: u64,

    /// Time allowed for connecting to a target host, in seconds
    #[structopt(long = "connect-timeout", default_value = "10")]
    connect_timeout: u64,

    /// Largest target page body read, in bytes
    #[structopt(long = "max-body-bytes", default_value = "8388608")]
    max_body_bytes: usize,

    #[structopt(long = "async-threads", default_value = "4")]
    async_threads: usize,

    #[structopt(long = "io-threads", default_value = "16")]
    io_threads: usize,
}
