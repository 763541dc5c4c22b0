#[tokio::main]
async fn main() {
    // `.env` first so it can supply RUST_LOG as well as config overrides.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| jobly_server::DEFAULT_LOG_FILTER.into()),
        )
        .init();

    if let Err(e) = jobly_server::run(std::env::args().collect()).await {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
