// sidedish command-line entry point.
// Fetches each argument through the caching client and reports where the bytes came from.

use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use sidedish::{
    BoundedStore, CacheStore, ClientConfig, FetchClient, HttpTransport, MemoryStore,
    RequestDescriptor, Result,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let targets: Vec<String> = std::env::args().skip(1).collect();
    if targets.is_empty() {
        eprintln!("usage: sidedish <path-or-url>...");
        return ExitCode::from(2);
    }

    match run(&targets).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fetch failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(targets: &[String]) -> Result<()> {
    let config = ClientConfig::from_env()?;
    let transport = HttpTransport::new(&config)?;

    match config.cache_capacity {
        Some(capacity) => {
            let client = FetchClient::with_store(transport, BoundedStore::new(capacity));
            fetch_all(&client, &config, targets).await
        }
        None => {
            let client = FetchClient::with_store(transport, MemoryStore::new());
            fetch_all(&client, &config, targets).await
        }
    }
}

async fn fetch_all<S: CacheStore>(
    client: &FetchClient<HttpTransport, S>,
    config: &ClientConfig,
    targets: &[String],
) -> Result<()> {
    for target in targets {
        let descriptor = RequestDescriptor::get_json(config.endpoint(target)?);
        let (bytes, source) = client.fetch_raw_with_source(&descriptor).await?;
        println!(
            "{}\t{} bytes\t{}",
            descriptor.endpoint(),
            bytes.len(),
            source.as_str()
        );
    }
    Ok(())
}
