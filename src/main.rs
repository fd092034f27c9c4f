use std::sync::Arc;

use postgate::{Config, Gateway, Server};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), postgate::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    if config.uses_placeholder_upstream() {
        warn!(
            upstream = %config.upstream_url,
            "UPSTREAM_API_URL is not set; every data route will fail until it is"
        );
    }
    info!(
        upstream = %config.upstream_url,
        timeout_secs = config.upstream_timeout.as_secs(),
        recommendations = ?config.recommendation_shape,
        "starting gateway"
    );

    let gateway = Arc::new(Gateway::from_config(&config)?);
    Server::bind(config.listen_addr)
        .serve(gateway.routes(&config))
        .await
}
