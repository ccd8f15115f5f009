use rp_common::config::GatewayConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = GatewayConfig::from_env()?;
    rp_gateway::serve(config).await?;

    Ok(())
}
