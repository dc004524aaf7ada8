use envconfig::Envconfig;
use kube::Client;
use operator_status::{config::StatusConfig, init_tracing, runtime};
use tracing::info;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let cfg = StatusConfig::init_from_env()?;
    info!(?cfg, "Starting operator status reporter");

    let client = Client::try_default().await?;
    runtime::run(client, cfg).await
}
