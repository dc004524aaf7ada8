use std::sync::Arc;
use std::time::Duration;

use kube::Client;
use tracing::info;

use crate::config::StatusConfig;
use crate::inspector::KubeWorkloadInspector;
use crate::status::StatusManager;
use crate::store::KubeStatusStore;

/// Build a manager backed by the cluster and seed it with the workloads and
/// related objects named in config.
pub async fn build_manager(
    client: Client,
    cfg: &StatusConfig,
) -> anyhow::Result<StatusManager> {
    let daemon_sets = cfg.daemon_set_refs()?;
    let deployments = cfg.deployment_refs()?;
    let related = cfg.related_object_refs()?;

    let manager = StatusManager::new(
        cfg.operator_name.clone(),
        cfg.release_version.clone(),
        Arc::new(KubeStatusStore::new(client.clone())),
        Arc::new(KubeWorkloadInspector::new(client)),
        cfg.queue_capacity,
    );
    manager.set_daemon_sets(daemon_sets).await;
    manager.set_deployments(deployments).await;
    manager.set_related_objects(related).await;
    Ok(manager)
}

/// Refresh pod-derived status on every resync tick until ctrl-c, then drain
/// the publish queue.
pub async fn run(client: Client, cfg: StatusConfig) -> anyhow::Result<()> {
    let manager = build_manager(client, &cfg).await?;
    let mut ticker =
        tokio::time::interval(Duration::from_secs(cfg.resync_secs.max(1)));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = manager.set_from_pods().await;
                info!(
                    reached = report.reached_available_level,
                    progressing = report.progressing.len(),
                    "resync: pod status refreshed"
                );
            }
            res = tokio::signal::ctrl_c() => {
                res?;
                info!("shutdown signal received; draining status queue");
                break;
            }
        }
    }

    manager.shutdown().await;
    Ok(())
}
