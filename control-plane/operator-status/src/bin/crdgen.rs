use kube::core::CustomResourceExt;
use operator_status::crd::cluster_operator::ClusterOperator;

fn main() -> anyhow::Result<()> {
    let yaml = serde_yaml::to_string(&ClusterOperator::crd())?;
    println!("{yaml}");
    Ok(())
}
