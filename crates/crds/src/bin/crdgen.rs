//! Prints the CRD manifests as a multi-document YAML stream.
//!
//! Usage: `cargo run -p crds --bin crdgen > config/crd/cluster-sync.yaml`

use anyhow::Context;
use crds::ClusterSync;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    let crds = [ClusterSync::crd()];
    for crd in &crds {
        let yaml = serde_yaml::to_string(crd)
            .with_context(|| format!("failed to serialize CRD {}", crd.spec.names.kind))?;
        println!("---\n{}", yaml.trim_end());
    }
    Ok(())
}
