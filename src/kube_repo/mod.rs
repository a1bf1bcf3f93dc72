// Cluster access via kubectl: pod metrics per tick, deployment requests once.

mod payload;
pub mod quantity;

use crate::config::ClusterConfig;
use crate::error::{ChartError, Result};
use crate::models::{BaselineEntry, RawReading};
use crate::source::{BaselineSource, MetricsSource};
use payload::{Deployment, List, PodMetrics};
use quantity::{Quantity, QuantityError};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, instrument};

pub struct KubeRepo {
    kubectl: String,
    kubeconfig: Option<PathBuf>,
    namespace: String,
    group_label: String,
    timeout: Option<Duration>,
}

impl KubeRepo {
    /// Checks that the API server answers before any sampling starts.
    pub async fn connect(config: &ClusterConfig, timeout: Option<Duration>) -> Result<Self> {
        let repo = Self {
            kubectl: config.kubectl.clone(),
            kubeconfig: config.kubeconfig.clone(),
            namespace: config.namespace.clone(),
            group_label: config.group_label.clone(),
            timeout,
        };
        repo.kubectl(&["get", "--raw", "/version"])
            .await
            .map_err(ChartError::Connection)?;
        Ok(repo)
    }

    fn metrics_path(&self) -> String {
        if self.namespace.is_empty() {
            "/apis/metrics.k8s.io/v1beta1/pods".to_string()
        } else {
            format!(
                "/apis/metrics.k8s.io/v1beta1/namespaces/{}/pods",
                self.namespace
            )
        }
    }

    async fn kubectl(&self, args: &[&str]) -> std::result::Result<Vec<u8>, String> {
        let mut cmd = Command::new(&self.kubectl);
        if let Some(path) = &self.kubeconfig {
            cmd.arg("--kubeconfig").arg(path);
        }
        cmd.args(args).kill_on_drop(true);
        // own process group: a terminal Ctrl-C must not kill an in-flight call
        #[cfg(unix)]
        cmd.process_group(0);
        debug!(kubectl = %self.kubectl, ?args, "running kubectl");

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output()).await.map_err(|_| {
                format!(
                    "kubectl {} timed out after {}s",
                    args.join(" "),
                    limit.as_secs()
                )
            })?,
            None => cmd.output().await,
        }
        .map_err(|e| format!("cannot run {}: {e}", self.kubectl))?;

        if !output.status.success() {
            return Err(format!(
                "kubectl {} failed ({}): {}",
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(output.stdout)
    }

    async fn kubectl_json<T: DeserializeOwned>(
        &self,
        args: &[&str],
    ) -> std::result::Result<T, String> {
        let stdout = self.kubectl(args).await?;
        serde_json::from_slice(&stdout)
            .map_err(|e| format!("decoding kubectl {}: {e}", args.join(" ")))
    }
}

impl MetricsSource for KubeRepo {
    #[instrument(skip(self), fields(repo = "kube", operation = "sample"))]
    async fn sample(&self) -> Result<Vec<RawReading>> {
        let path = self.metrics_path();
        let list: List<PodMetrics> = self
            .kubectl_json(&["get", "--raw", &path])
            .await
            .map_err(ChartError::Sampling)?;
        readings_from_pod_metrics(&list.items)
            .map_err(|e| ChartError::Sampling(e.to_string()))
    }
}

impl BaselineSource for KubeRepo {
    #[instrument(skip(self, groups), fields(repo = "kube", operation = "requests"))]
    async fn requests(&self, groups: &[String]) -> Result<HashMap<String, BaselineEntry>> {
        let mut args = vec!["get", "deployments", "-o", "json"];
        if self.namespace.is_empty() {
            args.push("--all-namespaces");
        } else {
            args.extend(["-n", self.namespace.as_str()]);
        }
        let list: List<Deployment> = self
            .kubectl_json(&args)
            .await
            .map_err(ChartError::Connection)?;
        requests_from_deployments(&list.items, &self.group_label, groups)
            .map_err(|e| ChartError::Connection(e.to_string()))
    }
}

fn usage_of(
    map: &HashMap<String, String>,
    key: &str,
) -> std::result::Result<Quantity, QuantityError> {
    map.get(key).map_or(Ok(Quantity::default()), |s| Quantity::parse(s))
}

/// One reading per container; the container name is the group.
pub(crate) fn readings_from_pod_metrics(
    pods: &[PodMetrics],
) -> std::result::Result<Vec<RawReading>, QuantityError> {
    let mut out = Vec::new();
    for pod in pods {
        for container in &pod.containers {
            out.push(RawReading {
                entity_name: pod.metadata.name.clone(),
                group: container.name.clone(),
                cpu: usage_of(&container.usage, "cpu")?.to_milli(),
                mem: usage_of(&container.usage, "memory")?.to_mebibytes(),
            });
        }
    }
    Ok(out)
}

/// First deployment labelled with each group wins; its first container's requests are used.
pub(crate) fn requests_from_deployments(
    deployments: &[Deployment],
    group_label: &str,
    groups: &[String],
) -> std::result::Result<HashMap<String, BaselineEntry>, QuantityError> {
    let mut out = HashMap::new();
    for group in groups {
        let found = deployments.iter().find(|d| {
            d.metadata.labels.get(group_label) == Some(group)
                && !d.spec.template.spec.containers.is_empty()
        });
        let Some(deployment) = found else {
            continue;
        };
        let requests = &deployment.spec.template.spec.containers[0].resources.requests;
        debug!(
            group = %group,
            deployment = %deployment.metadata.name,
            namespace = %deployment.metadata.namespace,
            "matched deployment"
        );
        out.insert(
            group.clone(),
            BaselineEntry {
                cpu_request: usage_of(requests, "cpu")?.to_milli(),
                mem_request: usage_of(requests, "memory")?.to_mebibytes(),
            },
        );
    }
    Ok(out)
}
