//! Pod log collection and cluster metadata lookup inside a job namespace.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use prow_model::schema::{
    CLUSTER_CONFIG_MARKER,
    QUERY_CONTAINER,
    make_configmaps_url,
    make_pod_log_url,
    make_pods_url,
};
use prow_model::{ConfigMap, ConfigMapList, PodList};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ControlError, ProwControlPlane};

static NAMESPACE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]{0,61}[a-z0-9])?$").expect("namespace pattern is valid")
});

/// Log text for one container, or the error that prevented fetching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerLog {
    Log(String),
    Error(String),
}

/// Container logs keyed by pod name, then container name.
pub type PodLogMap = BTreeMap<String, BTreeMap<String, ContainerLog>>;

impl ProwControlPlane {
    /// Collects container logs for every pod in `namespace`.
    ///
    /// When `container` is set only containers with that name are fetched. A
    /// failed container fetch is recorded in its slot and collection carries on.
    ///
    /// # Errors
    /// Returns `ControlError` if the namespace name is invalid or the pod
    /// listing fails.
    pub async fn pod_logs(
        &self,
        namespace: &str,
        container: Option<&str>,
    ) -> Result<PodLogMap, ControlError> {
        check_namespace(namespace)?;
        let cluster_url = &self.endpoints.cluster_url;
        let pods: PodList = self
            .gateway
            .get_json(&make_pods_url(cluster_url, namespace), &[])
            .await?;

        let mut logs = PodLogMap::new();
        for pod in pods.items {
            let Some(pod_name) = pod.metadata.name else {
                continue;
            };
            let log_url = make_pod_log_url(cluster_url, namespace, &pod_name);
            for status in pod.status.container_statuses {
                let Some(container_name) = status.name else {
                    continue;
                };
                if container.is_some_and(|wanted| wanted != container_name) {
                    continue;
                }
                let entry = match self
                    .gateway
                    .get_text(&log_url, &[(QUERY_CONTAINER, container_name.as_str())])
                    .await
                {
                    Ok(text) => ContainerLog::Log(text),
                    Err(err) => {
                        warn!(
                            namespace,
                            pod = pod_name.as_str(),
                            container = container_name.as_str(),
                            error = %err,
                            "failed to fetch container log"
                        );
                        ContainerLog::Error(err.to_string())
                    }
                };
                logs.entry(pod_name.clone())
                    .or_default()
                    .insert(container_name, entry);
            }
        }
        debug!(namespace, pods = logs.len(), "collected pod logs");
        Ok(logs)
    }

    /// Merges the data of every configmap in `namespace` whose name mentions
    /// "cluster".
    ///
    /// # Errors
    /// Returns `ControlError` if the namespace name is invalid or the
    /// configmap listing fails.
    pub async fn cluster_info(
        &self,
        namespace: &str,
    ) -> Result<BTreeMap<String, Value>, ControlError> {
        check_namespace(namespace)?;
        let config_maps: ConfigMapList = self
            .gateway
            .get_json(&make_configmaps_url(&self.endpoints.cluster_url, namespace), &[])
            .await?;
        Ok(merge_cluster_config(config_maps.items))
    }
}

/// Merges the data of configmaps whose name contains "cluster", ignoring
/// case. Later configmaps overwrite earlier keys.
pub fn merge_cluster_config(
    config_maps: impl IntoIterator<Item = ConfigMap>,
) -> BTreeMap<String, Value> {
    let mut merged = BTreeMap::new();
    for config_map in config_maps {
        let is_cluster = config_map
            .metadata
            .name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(CLUSTER_CONFIG_MARKER));
        if is_cluster {
            merged.extend(config_map.data);
        }
    }
    merged
}

fn check_namespace(namespace: &str) -> Result<(), ControlError> {
    if NAMESPACE_NAME.is_match(namespace) {
        Ok(())
    } else {
        Err(ControlError::Validation(format!(
            "invalid namespace name: {namespace}"
        )))
    }
}
