pub const PROWJOBS_PATH: &str = "prowjobs.js";
pub const PROWJOBS_QUERY_PATH: &str = "prow/prowjobs";

pub const QUERY_ORG: &str = "org";
pub const QUERY_REPO: &str = "repo";
pub const QUERY_PULL: &str = "pull";
pub const QUERY_STATE: &str = "state";
pub const QUERY_CONTAINER: &str = "container";

pub const ARTIFACTS_DIR: &str = "artifacts";
pub const BUILD_LOG_FILE: &str = "build-log.txt";

pub const CI_NAMESPACE_PREFIX: &str = "ci-op-";
pub const CLUSTER_CONFIG_MARKER: &str = "cluster";

pub fn make_prowjobs_url(prow_url: &str) -> String {
    format!("{prow_url}/{PROWJOBS_PATH}")
}

pub fn make_prowjobs_query_url(prow_url: &str) -> String {
    format!("{prow_url}/{PROWJOBS_QUERY_PATH}")
}

pub fn make_pods_url(cluster_url: &str, namespace: &str) -> String {
    format!("{cluster_url}/api/v1/namespaces/{namespace}/pods")
}

pub fn make_pod_log_url(cluster_url: &str, namespace: &str, pod: &str) -> String {
    format!("{cluster_url}/api/v1/namespaces/{namespace}/pods/{pod}/log")
}

pub fn make_configmaps_url(cluster_url: &str, namespace: &str) -> String {
    format!("{cluster_url}/api/v1/namespaces/{namespace}/configmaps")
}
