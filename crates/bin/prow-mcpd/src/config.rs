use clap::{Parser, ValueEnum, builder::BoolishValueParser};
use reqwest::Url;
use std::net::SocketAddr;

const DEFAULT_PROW_URL: &str = "https://prow.ci.openshift.org";
const DEFAULT_GCS_URL: &str =
    "https://gcsweb-ci.apps.ci.l2s4.p1.openshiftapps.com/gcs/test-platform-results/logs";
const DEFAULT_CLUSTER_API_URL: &str = "https://api.ci.l2s4.p1.openshiftapps.com:6443";
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4030";

/// MCP transport the daemon serves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    Stdio,
    #[value(alias = "http")]
    StreamableHttp,
}

#[derive(Parser, Debug)]
#[command(name = "prow-mcpd", version, about = "Prow MCP daemon.")]
struct CliArgs {
    #[arg(long, env = "PROW_URL", default_value = DEFAULT_PROW_URL)]
    prow_url: String,

    #[arg(long, env = "PROW_GCS_URL", default_value = DEFAULT_GCS_URL)]
    gcs_url: String,

    #[arg(long, env = "PROW_CLUSTER_API_URL", default_value = DEFAULT_CLUSTER_API_URL)]
    cluster_api_url: String,

    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "MCP_TRANSPORT", value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    #[arg(long, env = "PROW_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(
        long,
        env = "PROW_LOG_JSON",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    log_json: bool,

    #[arg(
        long,
        env = "PROW_VERBOSE",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    verbose: bool,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct ProwConfig {
    pub prow_url: String,
    pub gcs_url: String,
    pub cluster_api_url: String,
    pub api_key: Option<String>,
    pub transport: Transport,
    pub mcp_http_addr: SocketAddr,
    pub log_json: bool,
    pub verbose: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name} value: {value}")]
    InvalidSetting { name: &'static str, value: String },
}

impl ProwConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for ProwConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            prow_url: base_url("PROW_URL", &args.prow_url)?,
            gcs_url: base_url("PROW_GCS_URL", &args.gcs_url)?,
            cluster_api_url: base_url("PROW_CLUSTER_API_URL", &args.cluster_api_url)?,
            api_key: args.api_key.filter(|value| !value.trim().is_empty()),
            transport: args.transport,
            mcp_http_addr: args.mcp_http_addr,
            log_json: args.log_json,
            verbose: args.verbose,
        })
    }
}

fn base_url(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidSetting {
        name,
        value: value.to_string(),
    };
    let trimmed = value.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(trimmed.to_string())
}
