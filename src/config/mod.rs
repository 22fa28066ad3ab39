use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use strum::{Display, EnumString};

use crate::services::poller::PollPolicy;

/// OCR recognition mode passed to the `ocrdocument` action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OcrMode {
    #[default]
    DocumentPhoto,
    DocumentScan,
    ScenePhoto,
    Subtitle,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:5000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Directory holding the `hod.apikey` credential file.
    #[serde(default = "default_apikey_dir")]
    pub apikey_dir: PathBuf,

    /// Haven OnDemand API base URL
    #[serde(default = "default_hod_base_url")]
    pub hod_base_url: String,

    /// Text index that uploads are added to and queries run against.
    #[serde(default = "default_index_name")]
    pub index_name: String,

    #[serde(default)]
    pub ocr_mode: OcrMode,

    /// Largest accepted upload body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default = "default_poll_initial_delay_ms")]
    pub poll_initial_delay_ms: u64,

    #[serde(default = "default_poll_max_delay_ms")]
    pub poll_max_delay_ms: u64,

    /// Upper bound on how long a single remote job is waited for.
    #[serde(default = "default_poll_max_wait_secs")]
    pub poll_max_wait_secs: u64,

    /// Consecutive transient status-check failures tolerated per job.
    #[serde(default = "default_poll_max_retries")]
    pub poll_max_retries: u32,

    /// Timeout applied to each outbound HTTP request.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Timeout applied to each inbound request, poll loops included.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_apikey_dir() -> PathBuf {
    PathBuf::from(".apikeys")
}

fn default_hod_base_url() -> String {
    "https://api.havenondemand.com".to_string()
}

fn default_index_name() -> String {
    "smash".to_string()
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_poll_initial_delay_ms() -> u64 {
    250
}

fn default_poll_max_delay_ms() -> u64 {
    5_000
}

fn default_poll_max_wait_secs() -> u64 {
    120
}

fn default_poll_max_retries() -> u32 {
    3
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    180
}

/// Command-line overrides; anything given here wins over the environment.
#[derive(Debug, Default, Parser)]
#[command(name = "smash", about = "Run SMASH")]
pub struct Cli {
    /// Directory containing the hod.apikey file
    #[arg(long, short = 'a')]
    pub apikeydir: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    pub bind: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    pub fn with_cli(mut self, cli: Cli) -> Self {
        if let Some(dir) = cli.apikeydir {
            self.apikey_dir = dir;
        }
        if let Some(bind) = cli.bind {
            self.bind_addr = bind;
        }
        self
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            initial_delay: Duration::from_millis(self.poll_initial_delay_ms),
            max_delay: Duration::from_millis(self.poll_max_delay_ms),
            max_wait: Duration::from_secs(self.poll_max_wait_secs),
            max_retries: self.poll_max_retries,
        }
        .normalized()
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
