use std::path::PathBuf;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

/// Everything the orchestrator needs to drive the headless decompiler.
/// Passed in explicitly; components never read the tool location from the environment.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DecompilerConfig {
    #[serde(default = "ConfigHelper::default_headless_path")]
    pub headless_path: PathBuf,

    #[serde(default)]
    pub java_home: Option<PathBuf>,

    #[serde(default = "ConfigHelper::default_scratch_root")]
    pub scratch_root: PathBuf,

    #[serde(default = "ConfigHelper::default_project_name")]
    pub project_name: String,

    #[serde(default = "ConfigHelper::default_decompile_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "ConfigHelper::default_kill_grace_secs")]
    pub kill_grace_secs: u64,

    #[serde(default = "ConfigHelper::default_max_payload_bytes")]
    pub max_payload_bytes: u64,

    #[serde(default = "ConfigHelper::default_max_concurrent")]
    pub max_concurrent: usize,

    #[serde(default = "ConfigHelper::default_queue_wait_secs")]
    pub queue_wait_secs: u64,
}

impl DecompilerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn kill_grace(&self) -> Duration {
        Duration::from_secs(self.kill_grace_secs)
    }

    pub fn queue_wait(&self) -> Duration {
        Duration::from_secs(self.queue_wait_secs)
    }
}

impl Default for DecompilerConfig {
    fn default() -> Self {
        Self {
            headless_path: ConfigHelper::default_headless_path(),
            java_home: None,
            scratch_root: ConfigHelper::default_scratch_root(),
            project_name: ConfigHelper::default_project_name(),
            timeout_secs: ConfigHelper::default_decompile_timeout_secs(),
            kill_grace_secs: ConfigHelper::default_kill_grace_secs(),
            max_payload_bytes: ConfigHelper::default_max_payload_bytes(),
            max_concurrent: ConfigHelper::default_max_concurrent(),
            queue_wait_secs: ConfigHelper::default_queue_wait_secs(),
        }
    }
}
