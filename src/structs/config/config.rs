use serde::{Deserialize, Serialize};
use crate::structs::config::ai_config::AiConfig;
use crate::structs::config::compliance_config::ComplianceConfig;
use crate::structs::config::decompiler_config::DecompilerConfig;
use crate::structs::config::logging_config::LoggingConfig;
use crate::structs::config::server_config::ServerConfig;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub decompiler: DecompilerConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub compliance: ComplianceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
