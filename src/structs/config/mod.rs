pub mod ai_config;
pub mod compliance_config;
pub mod config;
pub mod decompiler_config;
pub mod logging_config;
pub mod server_config;
