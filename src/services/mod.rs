pub mod ai_providers;
pub mod change_analyzer;
pub mod compliance_correlator;
pub mod decompilation_orchestrator;
pub mod pipeline_coordinator;
pub mod rate_limiter;
pub mod response_parser;
pub mod workspace_manager;
