use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use serde::Serialize;
use crate::config::config_manager::ConfigManager;
use crate::enums::code_artifact::CodeArtifact;
use crate::enums::commands::Commands;
use crate::errors::{SpectraceError, SpectraceResult};
use crate::server::api_server::ApiServer;
use crate::services::ai_providers::build_provider;
use crate::services::pipeline_coordinator::PipelineCoordinator;
use crate::structs::code_analysis_result::CodeAnalysisResult;
use crate::structs::compare_code_request::CompareCodeRequest;
use crate::structs::compare_specs_request::CompareSpecsRequest;
use crate::structs::config::config::Config;
use crate::structs::pipeline_request::PipelineRequest;
use crate::structs::spec_analysis_result::SpecAnalysisResult;

pub struct CommandRunner {
    config_path: Option<PathBuf>,
    start_time: Option<Instant>,
}

impl CommandRunner {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            start_time: None,
        }
    }

    pub async fn run_command(&mut self, command: Commands, config: Config) -> SpectraceResult<()> {
        self.start_time = Some(Instant::now());

        let result = match command {
            Commands::Init => self.init_command(),
            Commands::Validate => self.validate_command(&config),
            Commands::Serve { host, port } => self.serve_command(config, host, port).await,
            Commands::Decompile { binary, architecture } => {
                self.decompile_command(&config, &binary, architecture).await
            }
            Commands::CompareCode { old, new, firmware_type } => {
                self.compare_code_command(&config, &old, &new, firmware_type).await
            }
            Commands::CompareSpecs { old, new } => self.compare_specs_command(&config, &old, &new).await,
            Commands::ValidateCompliance { code_analysis, spec_analysis } => {
                self.validate_compliance_command(&config, &code_analysis, &spec_analysis).await
            }
            Commands::Analyze {
                old_code,
                old_binary,
                new_code,
                new_binary,
                old_spec,
                new_spec,
                firmware_type,
            } => {
                let request = PipelineRequest {
                    old_code: read_artifact(old_code.as_deref(), old_binary.as_deref(), "old")?,
                    new_code: read_artifact(new_code.as_deref(), new_binary.as_deref(), "new")?,
                    old_spec: read_text(&old_spec)?,
                    new_spec: read_text(&new_spec)?,
                    firmware_type,
                    architecture_hint: None,
                };
                self.analyze_command(&config, request).await
            }
        };

        if let Some(start) = self.start_time {
            log::info!("⏱️  Command completed in {:.2}s", start.elapsed().as_secs_f64());
        }

        result
    }

    fn init_command(&self) -> SpectraceResult<()> {
        log::info!("🚀 Initializing spectrace configuration...");
        let path = ConfigManager::create_sample_config(self.config_path.as_deref())?;
        log::info!("📝 Edit {} to point at your decompiler and reasoning service.", path.display());
        log::info!("🔧 Run 'spectrace validate' to check your configuration.");
        Ok(())
    }

    fn validate_command(&self, config: &Config) -> SpectraceResult<()> {
        log::info!("🔍 Validating configuration...");
        ConfigManager::ensure_valid(config).map(|_| ())
    }

    async fn serve_command(&self, mut config: Config, host: Option<String>, port: Option<u16>) -> SpectraceResult<()> {
        if let Some(host) = host {
            config.server.host = host;
        }
        if let Some(port) = port {
            config.server.port = port;
        }

        ConfigManager::ensure_valid(&config)?;

        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| {
                SpectraceError::config_error(
                    &format!("Invalid listen address {}:{}: {}", config.server.host, config.server.port, e),
                    Some("server.host"),
                    Some("Use an IP address such as 127.0.0.1 or 0.0.0.0"),
                )
            })?;

        let coordinator = Arc::new(coordinator(&config)?);
        ApiServer::new(coordinator)
            .run(addr, async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::info!("🛑 Shutdown signal received");
                }
            })
            .await
    }

    async fn decompile_command(&self, config: &Config, binary: &Path, architecture: Option<String>) -> SpectraceResult<()> {
        let payload = tokio::fs::read(binary).await?;
        let filename = binary
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        log::info!("🔧 Decompiling {} ({} bytes)", binary.display(), payload.len());
        let output = coordinator(config)?.decompile(&payload, &filename, architecture).await?;
        print_json(&output)
    }

    async fn compare_code_command(
        &self,
        config: &Config,
        old: &Path,
        new: &Path,
        firmware_type: Option<String>,
    ) -> SpectraceResult<()> {
        let request = CompareCodeRequest::new(read_text(old)?, read_text(new)?, firmware_type);
        let result = coordinator(config)?.compare_code(&request).await?;
        print_json(&result)
    }

    async fn compare_specs_command(&self, config: &Config, old: &Path, new: &Path) -> SpectraceResult<()> {
        let request = CompareSpecsRequest {
            old_spec: read_text(old)?,
            new_spec: read_text(new)?,
        };
        let result = coordinator(config)?.compare_specs(&request).await?;
        print_json(&result)
    }

    async fn validate_compliance_command(
        &self,
        config: &Config,
        code_analysis: &Path,
        spec_analysis: &Path,
    ) -> SpectraceResult<()> {
        let code: CodeAnalysisResult = read_json(code_analysis)?;
        let spec: SpecAnalysisResult = read_json(spec_analysis)?;
        let report = coordinator(config)?.validate_compliance(&code, &spec).await?;
        print_json(&report)
    }

    async fn analyze_command(&self, config: &Config, request: PipelineRequest) -> SpectraceResult<()> {
        let report = coordinator(config)?.run(request).await?;
        print_json(&report)
    }
}

fn coordinator(config: &Config) -> SpectraceResult<PipelineCoordinator> {
    let provider = build_provider(&config.ai)?;
    PipelineCoordinator::from_config(config, provider)
}

fn read_text(path: &Path) -> SpectraceResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        SpectraceError::invalid_input(&path.display().to_string(), &format!("cannot read text file: {}", e))
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> SpectraceResult<T> {
    serde_json::from_str(&read_text(path)?).map_err(|e| {
        SpectraceError::invalid_input(&path.display().to_string(), &format!("not a valid analysis document: {}", e))
    })
}

fn read_artifact(code: Option<&Path>, binary: Option<&Path>, side: &str) -> SpectraceResult<CodeArtifact> {
    match (code, binary) {
        (Some(path), None) => Ok(CodeArtifact::Source(read_text(path)?)),
        (None, Some(path)) => Ok(CodeArtifact::Binary {
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            payload: std::fs::read(path)?,
        }),
        _ => Err(SpectraceError::invalid_input(
            side,
            &format!("provide exactly one of --{side}-code or --{side}-binary"),
        )),
    }
}

fn print_json<T: Serialize>(value: &T) -> SpectraceResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| SpectraceError::system_error("render output", &e.to_string()))?;
    println!("{}", rendered);
    Ok(())
}
