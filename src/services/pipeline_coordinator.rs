use std::sync::Arc;
use std::time::Instant;
use crate::adapters::reasoning_adapter::ReasoningAdapter;
use crate::enums::code_artifact::CodeArtifact;
use crate::errors::SpectraceResult;
use crate::services::change_analyzer::ChangeAnalyzer;
use crate::services::compliance_correlator::ComplianceCorrelator;
use crate::services::decompilation_orchestrator::DecompilationOrchestrator;
use crate::structs::binary_metadata::BinaryMetadata;
use crate::structs::code_analysis_result::CodeAnalysisResult;
use crate::structs::compare_code_request::CompareCodeRequest;
use crate::structs::compare_specs_request::CompareSpecsRequest;
use crate::structs::compliance_report::ComplianceReport;
use crate::structs::config::config::Config;
use crate::structs::decompilation_output::DecompilationOutput;
use crate::structs::pipeline_report::PipelineReport;
use crate::structs::pipeline_request::PipelineRequest;
use crate::structs::spec_analysis_result::SpecAnalysisResult;
use crate::traits::ai_provider::AiProvider;

/// Entry point for every operation. Holds no per-request state; dropping a
/// returned future cancels the subprocesses and reasoning calls under it.
pub struct PipelineCoordinator {
    orchestrator: DecompilationOrchestrator,
    analyzer: ChangeAnalyzer,
    correlator: ComplianceCorrelator,
}

impl PipelineCoordinator {
    pub fn new(orchestrator: DecompilationOrchestrator, analyzer: ChangeAnalyzer, correlator: ComplianceCorrelator) -> Self {
        Self { orchestrator, analyzer, correlator }
    }

    pub fn from_config(config: &Config, provider: Arc<dyn AiProvider>) -> SpectraceResult<Self> {
        let adapter = Arc::new(ReasoningAdapter::new(provider, &config.ai));
        Ok(Self::new(
            DecompilationOrchestrator::new(config.decompiler.clone())?,
            ChangeAnalyzer::new(Arc::clone(&adapter)),
            ComplianceCorrelator::new(adapter, config.compliance.clone()),
        ))
    }

    pub fn max_payload_bytes(&self) -> u64 {
        self.orchestrator.max_payload_bytes()
    }

    pub async fn decompile(
        &self,
        payload: &[u8],
        filename: &str,
        architecture_hint: Option<String>,
    ) -> SpectraceResult<DecompilationOutput> {
        self.orchestrator.decompile(payload, filename, architecture_hint).await
    }

    pub async fn compare_code(&self, request: &CompareCodeRequest) -> SpectraceResult<CodeAnalysisResult> {
        self.analyzer.compare_code(request).await
    }

    pub async fn compare_specs(&self, request: &CompareSpecsRequest) -> SpectraceResult<SpecAnalysisResult> {
        self.analyzer.compare_specs(request).await
    }

    pub async fn validate_compliance(
        &self,
        code: &CodeAnalysisResult,
        spec: &SpecAnalysisResult,
    ) -> SpectraceResult<ComplianceReport> {
        self.correlator.correlate(code, spec).await
    }

    /// Decompile (if needed) -> code and spec analysis concurrently -> correlate.
    pub async fn run(&self, request: PipelineRequest) -> SpectraceResult<PipelineReport> {
        let started = Instant::now();
        let binaries = [&request.old_code, &request.new_code].iter().filter(|a| a.is_binary()).count();
        log::info!("🔍 Pipeline run started ({} binary input(s) to decompile)", binaries);

        let hint = request.architecture_hint.clone();
        // Fewer slots than binaries: decompiling concurrently would starve one side in the queue.
        let ((old_code, old_binary), (new_code, new_binary)) = if binaries > 1 && self.orchestrator.max_concurrent() < binaries {
            log::info!("⏳ One decompiler slot available, decompiling both sides in turn");
            let old = self.resolve_code(request.old_code, hint.clone()).await?;
            let new = self.resolve_code(request.new_code, hint).await?;
            (old, new)
        } else {
            tokio::try_join!(
                self.resolve_code(request.old_code, hint.clone()),
                self.resolve_code(request.new_code, hint),
            )?
        };

        let code_request = CompareCodeRequest::new(old_code, new_code, request.firmware_type);
        let spec_request = CompareSpecsRequest { old_spec: request.old_spec, new_spec: request.new_spec };
        let (code_analysis, spec_analysis) = tokio::try_join!(
            self.analyzer.compare_code(&code_request),
            self.analyzer.compare_specs(&spec_request),
        )?;

        let compliance = self.correlator.correlate(&code_analysis, &spec_analysis).await?;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        log::info!("🏁 Pipeline run finished in {}ms", duration_ms);

        Ok(PipelineReport {
            code_analysis,
            spec_analysis,
            compliance,
            old_binary,
            new_binary,
            duration_ms,
        })
    }

    async fn resolve_code(
        &self,
        artifact: CodeArtifact,
        architecture_hint: Option<String>,
    ) -> SpectraceResult<(String, Option<BinaryMetadata>)> {
        match artifact {
            CodeArtifact::Source(text) => Ok((text, None)),
            CodeArtifact::Binary { filename, payload } => {
                let output = self.orchestrator.decompile(&payload, &filename, architecture_hint).await?;
                Ok((output.analyzable_text().to_string(), Some(output.metadata)))
            }
        }
    }
}
