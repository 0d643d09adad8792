#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use spectrace::adapters::reasoning_adapter::ReasoningAdapter;
use spectrace::enums::ai_provider_error::AiProviderError;
use spectrace::enums::change_kind::ChangeKind;
use spectrace::enums::locator::Locator;
use spectrace::enums::severity::Severity;
use spectrace::services::change_analyzer::ChangeAnalyzer;
use spectrace::services::compliance_correlator::ComplianceCorrelator;
use spectrace::services::decompilation_orchestrator::DecompilationOrchestrator;
use spectrace::services::pipeline_coordinator::PipelineCoordinator;
use spectrace::structs::analysis_metadata::AnalysisMetadata;
use spectrace::structs::change_record::ChangeRecord;
use spectrace::structs::code_analysis_result::CodeAnalysisResult;
use spectrace::structs::config::compliance_config::ComplianceConfig;
use spectrace::structs::config::decompiler_config::DecompilerConfig;
use spectrace::structs::spec_analysis_result::SpecAnalysisResult;
use spectrace::traits::ai_provider::AiProvider;

/// Replays queued replies in order and records every prompt it was sent.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, AiProviderError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<String, AiProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn replying(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for ScriptedProvider {
    async fn chat(&self, _system_prompt: String, user_prompts: Vec<String>) -> Result<String, AiProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().extend(user_prompts);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AiProviderError::ServerError { status: 500, message: "script exhausted".into() }))
    }

    fn name(&self) -> String {
        "scripted".to_string()
    }

    fn model(&self) -> String {
        "scripted-1".to_string()
    }
}

pub fn adapter(provider: Arc<ScriptedProvider>) -> Arc<ReasoningAdapter> {
    Arc::new(ReasoningAdapter::with_policy(provider, 2, Duration::from_millis(1), Duration::from_secs(5)))
}

pub fn decompiler_config(scratch: &Path, tool: &Path) -> DecompilerConfig {
    DecompilerConfig {
        headless_path: tool.to_path_buf(),
        scratch_root: scratch.to_path_buf(),
        timeout_secs: 10,
        kill_grace_secs: 2,
        max_payload_bytes: 1024,
        max_concurrent: 2,
        queue_wait_secs: 1,
        ..DecompilerConfig::default()
    }
}

pub fn coordinator(scratch: &Path, tool: &Path, provider: Arc<ScriptedProvider>) -> PipelineCoordinator {
    let adapter = adapter(provider);
    PipelineCoordinator::new(
        DecompilationOrchestrator::new(decompiler_config(scratch, tool)).unwrap(),
        ChangeAnalyzer::new(Arc::clone(&adapter)),
        ComplianceCorrelator::new(adapter, ComplianceConfig::default()),
    )
}

/// Writes an executable stand-in for the headless decompiler. The body runs
/// after `$out` has been set to the directory following `DecompileAll.java`.
#[cfg(unix)]
pub fn fake_tool(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("analyzeHeadless");
    let script = format!(
        "#!/bin/sh\nout=\"\"\nprev=\"\"\nfor arg in \"$@\"; do\n  if [ \"$prev\" = \"DecompileAll.java\" ]; then out=\"$arg\"; fi\n  prev=\"$arg\"\ndone\n{}\n",
        body
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    // Let forks from concurrently running tests exec before this file is run.
    std::thread::sleep(Duration::from_millis(100));
    path
}

#[cfg(unix)]
pub fn succeeding_tool(dir: &Path) -> PathBuf {
    fake_tool(
        dir,
        "printf '00001000: ldi r24, 0x20\\n' > \"$out/assembly_output.txt\"\n\
         printf 'void main(void) {\\n  PORTB = 0x20;\\n}\\n' > \"$out/decompiled_output.txt\"\n\
         printf 'Program: blink.elf\\nLanguage: AVR8:LE:16:atmega256\\nAddress Size: 16\\n' > \"$out/metadata_output.txt\"\n\
         echo 'INFO  REPORT: Analysis succeeded'",
    )
}

pub fn elf_payload() -> Vec<u8> {
    let mut payload = vec![0x7f, b'E', b'L', b'F', 1, 1, 1, 0];
    payload.extend_from_slice(&[0u8; 56]);
    payload
}

pub fn line_change(line: u32, old: Option<&str>, new: Option<&str>, description: &str) -> ChangeRecord {
    ChangeRecord {
        locator: Locator::Line(line),
        change_type: match (old, new) {
            (None, Some(_)) => ChangeKind::Added,
            (Some(_), None) => ChangeKind::Removed,
            _ => ChangeKind::Modified,
        },
        old_content: old.map(str::to_string),
        new_content: new.map(str::to_string),
        description: description.to_string(),
    }
}

pub fn section_change(section: &str, old: Option<&str>, new: Option<&str>, description: &str) -> ChangeRecord {
    ChangeRecord {
        locator: Locator::Section(section.to_string()),
        change_type: match (old, new) {
            (None, Some(_)) => ChangeKind::Added,
            (Some(_), None) => ChangeKind::Removed,
            _ => ChangeKind::Modified,
        },
        old_content: old.map(str::to_string),
        new_content: new.map(str::to_string),
        description: description.to_string(),
    }
}

pub fn code_analysis(differences: Vec<ChangeRecord>) -> CodeAnalysisResult {
    CodeAnalysisResult {
        differences,
        security_findings: Vec::new(),
        risk_assessment: Severity::Low,
        summary: String::new(),
        major_changes: Vec::new(),
        recommendations: Vec::new(),
        analysis_metadata: AnalysisMetadata::default(),
    }
}

pub fn spec_analysis(differences: Vec<ChangeRecord>) -> SpecAnalysisResult {
    SpecAnalysisResult {
        differences,
        new_features: Vec::new(),
        removed_features: Vec::new(),
        behavioral_changes: Vec::new(),
        risk_level: Severity::Low,
        summary: String::new(),
        major_changes: Vec::new(),
        recommendations: Vec::new(),
        analysis_metadata: AnalysisMetadata::default(),
    }
}

/// Picks a reply by a marker found in the user prompt, for flows whose calls run concurrently.
pub struct RoutedProvider {
    routes: Vec<(&'static str, String)>,
    prompts: Mutex<Vec<String>>,
}

impl RoutedProvider {
    pub fn new(routes: Vec<(&'static str, String)>) -> Arc<Self> {
        Arc::new(Self { routes, prompts: Mutex::new(Vec::new()) })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for RoutedProvider {
    async fn chat(&self, _system_prompt: String, user_prompts: Vec<String>) -> Result<String, AiProviderError> {
        let prompt = user_prompts.join("\n");
        self.prompts.lock().unwrap().push(prompt.clone());
        self.routes
            .iter()
            .find(|(marker, _)| prompt.contains(marker))
            .map(|(_, reply)| reply.clone())
            .ok_or_else(|| AiProviderError::ApiError { status: 400, message: "no route for prompt".into() })
    }

    fn name(&self) -> String {
        "routed".to_string()
    }

    fn model(&self) -> String {
        "routed-1".to_string()
    }
}

pub const CODE_ROUTE: &str = "OLD CODE:";
pub const SPEC_ROUTE: &str = "OLD SPECIFICATION:";
pub const COMPLIANCE_ROUTE: &str = "CODE CHANGES:";

pub fn routed_coordinator(scratch: &Path, tool: &Path, provider: Arc<RoutedProvider>) -> PipelineCoordinator {
    routed_coordinator_with(decompiler_config(scratch, tool), provider)
}

pub fn routed_coordinator_with(config: DecompilerConfig, provider: Arc<RoutedProvider>) -> PipelineCoordinator {
    let adapter = Arc::new(ReasoningAdapter::with_policy(provider, 1, Duration::from_millis(1), Duration::from_secs(5)));
    PipelineCoordinator::new(
        DecompilationOrchestrator::new(config).unwrap(),
        ChangeAnalyzer::new(Arc::clone(&adapter)),
        ComplianceCorrelator::new(adapter, ComplianceConfig::default()),
    )
}
