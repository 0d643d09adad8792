use std::sync::Arc;
use std::time::Instant;
use chrono::Utc;
use crate::adapters::reasoning_adapter::ReasoningAdapter;
use crate::enums::analysis_mode::AnalysisMode;
use crate::enums::content_anomaly::ContentAnomaly;
use crate::enums::locator::Locator;
use crate::enums::severity::Severity;
use crate::errors::{SpectraceError, SpectraceResult};
use crate::helpers::prompt_generator::{generate_code_prompt, generate_spec_prompt};
use crate::prompts::code_analysis_prompt::CODE_ANALYSIS_PROMPT;
use crate::prompts::spec_analysis_prompt::SPEC_ANALYSIS_PROMPT;
use crate::services::response_parser::decode;
use crate::structs::analysis_metadata::AnalysisMetadata;
use crate::structs::change_record::ChangeRecord;
use crate::structs::code_analysis_result::CodeAnalysisResult;
use crate::structs::compare_code_request::CompareCodeRequest;
use crate::structs::compare_specs_request::CompareSpecsRequest;
use crate::structs::security_finding::SecurityFinding;
use crate::structs::spec_analysis_result::SpecAnalysisResult;
use crate::structs::wire::code_analysis_payload::CodeAnalysisPayload;
use crate::structs::wire::spec_analysis_payload::SpecAnalysisPayload;

/// Turns an old/new artifact pair into a validated change set, in code or spec mode.
pub struct ChangeAnalyzer {
    adapter: Arc<ReasoningAdapter>,
}

impl ChangeAnalyzer {
    pub fn new(adapter: Arc<ReasoningAdapter>) -> Self {
        Self { adapter }
    }

    pub async fn compare_code(&self, request: &CompareCodeRequest) -> SpectraceResult<CodeAnalysisResult> {
        let started = Instant::now();
        let mut metadata = Self::base_metadata(AnalysisMode::Code, &request.old_code, &request.new_code);
        metadata.firmware_type = request.firmware_type.clone();
        metadata.analysis_depth = Some(request.analysis_depth.clone());

        if request.old_code == request.new_code {
            log::info!("🟰 Code versions are identical, skipping analysis");
            metadata.identical_input = true;
            return Ok(CodeAnalysisResult {
                differences: Vec::new(),
                security_findings: Vec::new(),
                risk_assessment: Severity::Low,
                summary: "The two code versions are identical.".to_string(),
                major_changes: Vec::new(),
                recommendations: Vec::new(),
                analysis_metadata: metadata,
            });
        }

        let mode = AnalysisMode::Code;
        let user_prompt = generate_code_prompt(
            &request.old_code,
            &request.new_code,
            request.firmware_type.as_deref(),
            &request.analysis_depth,
        );
        let reply = self.adapter.complete(mode.operation(), CODE_ANALYSIS_PROMPT, &user_prompt).await?;
        let payload: CodeAnalysisPayload = decode(mode.contract_name(), &reply.content)?;

        let differences = payload
            .differences
            .into_iter()
            .map(|d| ChangeRecord {
                locator: Locator::Line(d.line_number),
                change_type: d.change_type,
                old_content: d.old_content,
                new_content: d.new_content,
                description: d.description,
            })
            .collect::<Vec<_>>();
        Self::check_records(mode, &differences)?;

        let security_findings = payload
            .security_findings
            .into_iter()
            .map(|f| SecurityFinding {
                category: f.category,
                severity: f.severity,
                description: f.description,
                location: f.location,
                code_snippet: f.code_snippet,
                recommendation: f.recommendation,
            })
            .collect::<Vec<_>>();

        self.finish_metadata(&mut metadata, differences.len(), reply.attempts, started);
        log::info!(
            "✅ Code comparison: {} changes, {} findings, risk {}",
            differences.len(),
            security_findings.len(),
            payload.risk_assessment
        );

        Ok(CodeAnalysisResult {
            differences,
            security_findings,
            risk_assessment: payload.risk_assessment,
            summary: payload.summary,
            major_changes: payload.major_changes,
            recommendations: payload.recommendations,
            analysis_metadata: metadata,
        })
    }

    pub async fn compare_specs(&self, request: &CompareSpecsRequest) -> SpectraceResult<SpecAnalysisResult> {
        let started = Instant::now();
        let mut metadata = Self::base_metadata(AnalysisMode::Spec, &request.old_spec, &request.new_spec);

        if request.old_spec == request.new_spec {
            log::info!("🟰 Specification versions are identical, skipping analysis");
            metadata.identical_input = true;
            return Ok(SpecAnalysisResult {
                differences: Vec::new(),
                new_features: Vec::new(),
                removed_features: Vec::new(),
                behavioral_changes: Vec::new(),
                risk_level: Severity::Low,
                summary: "The two specification versions are identical.".to_string(),
                major_changes: Vec::new(),
                recommendations: Vec::new(),
                analysis_metadata: metadata,
            });
        }

        let mode = AnalysisMode::Spec;
        let user_prompt = generate_spec_prompt(&request.old_spec, &request.new_spec);
        let reply = self.adapter.complete(mode.operation(), SPEC_ANALYSIS_PROMPT, &user_prompt).await?;
        let payload: SpecAnalysisPayload = decode(mode.contract_name(), &reply.content)?;

        let differences = payload
            .differences
            .into_iter()
            .map(|d| ChangeRecord {
                locator: Locator::Section(d.section.trim().to_string()),
                change_type: d.change_type,
                old_content: d.old_content,
                new_content: d.new_content,
                description: d.description,
            })
            .collect::<Vec<_>>();
        Self::check_records(mode, &differences)?;

        self.finish_metadata(&mut metadata, differences.len(), reply.attempts, started);
        log::info!("✅ Specification comparison: {} changes, risk {}", differences.len(), payload.risk_level);

        Ok(SpecAnalysisResult {
            differences,
            new_features: payload.new_features,
            removed_features: payload.removed_features,
            behavioral_changes: payload.behavioral_changes,
            risk_level: payload.risk_level,
            summary: payload.summary,
            major_changes: payload.major_changes,
            recommendations: payload.recommendations,
            analysis_metadata: metadata,
        })
    }

    fn base_metadata(mode: AnalysisMode, old: &str, new: &str) -> AnalysisMetadata {
        let content_anomaly = ContentAnomaly::detect(old, new);
        if let Some(anomaly) = content_anomaly {
            log::warn!("⚠️ {} input anomaly: {:?}", mode.operation(), anomaly);
        }

        AnalysisMetadata {
            mode,
            old_length: old.len(),
            new_length: new.len(),
            content_anomaly,
            analyzed_at: Some(Utc::now()),
            ..AnalysisMetadata::default()
        }
    }

    fn finish_metadata(&self, metadata: &mut AnalysisMetadata, total_changes: usize, attempts: u32, started: Instant) {
        metadata.provider = Some(self.adapter.provider_name());
        metadata.model = Some(self.adapter.model());
        metadata.total_changes = total_changes;
        metadata.attempts = attempts;
        metadata.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    }

    fn check_records(mode: AnalysisMode, records: &[ChangeRecord]) -> SpectraceResult<()> {
        for (index, record) in records.iter().enumerate() {
            record.check().map_err(|reason| {
                SpectraceError::contract_violation(mode.contract_name(), &format!("differences[{}]: {}", index, reason))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::traits::ai_provider::MockAiProvider;

    fn analyzer(mock: MockAiProvider) -> ChangeAnalyzer {
        let adapter = ReasoningAdapter::with_policy(Arc::new(mock), 3, Duration::from_millis(1), Duration::from_secs(5));
        ChangeAnalyzer::new(Arc::new(adapter))
    }

    fn replying(reply: &'static str) -> MockAiProvider {
        let mut mock = MockAiProvider::new();
        mock.expect_name().return_const("mock".to_string());
        mock.expect_model().return_const("mock-model".to_string());
        mock.expect_chat().times(1).returning(move |_, _| Ok(reply.to_string()));
        mock
    }

    #[tokio::test]
    async fn identical_code_never_reaches_the_service() {
        let mut mock = MockAiProvider::new();
        mock.expect_chat().never();
        let request = CompareCodeRequest::new("int x;".into(), "int x;".into(), None);

        let result = analyzer(mock).compare_code(&request).await.unwrap();
        assert!(result.differences.is_empty());
        assert!(result.security_findings.is_empty());
        assert!(result.analysis_metadata.identical_input);
    }

    #[tokio::test]
    async fn empty_side_is_flagged_as_anomaly() {
        let mock = replying(
            r#"{"differences":[{"line_number":1,"change_type":"added","old_content":null,"new_content":"int x;","description":"new global"}],
                "security_findings":[],"risk_assessment":"low","summary":"added","major_changes":[],"recommendations":[]}"#,
        );
        let request = CompareCodeRequest::new(String::new(), "int x;".into(), None);

        let result = analyzer(mock).compare_code(&request).await.unwrap();
        assert_eq!(result.analysis_metadata.content_anomaly, Some(ContentAnomaly::OldEmpty));
        assert_eq!(result.differences[0].locator, Locator::Line(1));
        assert_eq!(result.analysis_metadata.attempts, 1);
    }

    #[tokio::test]
    async fn zero_line_numbers_violate_the_contract() {
        let mock = replying(
            r#"{"differences":[{"line_number":0,"change_type":"modified","old_content":"a","new_content":"b","description":"x"}],
                "security_findings":[],"risk_assessment":"low","summary":"","major_changes":[],"recommendations":[]}"#,
        );
        let request = CompareCodeRequest::new("a".into(), "b".into(), None);

        let err = analyzer(mock).compare_code(&request).await.unwrap_err();
        assert_eq!(err.kind(), "analysis_contract_violation");
    }

    #[tokio::test]
    async fn records_without_content_violate_the_contract() {
        let mock = replying(
            r#"{"differences":[{"section":"Timing","change_type":"modified","old_content":null,"new_content":"  ","description":"x"}],
                "new_features":[],"removed_features":[],"behavioral_changes":[],"risk_level":"low","summary":"",
                "major_changes":[],"recommendations":[]}"#,
        );
        let request = CompareSpecsRequest { old_spec: "a".into(), new_spec: "b".into() };

        let err = analyzer(mock).compare_specs(&request).await.unwrap_err();
        assert_eq!(err.kind(), "analysis_contract_violation");
        assert!(!err.is_retryable());
    }

    proptest::proptest! {
        #[test]
        fn identical_inputs_yield_no_changes(text in ".{0,200}") {
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            let mut mock = MockAiProvider::new();
            mock.expect_chat().never();
            let analyzer = analyzer(mock);

            let code = runtime
                .block_on(analyzer.compare_code(&CompareCodeRequest::new(text.clone(), text.clone(), None)))
                .unwrap();
            proptest::prop_assert!(code.differences.is_empty());
            proptest::prop_assert!(code.security_findings.is_empty());

            let spec = runtime
                .block_on(analyzer.compare_specs(&CompareSpecsRequest { old_spec: text.clone(), new_spec: text }))
                .unwrap();
            proptest::prop_assert!(spec.differences.is_empty());
        }
    }
}
