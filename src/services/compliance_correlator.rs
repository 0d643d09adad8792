use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use chrono::Utc;
use crate::adapters::reasoning_adapter::ReasoningAdapter;
use crate::enums::compliance_status::ComplianceStatus;
use crate::enums::locator::Locator;
use crate::enums::mismatch_kind::MismatchKind;
use crate::enums::severity::Severity;
use crate::errors::{SpectraceError, SpectraceResult};
use crate::helpers::prompt_generator::generate_compliance_prompt;
use crate::prompts::compliance_prompt::COMPLIANCE_PROMPT;
use crate::services::response_parser::decode;
use crate::structs::change_record::ChangeRecord;
use crate::structs::code_analysis_result::CodeAnalysisResult;
use crate::structs::compliance_match::ComplianceMatch;
use crate::structs::compliance_metadata::ComplianceMetadata;
use crate::structs::compliance_mismatch::ComplianceMismatch;
use crate::structs::compliance_report::ComplianceReport;
use crate::structs::config::compliance_config::ComplianceConfig;
use crate::structs::record_reference::RecordReference;
use crate::structs::spec_analysis_result::SpecAnalysisResult;
use crate::structs::wire::correlation_payload::CorrelationPayload;

const CORRELATION_CONTRACT: &str = "compliance_correlation";
const UNCOVERED_SEVERITY: Severity = Severity::Medium;

/// `matched / (matched + unmatched)`, and 1.0 when there is nothing to compare.
pub fn compliance_score(matched: usize, unmatched: usize) -> f64 {
    let total = matched + unmatched;
    if total == 0 {
        return 1.0;
    }
    matched as f64 / total as f64
}

pub fn derive_status(score: f64, mismatches: &[ComplianceMismatch], config: &ComplianceConfig) -> ComplianceStatus {
    let blocked = mismatches.iter().any(|m| m.severity >= config.blocking_severity);

    if score >= config.compliant_threshold && !blocked {
        ComplianceStatus::Compliant
    } else if score >= config.partial_threshold {
        ComplianceStatus::PartiallyCompliant
    } else {
        ComplianceStatus::NonCompliant
    }
}

/// Id-to-record lookup for one side of the correlation.
struct RecordIndex {
    prefix: char,
    refs: Vec<RecordReference>,
    by_id: HashMap<String, usize>,
}

impl RecordIndex {
    fn new(prefix: char, records: &[ChangeRecord]) -> Self {
        let refs: Vec<RecordReference> = records
            .iter()
            .enumerate()
            .map(|(index, record)| RecordReference {
                id: format!("{}{}", prefix, index + 1),
                index,
                locator: record.locator.clone(),
            })
            .collect();
        let by_id = refs.iter().map(|r| (r.id.clone(), r.index)).collect();
        Self { prefix, refs, by_id }
    }

    fn side(&self) -> &'static str {
        if self.prefix == 'C' { "code" } else { "spec" }
    }

    /// `None` means absent; `Some(Err)` means present but unresolvable.
    fn lookup(&self, raw: Option<&str>) -> Option<Result<RecordReference, SpectraceError>> {
        let raw = raw.map(str::trim).filter(|r| !r.is_empty() && !r.eq_ignore_ascii_case("null"))?;
        let id = raw.to_ascii_uppercase();
        Some(
            self.by_id
                .get(&id)
                .map(|&index| self.refs[index].clone())
                .ok_or_else(|| SpectraceError::unresolved_reference(raw, self.side())),
        )
    }

    fn len(&self) -> usize {
        self.refs.len()
    }
}

pub struct ComplianceCorrelator {
    adapter: Arc<ReasoningAdapter>,
    config: ComplianceConfig,
}

impl ComplianceCorrelator {
    pub fn new(adapter: Arc<ReasoningAdapter>, config: ComplianceConfig) -> Self {
        Self { adapter, config }
    }

    pub async fn correlate(&self, code: &CodeAnalysisResult, spec: &SpecAnalysisResult) -> SpectraceResult<ComplianceReport> {
        let started = Instant::now();
        Self::check_inputs(code, spec)?;

        let code_index = RecordIndex::new('C', &code.differences);
        let spec_index = RecordIndex::new('S', &spec.differences);
        let mut metadata = ComplianceMetadata {
            total_code_changes: code_index.len(),
            total_spec_changes: spec_index.len(),
            analyzed_at: Some(Utc::now()),
            ..ComplianceMetadata::default()
        };

        if code_index.len() == 0 && spec_index.len() == 0 {
            log::info!("🟰 Neither side reports changes, vacuously compliant");
            return Ok(self.build_report(
                Vec::new(),
                Vec::new(),
                "Neither the code nor the specification changed.".to_string(),
                Vec::new(),
                metadata,
                started,
            ));
        }

        if code_index.len() == 0 || spec_index.len() == 0 {
            let mismatches = Self::uncovered(&code_index, &spec_index, &HashSet::new(), &HashSet::new());
            metadata.synthesized_mismatches = mismatches.len();
            let summary = if code_index.len() == 0 {
                format!("The specification declares {} change(s) but the code is unchanged.", spec_index.len())
            } else {
                format!("The code has {} change(s) but the specification is unchanged.", code_index.len())
            };
            log::info!("⚖️ One-sided change set, {} unmatched record(s)", mismatches.len());
            return Ok(self.build_report(Vec::new(), mismatches, summary, Vec::new(), metadata, started));
        }

        let user_prompt = generate_compliance_prompt(code, spec);
        let reply = self.adapter.complete("compliance validation", COMPLIANCE_PROMPT, &user_prompt).await?;
        let payload: CorrelationPayload = decode(CORRELATION_CONTRACT, &reply.content)?;
        metadata.service_consulted = true;
        metadata.provider = Some(self.adapter.provider_name());
        metadata.model = Some(self.adapter.model());

        let mut covered_code = HashSet::new();
        let mut covered_spec = HashSet::new();
        let mut seen_pairs = HashSet::new();
        let mut matches = Vec::new();
        let mut dropped = Vec::new();

        for entry in payload.matches {
            let code_ref = code_index.lookup(Some(&entry.code_ref));
            let spec_ref = spec_index.lookup(Some(&entry.spec_ref));
            let (code_ref, spec_ref) = match (code_ref, spec_ref) {
                (Some(Ok(c)), Some(Ok(s))) => (c, s),
                (c, s) => {
                    let placeholder = Self::dropped_entry("match", c, s);
                    Self::cover(&placeholder, &mut covered_code, &mut covered_spec);
                    dropped.push(placeholder);
                    continue;
                }
            };
            if !seen_pairs.insert((code_ref.index, spec_ref.index)) {
                continue;
            }
            covered_code.insert(code_ref.index);
            covered_spec.insert(spec_ref.index);
            matches.push(ComplianceMatch { description: entry.description, code_reference: code_ref, spec_reference: spec_ref });
        }

        let mut seen_mismatches = HashSet::new();
        let mut mismatches = Vec::new();

        for entry in payload.mismatches {
            let code_ref = code_index.lookup(entry.code_ref.as_deref());
            let spec_ref = spec_index.lookup(entry.spec_ref.as_deref());

            let (code_ref, spec_ref) = match (entry.kind.needs_code_reference(), entry.kind.needs_spec_reference(), code_ref, spec_ref) {
                (true, false, Some(Ok(c)), None) => (Some(c), None),
                (false, true, None, Some(Ok(s))) => (None, Some(s)),
                (true, true, Some(Ok(c)), Some(Ok(s))) => (Some(c), Some(s)),
                (_, _, c, s) => {
                    let placeholder = Self::dropped_entry(&format!("{:?} mismatch", entry.kind), c, s);
                    Self::cover(&placeholder, &mut covered_code, &mut covered_spec);
                    dropped.push(placeholder);
                    continue;
                }
            };

            let key = (
                entry.kind,
                code_ref.as_ref().map(|r| r.index),
                spec_ref.as_ref().map(|r| r.index),
            );
            if !seen_mismatches.insert(key) {
                continue;
            }
            let mismatch = ComplianceMismatch {
                kind: entry.kind,
                description: entry.description,
                code_reference: code_ref,
                spec_reference: spec_ref,
                severity: entry.severity,
                synthesized: false,
            };
            Self::cover(&mismatch, &mut covered_code, &mut covered_spec);
            mismatches.push(mismatch);
        }

        let uncovered = Self::uncovered(&code_index, &spec_index, &covered_code, &covered_spec);
        if !uncovered.is_empty() {
            log::warn!("⚠️ {} record(s) left uncovered by the correlation, counting as unmatched", uncovered.len());
        }
        metadata.dropped_entries = dropped.len();
        metadata.synthesized_mismatches = dropped.len() + uncovered.len();
        mismatches.extend(dropped);
        mismatches.extend(uncovered);

        Ok(self.build_report(matches, mismatches, payload.summary, payload.recommendations, metadata, started))
    }

    fn build_report(
        &self,
        matches: Vec<ComplianceMatch>,
        mismatches: Vec<ComplianceMismatch>,
        summary: String,
        recommendations: Vec<String>,
        mut metadata: ComplianceMetadata,
        started: Instant,
    ) -> ComplianceReport {
        let score = compliance_score(matches.len(), mismatches.len());
        let status = derive_status(score, &mismatches, &self.config);
        metadata.matched_count = matches.len();
        metadata.unmatched_count = mismatches.len();
        metadata.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        log::info!(
            "✅ Compliance {:?}: score {:.2} ({} matched, {} unmatched, {} dropped)",
            status,
            score,
            metadata.matched_count,
            metadata.unmatched_count,
            metadata.dropped_entries
        );

        ComplianceReport {
            compliance_status: status,
            compliance_score: score,
            matches,
            mismatches,
            summary,
            recommendations,
            metadata,
        }
    }

    fn uncovered(
        code: &RecordIndex,
        spec: &RecordIndex,
        covered_code: &HashSet<usize>,
        covered_spec: &HashSet<usize>,
    ) -> Vec<ComplianceMismatch> {
        let code_side = code.refs.iter().filter(|r| !covered_code.contains(&r.index)).map(|r| ComplianceMismatch {
            kind: MismatchKind::MissingInSpec,
            description: format!("Code change {} at {} has no counterpart in the specification", r.id, r.locator),
            code_reference: Some(r.clone()),
            spec_reference: None,
            severity: UNCOVERED_SEVERITY,
            synthesized: true,
        });
        let spec_side = spec.refs.iter().filter(|r| !covered_spec.contains(&r.index)).map(|r| ComplianceMismatch {
            kind: MismatchKind::MissingInCode,
            description: format!("Specification change {} in {} is not reflected in the code", r.id, r.locator),
            code_reference: None,
            spec_reference: Some(r.clone()),
            severity: UNCOVERED_SEVERITY,
            synthesized: true,
        });
        code_side.chain(spec_side).collect()
    }

    fn cover(mismatch: &ComplianceMismatch, covered_code: &mut HashSet<usize>, covered_spec: &mut HashSet<usize>) {
        if let Some(r) = &mismatch.code_reference {
            covered_code.insert(r.index);
        }
        if let Some(r) = &mismatch.spec_reference {
            covered_spec.insert(r.index);
        }
    }

    /// An entry with unresolvable references is omitted but still counts as unmatched.
    /// The stand-in keeps only the references that resolved.
    fn dropped_entry(
        what: &str,
        code: Option<Result<RecordReference, SpectraceError>>,
        spec: Option<Result<RecordReference, SpectraceError>>,
    ) -> ComplianceMismatch {
        let mut reasons = Vec::new();
        let mut keep = |r: Option<Result<RecordReference, SpectraceError>>| match r {
            Some(Ok(r)) => Some(r),
            Some(Err(e)) => {
                reasons.push(e.user_message());
                None
            }
            None => None,
        };
        let code_reference = keep(code);
        let spec_reference = keep(spec);
        if reasons.is_empty() {
            reasons.push("references do not fit the entry type".to_string());
        }
        log::warn!("⚠️ Dropping {} with unresolved_reference: {}", what, reasons.join("; "));

        let kind = match (&code_reference, &spec_reference) {
            (Some(_), Some(_)) => MismatchKind::Inconsistent,
            (Some(_), None) => MismatchKind::MissingInSpec,
            (None, Some(_)) => MismatchKind::MissingInCode,
            (None, None) => MismatchKind::Unresolved,
        };

        ComplianceMismatch {
            kind,
            description: format!("Correlation {} could not be verified: {}", what, reasons.join("; ")),
            code_reference,
            spec_reference,
            severity: UNCOVERED_SEVERITY,
            synthesized: true,
        }
    }

    fn check_inputs(code: &CodeAnalysisResult, spec: &SpecAnalysisResult) -> SpectraceResult<()> {
        for (index, record) in code.differences.iter().enumerate() {
            let field = format!("code_analysis.differences[{}]", index);
            record.check().map_err(|reason| SpectraceError::invalid_input(&field, &reason))?;
            if !matches!(record.locator, Locator::Line(_)) {
                return Err(SpectraceError::invalid_input(&field, "code changes must be located by line"));
            }
        }
        for (index, record) in spec.differences.iter().enumerate() {
            let field = format!("spec_analysis.differences[{}]", index);
            record.check().map_err(|reason| SpectraceError::invalid_input(&field, &reason))?;
            if !matches!(record.locator, Locator::Section(_)) {
                return Err(SpectraceError::invalid_input(&field, "specification changes must be located by section"));
            }
        }
        Ok(())
    }
}
