use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ComplianceMetadata {
    pub total_code_changes: usize,
    pub total_spec_changes: usize,
    pub matched_count: usize,
    pub unmatched_count: usize,
    /// Entries from the service whose references did not resolve.
    pub dropped_entries: usize,
    pub synthesized_mismatches: usize,
    pub service_consulted: bool,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub duration_ms: u64,
    pub analyzed_at: Option<DateTime<Utc>>,
}
