use crate::enums::code_artifact::CodeArtifact;

#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub old_code: CodeArtifact,
    pub new_code: CodeArtifact,
    pub old_spec: String,
    pub new_spec: String,
    pub firmware_type: Option<String>,
    pub architecture_hint: Option<String>,
}
