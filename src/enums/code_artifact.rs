/// One side of a code comparison in a pipeline run.
#[derive(Debug, Clone)]
pub enum CodeArtifact {
    Source(String),
    Binary { filename: String, payload: Vec<u8> },
}

impl CodeArtifact {
    pub fn is_binary(&self) -> bool {
        matches!(self, CodeArtifact::Binary { .. })
    }
}
