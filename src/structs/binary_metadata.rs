use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::enums::binary_format::BinaryFormat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryMetadata {
    pub filename: String,
    pub original_filename: String,
    pub file_size: u64,
    pub format: BinaryFormat,
    #[serde(default)]
    pub architecture_hint: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub compiler: Option<String>,
    #[serde(default)]
    pub architecture: Option<String>,
    #[serde(default)]
    pub address_size: Option<String>,
    /// Any further keys the extraction script reported.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
    pub analysis_time_ms: u64,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl BinaryMetadata {
    pub fn new(filename: String, original_filename: String, file_size: u64, format: BinaryFormat) -> Self {
        Self {
            filename,
            original_filename,
            file_size,
            format,
            architecture_hint: None,
            program: None,
            language: None,
            compiler: None,
            architecture: None,
            address_size: None,
            extra: BTreeMap::new(),
            analysis_time_ms: 0,
            warnings: Vec::new(),
        }
    }

    /// Folds `Key: value` pairs from the tool into typed fields; unknown keys land in `extra`.
    pub fn absorb(&mut self, reported: BTreeMap<String, String>) {
        for (key, value) in reported {
            match key.as_str() {
                "program" => self.program = Some(value),
                "language" => self.language = Some(value),
                "compiler" => self.compiler = Some(value),
                "architecture" => self.architecture = Some(value),
                "address_size" => self.address_size = Some(value),
                _ => {
                    self.extra.insert(key, value);
                }
            }
        }
    }
}
