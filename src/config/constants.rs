use std::time::Duration;

pub const SERVICE_NAME: &str = "Spectrace API";
pub const API_PREFIX: &str = "api";
pub const API_VERSION: &str = "v1";

pub const CONFIG_DIR_NAME: &str = "spectrace";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const WORKSPACE_PREFIX: &str = "job-";
pub const WORKSPACE_INPUT_DIR: &str = "input";
pub const WORKSPACE_PROJECT_DIR: &str = "project";
pub const WORKSPACE_OUTPUT_DIR: &str = "output";

pub const DECOMPILE_SCRIPT_NAME: &str = "DecompileAll.java";
pub const ASSEMBLY_OUTPUT_FILE: &str = "assembly_output.txt";
pub const DECOMPILED_OUTPUT_FILE: &str = "decompiled_output.txt";
pub const METADATA_OUTPUT_FILE: &str = "metadata_output.txt";

pub const MAX_FILENAME_LENGTH: usize = 128;
pub const FALLBACK_FILENAME: &str = "firmware.bin";

/// Extra room on top of the payload ceiling for multipart framing and text fields.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Output fragments that mean the importer refused the binary rather than crashed.
pub const UNSUPPORTED_FORMAT_MARKERS: &[&str] = &[
    "No load spec found",
    "unsupported",
    "unknown format",
    "ImportException",
    "Failed to import",
];

pub const STDERR_EXCERPT_CHARS: usize = 800;
pub const STREAM_DRAIN_GRACE_MS: u64 = 500;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const UNIDENTIFIED_FORMAT_WARNING: &str = "format not clearly identified";

pub fn duration_millis(milliseconds: u64) -> Duration {
    Duration::from_millis(milliseconds)
}
