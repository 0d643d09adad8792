use std::path::PathBuf;
use std::time::Instant;
use uuid::Uuid;
use crate::enums::binary_format::BinaryFormat;
use crate::enums::job_status::JobStatus;

/// Bookkeeping for one decompilation attempt; lives exactly as long as its workspace.
#[derive(Debug)]
pub struct DecompilationJob {
    pub id: Uuid,
    pub filename: String,
    pub format: BinaryFormat,
    pub binary_path: PathBuf,
    pub status: JobStatus,
    started: Instant,
}

impl DecompilationJob {
    pub fn new(id: Uuid, filename: String, format: BinaryFormat, binary_path: PathBuf) -> Self {
        Self {
            id,
            filename,
            format,
            binary_path,
            status: JobStatus::Pending,
            started: Instant::now(),
        }
    }

    pub fn transition(&mut self, status: JobStatus) {
        if self.status.is_terminal() {
            log::warn!("⚠️ Job {} already finished as {:?}, ignoring {:?}", self.id, self.status, status);
            return;
        }
        log::debug!("🔄 Job {} {:?} -> {:?}", self.id, self.status, status);
        self.status = status;
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
