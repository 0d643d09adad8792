use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use crate::config::constants::{
    duration_millis, ASSEMBLY_OUTPUT_FILE, DECOMPILED_OUTPUT_FILE, DECOMPILE_SCRIPT_NAME,
    FALLBACK_FILENAME, MAX_FILENAME_LENGTH, METADATA_OUTPUT_FILE, STDERR_EXCERPT_CHARS,
    STREAM_DRAIN_GRACE_MS, UNIDENTIFIED_FORMAT_WARNING, UNSUPPORTED_FORMAT_MARKERS,
    WORKSPACE_INPUT_DIR,
};
use crate::constants::decompile_script::DECOMPILE_SCRIPT;
use crate::enums::binary_format::BinaryFormat;
use crate::enums::job_status::JobStatus;
use crate::errors::{SpectraceError, SpectraceResult};
use crate::services::workspace_manager::{Workspace, WorkspaceManager};
use crate::structs::binary_metadata::BinaryMetadata;
use crate::structs::config::decompiler_config::DecompilerConfig;
use crate::structs::decompilation_job::DecompilationJob;
use crate::structs::decompilation_output::DecompilationOutput;

/// Drives the headless decompiler, one workspace and one subprocess per call.
pub struct DecompilationOrchestrator {
    config: DecompilerConfig,
    workspaces: WorkspaceManager,
    permits: Arc<Semaphore>,
}

struct ToolRun {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

impl DecompilationOrchestrator {
    pub fn new(config: DecompilerConfig) -> SpectraceResult<Self> {
        let workspaces = WorkspaceManager::new(&config.scratch_root)?;
        let permits = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
        Ok(Self { config, workspaces, permits })
    }

    pub fn max_payload_bytes(&self) -> u64 {
        self.config.max_payload_bytes
    }

    pub fn max_concurrent(&self) -> usize {
        self.config.max_concurrent.max(1)
    }

    pub fn scratch_root(&self) -> &Path {
        self.workspaces.root()
    }

    pub async fn decompile(
        &self,
        payload: &[u8],
        filename: &str,
        architecture_hint: Option<String>,
    ) -> SpectraceResult<DecompilationOutput> {
        self.check_payload(payload)?;
        let safe_name = sanitize_filename(filename)?;
        let _permit = self.admit().await?;

        let workspace = self.workspaces.acquire().await?;
        let result = self
            .run_job(&workspace, payload, filename, &safe_name, architecture_hint)
            .await;

        if let Err(e) = self.workspaces.release(workspace).await {
            log::warn!("⚠️ {}", e);
        }
        result
    }

    fn check_payload(&self, payload: &[u8]) -> SpectraceResult<()> {
        if payload.is_empty() {
            return Err(SpectraceError::invalid_input("file", "binary payload is empty"));
        }
        let size = payload.len() as u64;
        if size > self.config.max_payload_bytes {
            return Err(SpectraceError::PayloadTooLarge {
                size,
                limit: self.config.max_payload_bytes,
            });
        }
        Ok(())
    }

    async fn admit(&self) -> SpectraceResult<OwnedSemaphorePermit> {
        let overloaded = || SpectraceError::Overloaded {
            resource: "decompiler".to_string(),
            retry_after_secs: self.config.queue_wait_secs.max(1),
        };

        if self.config.queue_wait_secs == 0 {
            return Arc::clone(&self.permits).try_acquire_owned().map_err(|_| overloaded());
        }

        match timeout(self.config.queue_wait(), Arc::clone(&self.permits).acquire_owned()).await {
            Ok(Ok(permit)) => Ok(permit),
            Ok(Err(_)) => Err(SpectraceError::system_error("decompiler admission", "semaphore closed")),
            Err(_) => {
                log::warn!("🚦 Decompiler at capacity, rejecting after {}s in queue", self.config.queue_wait_secs);
                Err(overloaded())
            }
        }
    }

    async fn run_job(
        &self,
        workspace: &Workspace,
        payload: &[u8],
        original_name: &str,
        safe_name: &str,
        architecture_hint: Option<String>,
    ) -> SpectraceResult<DecompilationOutput> {
        let format = BinaryFormat::sniff(payload);
        let binary_path = workspace.resolve(&format!("{}/{}", WORKSPACE_INPUT_DIR, safe_name))?;
        tokio::fs::write(&binary_path, payload).await?;
        tokio::fs::write(workspace.path().join(DECOMPILE_SCRIPT_NAME), DECOMPILE_SCRIPT).await?;

        let mut job = DecompilationJob::new(workspace.id(), safe_name.to_string(), format, binary_path);
        job.transition(JobStatus::Running);
        log::info!("🔧 Decompiling '{}' ({} bytes, {:?})", safe_name, payload.len(), format);

        let run = match self.run_tool(workspace, &job.binary_path, safe_name).await {
            Ok(run) => run,
            Err(e) => {
                job.transition(if matches!(e, SpectraceError::DecompilationTimeout { .. }) {
                    JobStatus::TimedOut
                } else {
                    JobStatus::Failed
                });
                return Err(e);
            }
        };

        let output_dir = workspace.output_dir();
        let assembly = read_output(&output_dir.join(ASSEMBLY_OUTPUT_FILE)).await?;
        let decompiled = read_output(&output_dir.join(DECOMPILED_OUTPUT_FILE)).await?;
        let tool_log = format!("{}\n{}", run.stdout, run.stderr);

        if let Err(e) = classify_outcome(
            safe_name,
            run.status.code(),
            run.status.success(),
            &tool_log,
            &run.stderr,
            assembly.as_deref(),
            decompiled.as_deref(),
        ) {
            job.transition(JobStatus::Failed);
            log::error!("❌ Decompilation of '{}' failed: {}", safe_name, e.kind());
            return Err(e);
        }

        let assembly_code = assembly.unwrap_or_default();
        let decompiled_code = decompiled.unwrap_or_default();
        let reported = read_output(&output_dir.join(METADATA_OUTPUT_FILE))
            .await?
            .map(|text| parse_metadata(&text))
            .unwrap_or_default();

        let mut metadata = BinaryMetadata::new(
            safe_name.to_string(),
            original_name.to_string(),
            payload.len() as u64,
            format,
        );
        metadata.architecture_hint = architecture_hint;
        metadata.absorb(reported);
        if format == BinaryFormat::Unknown {
            metadata.warnings.push(UNIDENTIFIED_FORMAT_WARNING.to_string());
        }
        if decompiled_code.trim().is_empty() {
            metadata.warnings.push("no high-level source was produced; assembly only".to_string());
        }
        metadata.analysis_time_ms = job.elapsed_ms();

        job.transition(JobStatus::Succeeded);
        log::info!("✅ Decompiled '{}' in {}ms", safe_name, metadata.analysis_time_ms);

        Ok(DecompilationOutput { assembly_code, decompiled_code, metadata })
    }

    fn build_command(&self, workspace: &Workspace, binary_path: &Path) -> Command {
        let mut command = Command::new(&self.config.headless_path);
        command
            .arg(workspace.project_dir())
            .arg(&self.config.project_name)
            .arg("-import")
            .arg(binary_path)
            .arg("-scriptPath")
            .arg(workspace.path())
            .arg("-postScript")
            .arg(DECOMPILE_SCRIPT_NAME)
            .arg(workspace.output_dir())
            .arg("-deleteProject")
            .current_dir(workspace.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(java_home) = &self.config.java_home {
            command.env("JAVA_HOME", java_home);
            let mut paths = vec![java_home.join("bin")];
            if let Some(existing) = std::env::var_os("PATH") {
                paths.extend(std::env::split_paths(&existing));
            }
            if let Ok(joined) = std::env::join_paths(paths) {
                command.env("PATH", joined);
            }
        }

        #[cfg(unix)]
        command.process_group(0);

        command
    }

    async fn run_tool(&self, workspace: &Workspace, binary_path: &Path, filename: &str) -> SpectraceResult<ToolRun> {
        let mut child = self.build_command(workspace, binary_path).spawn().map_err(|e| {
            SpectraceError::tool_failure(
                "launch",
                None,
                &format!("could not start {}: {}", self.config.headless_path.display(), e),
            )
        })?;
        let mut group = ProcessGroupGuard::new(child.id());
        log::debug!("🚀 Decompiler started (pid {:?})", child.id());

        let stdout_task = drain(child.stdout.take());
        let stderr_task = drain(child.stderr.take());

        match timeout(self.config.timeout(), child.wait()).await {
            Ok(Ok(status)) => {
                // Reap anything the tool left behind in its group before collecting output.
                group.kill();
                let stdout = collect(stdout_task).await;
                let stderr = collect(stderr_task).await;
                log::debug!("🏁 Decompiler exited with {:?}", status.code());
                Ok(ToolRun { status, stdout, stderr })
            }
            Ok(Err(e)) => {
                group.kill();
                stdout_task.abort();
                stderr_task.abort();
                Err(SpectraceError::tool_failure("supervision", None, &e.to_string()))
            }
            Err(_) => {
                log::warn!("⏰ Decompiler exceeded {}s, killing process group", self.config.timeout_secs);
                group.kill();
                if let Err(e) = child.start_kill() {
                    log::debug!("start_kill after group kill: {}", e);
                }
                if timeout(self.config.kill_grace(), child.wait()).await.is_err() {
                    log::error!("❌ Decompiler did not exit within the kill grace period");
                }
                stdout_task.abort();
                stderr_task.abort();
                Err(SpectraceError::DecompilationTimeout {
                    filename: filename.to_string(),
                    timeout_secs: self.config.timeout_secs,
                })
            }
        }
    }
}

/// Kills the whole process group exactly once, at the latest when dropped.
struct ProcessGroupGuard {
    pgid: Option<i32>,
}

impl ProcessGroupGuard {
    fn new(pid: Option<u32>) -> Self {
        Self { pgid: pid.and_then(|p| i32::try_from(p).ok()) }
    }

    fn kill(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            kill_process_group(pgid);
        }
    }
}

impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(unix)]
fn kill_process_group(pgid: i32) {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        Ok(()) => log::debug!("💀 Killed process group {}", pgid),
        Err(Errno::ESRCH) => {}
        Err(e) => log::warn!("⚠️ Failed to kill process group {}: {}", pgid, e),
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pgid: i32) {}

fn drain<R>(reader: Option<R>) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut reader) = reader {
            if let Err(e) = reader.read_to_end(&mut buf).await {
                log::debug!("pipe read ended early: {}", e);
            }
        }
        buf
    })
}

async fn collect(task: JoinHandle<Vec<u8>>) -> String {
    match timeout(duration_millis(STREAM_DRAIN_GRACE_MS), task).await {
        Ok(Ok(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
        Ok(Err(_)) => String::new(),
        Err(_) => {
            log::debug!("pipe still open after exit, dropping remaining output");
            String::new()
        }
    }
}

async fn read_output(path: &Path) -> SpectraceResult<Option<String>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Reduces an uploaded name to a single safe path component.
pub fn sanitize_filename(name: &str) -> SpectraceResult<String> {
    if name.contains('\0') {
        return Err(SpectraceError::invalid_input("filename", "filename contains a null byte"));
    }

    let last = name.rsplit(&['/', '\\'][..]).next().unwrap_or_default().trim();
    let cleaned: String = last
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .take(MAX_FILENAME_LENGTH)
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return Ok(FALLBACK_FILENAME.to_string());
    }
    Ok(cleaned)
}

/// `Key Name: value` lines to a snake_case map.
pub fn parse_metadata(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| {
            let key = key.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join("_");
            (key, value.trim().to_string())
        })
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .collect()
}

fn classify_outcome(
    filename: &str,
    exit_code: Option<i32>,
    succeeded: bool,
    tool_log: &str,
    stderr: &str,
    assembly: Option<&str>,
    decompiled: Option<&str>,
) -> SpectraceResult<()> {
    let outputs_present = assembly.is_some() && decompiled.is_some();

    if !succeeded || !outputs_present {
        if let Some(line) = unsupported_marker_line(tool_log) {
            return Err(SpectraceError::UnsupportedFormat {
                filename: filename.to_string(),
                reason: line,
            });
        }

        let reason = if succeeded {
            "expected output files were not produced".to_string()
        } else {
            let excerpt = tail(if stderr.trim().is_empty() { tool_log } else { stderr }, STDERR_EXCERPT_CHARS);
            if excerpt.is_empty() { "no diagnostic output".to_string() } else { excerpt }
        };
        let stage = if succeeded { "output collection" } else { "analysis" };
        return Err(SpectraceError::tool_failure(stage, exit_code, &reason));
    }

    let blank = |text: Option<&str>| text.map_or(true, |t| t.trim().is_empty());
    if blank(assembly) && blank(decompiled) {
        return Err(SpectraceError::EmptyResult { filename: filename.to_string() });
    }
    Ok(())
}

fn unsupported_marker_line(tool_log: &str) -> Option<String> {
    tool_log
        .lines()
        .find(|line| {
            let lower = line.to_lowercase();
            UNSUPPORTED_FORMAT_MARKERS.iter().any(|marker| lower.contains(&marker.to_lowercase()))
        })
        .map(|line| line.trim().to_string())
}

fn tail(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    let count = trimmed.chars().count();
    if count <= max_chars {
        return trimmed.to_string();
    }
    trimmed.chars().skip(count - max_chars).collect()
}
