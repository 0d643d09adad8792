#![cfg(unix)]

use std::path::Path;
use std::time::Duration;
use spectrace::errors::SpectraceError;
use spectrace::services::decompilation_orchestrator::DecompilationOrchestrator;
use crate::common::{decompiler_config, elf_payload, fake_tool, succeeding_tool};

fn scratch_is_empty(scratch: &Path) -> bool {
    std::fs::read_dir(scratch).unwrap().next().is_none()
}

#[tokio::test]
async fn successful_run_returns_code_and_metadata() {
    let tools = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let orchestrator =
        DecompilationOrchestrator::new(decompiler_config(scratch.path(), &succeeding_tool(tools.path()))).unwrap();

    let output = orchestrator
        .decompile(&elf_payload(), "blink.elf", Some("avr".to_string()))
        .await
        .unwrap();

    assert!(output.assembly_code.contains("ldi r24"));
    assert!(output.decompiled_code.contains("PORTB = 0x20"));
    assert_eq!(output.metadata.filename, "blink.elf");
    assert_eq!(output.metadata.file_size, 64);
    assert_eq!(output.metadata.program.as_deref(), Some("blink.elf"));
    assert_eq!(output.metadata.architecture_hint.as_deref(), Some("avr"));
    assert!(output.metadata.warnings.is_empty());
    assert!(scratch_is_empty(scratch.path()));
}

#[tokio::test]
async fn unrecognised_container_still_decompiles_with_a_warning() {
    let tools = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let orchestrator =
        DecompilationOrchestrator::new(decompiler_config(scratch.path(), &succeeding_tool(tools.path()))).unwrap();

    let output = orchestrator.decompile(b"\x0c\x94\x34\x00\x0c\x94", "blink.hex", None).await.unwrap();

    assert!(output.metadata.warnings.iter().any(|w| w.contains("not clearly identified")));
}

#[tokio::test]
async fn oversized_payload_never_starts_the_tool() {
    let tools = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let marker = tools.path().join("ran");
    let tool = fake_tool(tools.path(), &format!("touch '{}'", marker.display()));
    let orchestrator = DecompilationOrchestrator::new(decompiler_config(scratch.path(), &tool)).unwrap();

    let err = orchestrator.decompile(&vec![0u8; 2048], "big.bin", None).await.unwrap_err();

    assert!(matches!(err, SpectraceError::PayloadTooLarge { size: 2048, limit: 1024 }));
    assert_eq!(err.http_status(), 413);
    assert!(!marker.exists());
    assert!(scratch_is_empty(scratch.path()));
}

#[tokio::test]
async fn empty_payload_is_invalid_input() {
    let tools = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let orchestrator =
        DecompilationOrchestrator::new(decompiler_config(scratch.path(), &succeeding_tool(tools.path()))).unwrap();

    let err = orchestrator.decompile(b"", "fw.bin", None).await.unwrap_err();
    assert_eq!(err.kind(), "invalid_input");
}

#[tokio::test]
async fn importer_rejection_is_unsupported_format() {
    let tools = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let tool = fake_tool(
        tools.path(),
        "echo 'ERROR No load spec found for import file: fw.bin' >&2\nexit 1",
    );
    let orchestrator = DecompilationOrchestrator::new(decompiler_config(scratch.path(), &tool)).unwrap();

    let err = orchestrator.decompile(&elf_payload(), "fw.bin", None).await.unwrap_err();

    match err {
        SpectraceError::UnsupportedFormat { filename, reason } => {
            assert_eq!(filename, "fw.bin");
            assert!(reason.contains("No load spec found"));
        }
        other => panic!("expected unsupported_format, got {other:?}"),
    }
    assert!(scratch_is_empty(scratch.path()));
}

#[tokio::test]
async fn crash_is_tool_failure_with_stderr_excerpt() {
    let tools = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let tool = fake_tool(tools.path(), "echo 'java.lang.OutOfMemoryError: Java heap space' >&2\nexit 3");
    let orchestrator = DecompilationOrchestrator::new(decompiler_config(scratch.path(), &tool)).unwrap();

    let err = orchestrator.decompile(&elf_payload(), "fw.bin", None).await.unwrap_err();

    match err {
        SpectraceError::ToolFailure { exit_code, reason, .. } => {
            assert_eq!(exit_code, Some(3));
            assert!(reason.contains("OutOfMemoryError"));
        }
        other => panic!("expected tool_failure, got {other:?}"),
    }
    assert!(scratch_is_empty(scratch.path()));
}

#[tokio::test]
async fn blank_output_is_empty_result() {
    let tools = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let tool = fake_tool(
        tools.path(),
        ": > \"$out/assembly_output.txt\"\nprintf '\\n  \\n' > \"$out/decompiled_output.txt\"",
    );
    let orchestrator = DecompilationOrchestrator::new(decompiler_config(scratch.path(), &tool)).unwrap();

    let err = orchestrator.decompile(&elf_payload(), "fw.bin", None).await.unwrap_err();
    assert_eq!(err.kind(), "empty_result");
}

#[tokio::test]
async fn timeout_kills_the_whole_process_tree() {
    let tools = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let pid_file = tools.path().join("grandchild.pid");
    let tool = fake_tool(
        tools.path(),
        &format!("sleep 60 &\necho $! > '{}'\nwait", pid_file.display()),
    );
    let mut config = decompiler_config(scratch.path(), &tool);
    config.timeout_secs = 1;
    let orchestrator = DecompilationOrchestrator::new(config).unwrap();

    let started = std::time::Instant::now();
    let err = orchestrator.decompile(&elf_payload(), "slow.bin", None).await.unwrap_err();

    assert!(matches!(err, SpectraceError::DecompilationTimeout { timeout_secs: 1, .. }));
    assert_eq!(err.http_status(), 504);
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(scratch_is_empty(scratch.path()));

    #[cfg(target_os = "linux")]
    {
        let pid = std::fs::read_to_string(&pid_file).unwrap().trim().to_string();
        assert!(wait_until_dead(&pid).await, "grandchild {pid} survived the timeout");
    }
}

#[cfg(target_os = "linux")]
async fn wait_until_dead(pid: &str) -> bool {
    for _ in 0..40 {
        match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
            Err(_) => return true,
            Ok(stat) => {
                // Field 3 is the state; a zombie has already exited.
                let state = stat.rsplit(')').next().and_then(|rest| rest.split_whitespace().next());
                if state == Some("Z") || state == Some("X") {
                    return true;
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn requests_beyond_capacity_are_rejected_as_overloaded() {
    let tools = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let tool = fake_tool(tools.path(), "sleep 3");
    let mut config = decompiler_config(scratch.path(), &tool);
    config.max_concurrent = 1;
    config.queue_wait_secs = 1;
    let orchestrator = std::sync::Arc::new(DecompilationOrchestrator::new(config).unwrap());

    let busy = {
        let orchestrator = std::sync::Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.decompile(&elf_payload(), "first.bin", None).await })
    };
    tokio::time::sleep(Duration::from_millis(300)).await;

    let err = orchestrator.decompile(&elf_payload(), "second.bin", None).await.unwrap_err();
    assert_eq!(err.kind(), "overloaded");
    assert!(err.is_retryable());
    assert_eq!(err.retry_after_secs(), Some(1));

    busy.abort();
}
