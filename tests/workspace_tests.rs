#![cfg(unix)]

use std::sync::Arc;
use std::time::Duration;
use spectrace::services::decompilation_orchestrator::DecompilationOrchestrator;
use crate::common::{decompiler_config, elf_payload, fake_tool, succeeding_tool};

fn workspace_count(scratch: &std::path::Path) -> usize {
    std::fs::read_dir(scratch).unwrap().count()
}

#[tokio::test]
async fn concurrent_jobs_use_disjoint_workspaces_and_clean_up() {
    let tools = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let mut config = decompiler_config(scratch.path(), &succeeding_tool(tools.path()));
    config.max_concurrent = 4;
    let orchestrator = Arc::new(DecompilationOrchestrator::new(config).unwrap());

    let jobs: Vec<_> = (0..4)
        .map(|i| {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move { orchestrator.decompile(&elf_payload(), &format!("fw{}.elf", i), None).await })
        })
        .collect();

    for job in jobs {
        let output = job.await.unwrap().unwrap();
        assert!(output.decompiled_code.contains("PORTB"));
    }
    assert_eq!(workspace_count(scratch.path()), 0);
}

#[tokio::test]
async fn cancelled_job_leaves_no_workspace_behind() {
    let tools = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let started = tools.path().join("started");
    let tool = fake_tool(tools.path(), &format!("touch '{}'\nsleep 30", started.display()));
    let orchestrator = Arc::new(DecompilationOrchestrator::new(decompiler_config(scratch.path(), &tool)).unwrap());

    let job = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.decompile(&elf_payload(), "fw.bin", None).await })
    };

    for _ in 0..50 {
        if started.exists() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(started.exists(), "fake tool never started");
    assert_eq!(workspace_count(scratch.path()), 1);

    job.abort();
    let _ = job.await;
    assert_eq!(workspace_count(scratch.path()), 0);
}

#[tokio::test]
async fn hostile_filenames_stay_inside_the_workspace() {
    let tools = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let orchestrator =
        DecompilationOrchestrator::new(decompiler_config(scratch.path(), &succeeding_tool(tools.path()))).unwrap();

    let output = orchestrator.decompile(&elf_payload(), "../../../etc/passwd", None).await.unwrap();

    assert_eq!(output.metadata.filename, "passwd");
    assert_eq!(output.metadata.original_filename, "../../../etc/passwd");
    assert!(!scratch.path().parent().unwrap().join("etc").exists());
    assert_eq!(workspace_count(scratch.path()), 0);
}
