use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;
use crate::config::constants::{
    WORKSPACE_INPUT_DIR, WORKSPACE_OUTPUT_DIR, WORKSPACE_PREFIX, WORKSPACE_PROJECT_DIR,
};
use crate::errors::{SpectraceError, SpectraceResult};

const MAX_ACQUIRE_ATTEMPTS: usize = 3;

/// One job's scratch directory. Deleted on `release`, or on drop as a fallback.
#[derive(Debug)]
pub struct Workspace {
    id: Uuid,
    path: PathBuf,
    released: bool,
}

impl Workspace {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn input_dir(&self) -> PathBuf {
        self.path.join(WORKSPACE_INPUT_DIR)
    }

    pub fn project_dir(&self) -> PathBuf {
        self.path.join(WORKSPACE_PROJECT_DIR)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.path.join(WORKSPACE_OUTPUT_DIR)
    }

    /// Joins a relative path onto the workspace, refusing anything that could step outside it.
    pub fn resolve(&self, relative: &str) -> SpectraceResult<PathBuf> {
        let candidate = Path::new(relative);
        if relative.is_empty() || relative.contains('\0') {
            return Err(SpectraceError::invalid_input("path", "empty path or null byte"));
        }

        for component in candidate.components() {
            match component {
                Component::Normal(_) => {}
                Component::ParentDir => {
                    return Err(SpectraceError::invalid_input("path", "parent directory reference"));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(SpectraceError::invalid_input("path", "absolute paths are not allowed"));
                }
                Component::CurDir => {
                    return Err(SpectraceError::invalid_input("path", "current directory reference"));
                }
            }
        }

        Ok(self.path.join(candidate))
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => log::debug!("🧹 Workspace {} removed on drop", self.id),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::warn!("⚠️ Failed to remove workspace {}: {}", self.path.display(), e),
        }
    }
}

pub struct WorkspaceManager {
    root: PathBuf,
}

impl WorkspaceManager {
    pub fn new(root: &Path) -> SpectraceResult<Self> {
        std::fs::create_dir_all(root).map_err(|e| {
            SpectraceError::config_error(
                &format!("Cannot create scratch root {}: {}", root.display(), e),
                Some("decompiler.scratch_root"),
                None,
            )
        })?;
        let root = root.canonicalize()?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn acquire(&self) -> SpectraceResult<Workspace> {
        for _ in 0..MAX_ACQUIRE_ATTEMPTS {
            let id = Uuid::new_v4();
            let path = self.root.join(format!("{}{}", WORKSPACE_PREFIX, id));

            if path.parent() != Some(self.root.as_path()) {
                return Err(SpectraceError::system_error(
                    "workspace acquire",
                    "workspace path escaped the scratch root",
                ));
            }

            // create_dir, not create_dir_all: an existing directory must never be reused.
            match tokio::fs::create_dir(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    log::warn!("⚠️ Workspace id collision on {}, retrying", id);
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            let workspace = Workspace { id, path, released: false };
            for dir in [workspace.input_dir(), workspace.project_dir(), workspace.output_dir()] {
                tokio::fs::create_dir(&dir).await?;
            }

            log::info!("📁 Acquired workspace {}", workspace.path.display());
            return Ok(workspace);
        }

        Err(SpectraceError::system_error(
            "workspace acquire",
            "could not allocate a unique workspace directory",
        ))
    }

    /// Deletes the workspace; a directory that is already gone counts as released.
    pub async fn release(&self, mut workspace: Workspace) -> SpectraceResult<()> {
        workspace.released = true;
        match tokio::fs::remove_dir_all(&workspace.path).await {
            Ok(()) => {
                log::info!("🧹 Released workspace {}", workspace.id);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SpectraceError::system_error(
                "workspace release",
                &format!("{}: {}", workspace.path.display(), e),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn concurrent_acquires_never_share_a_path() {
        let scratch = tempfile::tempdir().unwrap();
        let manager = std::sync::Arc::new(WorkspaceManager::new(scratch.path()).unwrap());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let manager = std::sync::Arc::clone(&manager);
                tokio::spawn(async move { manager.acquire().await.unwrap() })
            })
            .collect();

        let mut workspaces = Vec::new();
        for handle in handles {
            workspaces.push(handle.await.unwrap());
        }

        let paths: HashSet<_> = workspaces.iter().map(|w| w.path().to_path_buf()).collect();
        assert_eq!(paths.len(), 16);
        for workspace in &workspaces {
            assert_eq!(workspace.path().parent(), Some(manager.root()));
            assert!(workspace.output_dir().is_dir());
        }
    }

    #[tokio::test]
    async fn release_tolerates_missing_content() {
        let scratch = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(scratch.path()).unwrap();
        let workspace = manager.acquire().await.unwrap();
        let path = workspace.path().to_path_buf();

        std::fs::remove_dir_all(&path).unwrap();
        manager.release(workspace).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn dropped_workspace_is_deleted() {
        let scratch = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(scratch.path()).unwrap();
        let workspace = manager.acquire().await.unwrap();
        let path = workspace.path().to_path_buf();
        std::fs::write(workspace.input_dir().join("fw.bin"), b"\x7fELF").unwrap();

        drop(workspace);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn resolve_rejects_escapes() {
        let scratch = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(scratch.path()).unwrap();
        let workspace = manager.acquire().await.unwrap();

        assert!(workspace.resolve("input/fw.bin").is_ok());
        for bad in ["../escape", "/etc/passwd", "input/../../x", "", "./x", "a\0b"] {
            let err = workspace.resolve(bad).unwrap_err();
            assert_eq!(err.kind(), "invalid_input", "{bad:?} should be rejected");
        }
        manager.release(workspace).await.unwrap();
    }
}
