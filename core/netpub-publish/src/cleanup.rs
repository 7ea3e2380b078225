//! Best-effort removal of intermediate artifacts.

use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

/// Files and folders to delete once a run ends. Nothing is deleted in
/// verbose mode, so the artifacts can be inspected.
#[derive(Debug, Default)]
pub struct Cleanup {
    verbose: bool,
    files: Vec<PathBuf>,
    folders: Vec<PathBuf>,
}

impl Cleanup {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Default::default()
        }
    }

    pub fn file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.files.push(path.into());
        self
    }

    pub fn folder(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.folders.push(path.into());
        self
    }

    /// Never fails; problems are logged at debug level.
    pub fn run(&self) {
        if self.verbose {
            debug!("Keeping intermediate files");
            return;
        }
        for file in &self.files {
            match std::fs::remove_file(file) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => debug!("Failed to delete {}: {e}", file.display()),
            }
        }
        for folder in &self.folders {
            if let Err(e) = std::fs::remove_dir_all(folder) {
                if e.kind() != ErrorKind::NotFound {
                    debug!("Failed to delete {}: {e}", folder.display());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifacts(dir: &std::path::Path) -> (PathBuf, PathBuf) {
        let file = dir.join("server.json");
        let folder = dir.join("NDSupportingFiles");
        std::fs::write(&file, "{}").unwrap();
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join("ToolInfo.json"), "{}").unwrap();
        (file, folder)
    }

    #[test]
    fn removes_files_and_folders() {
        let dir = tempfile::tempdir().unwrap();
        let (file, folder) = artifacts(dir.path());
        let mut cleanup = Cleanup::new(false);
        cleanup.file(&file).folder(&folder).file(dir.path().join("missing.json"));
        cleanup.run();
        assert!(!file.exists());
        assert!(!folder.exists());
    }

    #[test]
    fn verbose_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let (file, folder) = artifacts(dir.path());
        let mut cleanup = Cleanup::new(true);
        cleanup.file(&file).folder(&folder);
        cleanup.run();
        assert!(file.exists());
        assert!(folder.join("ToolInfo.json").exists());
    }
}
