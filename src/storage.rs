use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Filesystem layout for uploaded sources and per-job output directories.
#[derive(Debug, Clone)]
pub struct Storage {
    upload_dir: PathBuf,
    output_dir: PathBuf,
}

impl Storage {
    pub fn new(upload_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Create the upload and output directories if they do not exist yet.
    pub fn init(&self) -> Result<()> {
        std::fs::create_dir_all(&self.upload_dir)
            .with_context(|| format!("failed to create upload dir {}", self.upload_dir.display()))?;
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("failed to create output dir {}", self.output_dir.display()))?;

        info!(
            "Storage directories initialized: upload={}, output={}",
            self.upload_dir.display(),
            self.output_dir.display()
        );
        Ok(())
    }

    /// Where an uploaded source file with the given (already unique) name lives.
    pub fn upload_path(&self, file_name: &str) -> PathBuf {
        self.upload_dir.join(file_name)
    }

    /// Create (if needed) and return the output directory for one job.
    pub fn create_output_dir(&self, job_id: &str) -> Result<PathBuf> {
        let dir = self.output_dir.join(job_id);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create job output dir {}", dir.display()))?;
        Ok(dir)
    }

    /// Path of a produced artifact inside a job's output directory.
    pub fn output_path(&self, job_id: &str, file_name: &str) -> PathBuf {
        self.output_dir.join(job_id).join(file_name)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
