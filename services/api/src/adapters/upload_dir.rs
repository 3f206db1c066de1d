//! services/api/src/adapters/upload_dir.rs
//!
//! The on-disk upload directory. Created once at startup and shared by the
//! upload handler (writes) and the static file service (reads).

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// A validated handle to the directory that stores uploads.
#[derive(Clone, Debug)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    /// Creates the directory if it is absent. Safe to call on an existing directory.
    pub async fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let root = path.into();
        fs::create_dir_all(&root).await?;
        if !fs::metadata(&root).await?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} is not a directory", root.display()),
            ));
        }
        info!(path = %root.display(), "Upload directory ready");
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Opens a hidden staging file for `generated_name`. Nothing is visible under
    /// the final name until [`StagedUpload::commit`] succeeds.
    pub async fn stage(&self, generated_name: &str) -> io::Result<StagedUpload> {
        let final_path = self.root.join(generated_name);
        let part_path = self.root.join(format!(".{generated_name}.part"));
        let file = fs::File::create(&part_path).await?;
        Ok(StagedUpload {
            file: Some(file),
            part_path,
            final_path,
            written: 0,
            committed: false,
        })
    }
}

/// An in-progress upload. Dropping it without committing deletes the partial file.
#[derive(Debug)]
pub struct StagedUpload {
    file: Option<fs::File>,
    part_path: PathBuf,
    final_path: PathBuf,
    written: u64,
    committed: bool,
}

impl StagedUpload {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "staged upload already closed"))?;
        file.write_all(chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flushes the staged bytes and moves them to their final name.
    pub async fn commit(mut self) -> io::Result<PathBuf> {
        let mut file = self
            .file
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "staged upload already closed"))?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&self.part_path, &self.final_path).await?;
        self.committed = true;
        Ok(self.final_path.clone())
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        self.file.take();
        // Drop cannot await; unlinking one file is a single cheap syscall, so the
        // blocking call stays on the worker.
        if let Err(e) = std::fs::remove_file(&self.part_path) {
            warn!(path = %self.part_path.display(), "Failed to remove partial upload: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn entries(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        let mut read = fs::read_dir(dir).await.unwrap();
        while let Some(entry) = read.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names
    }

    #[tokio::test]
    async fn create_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/uploads");
        UploadDir::create(&path).await.unwrap();
        let dir = UploadDir::create(&path).await.unwrap();
        assert!(dir.path().is_dir());
    }

    #[tokio::test]
    async fn create_rejects_a_regular_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("not-a-dir");
        std::fs::write(&path, b"x").unwrap();
        assert!(UploadDir::create(&path).await.is_err());
    }

    #[tokio::test]
    async fn commit_moves_staged_bytes_into_place() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = UploadDir::create(tmp.path()).await.unwrap();

        let mut staged = dir.stage("1-abcdef.txt").await.unwrap();
        staged.write_chunk(b"hello ").await.unwrap();
        staged.write_chunk(b"world").await.unwrap();
        assert_eq!(staged.written(), 11);
        let path = staged.commit().await.unwrap();

        assert_eq!(fs::read(&path).await.unwrap(), b"hello world");
        assert_eq!(entries(tmp.path()).await, vec!["1-abcdef.txt".to_string()]);
    }

    #[tokio::test]
    async fn dropping_an_uncommitted_upload_removes_it() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = UploadDir::create(tmp.path()).await.unwrap();

        let mut staged = dir.stage("1-abcdef.bin").await.unwrap();
        staged.write_chunk(&[0u8; 128]).await.unwrap();
        drop(staged);

        assert!(entries(tmp.path()).await.is_empty());
    }
}
