use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::{domain::AppError, utils::sanitize_filename};

/// Places a downloaded payload somewhere the user can find it.
#[async_trait]
pub trait FileSaver: Send + Sync {
    /// Save `bytes`, using `suggested_name` as the file name or as the
    /// starting point for one. Returns where the file ended up.
    async fn save(&self, bytes: Bytes, suggested_name: &str) -> Result<PathBuf, AppError>;
}

/// Write the whole payload into an already opened file, then close it.
async fn write_all(mut file: tokio::fs::File, bytes: &[u8]) -> Result<(), AppError> {
    file.write_all(bytes)
        .await
        .map_err(|e| AppError::Io(format!("Write error: {}", e)))?;

    file.sync_all()
        .await
        .map_err(|e| AppError::Io(format!("Failed to sync file: {}", e)))
}

fn safe_name(suggested_name: &str) -> String {
    let name = sanitize_filename(suggested_name);
    let name = name.trim_matches(|c| c == '.' || c == ' ');
    if name.is_empty() {
        crate::domain::DEFAULT_FILENAME.to_string()
    } else {
        name.to_string()
    }
}

/// Asks the user where to save through the native save dialog.
#[derive(Debug, Clone, Default)]
pub struct DialogFileSaver;

#[async_trait]
impl FileSaver for DialogFileSaver {
    async fn save(&self, bytes: Bytes, suggested_name: &str) -> Result<PathBuf, AppError> {
        let path = rfd::AsyncFileDialog::new()
            .set_file_name(safe_name(suggested_name))
            .save_file()
            .await
            .map(|handle| handle.path().to_path_buf())
            .ok_or(AppError::Cancelled)?;

        // The dialog already confirmed replacing an existing file
        let file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| AppError::Io(format!("Failed to create file: {}", e)))?;
        write_all(file, &bytes).await?;
        info!(path = %path.display(), "Saved audio");
        Ok(path)
    }
}

/// Writes straight into a directory without asking. Existing files are kept;
/// a numbered name such as `song (1).m4a` is used instead.
#[derive(Debug, Clone)]
pub struct DirectoryFileSaver {
    dir: PathBuf,
}

impl DirectoryFileSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create a file that did not exist before, trying `name`, then
    /// `stem (1).ext`, `stem (2).ext` and so on.
    async fn create_unique(&self, name: &str) -> Result<(PathBuf, tokio::fs::File), AppError> {
        let mut counter = 0u32;
        loop {
            let path = self.dir.join(numbered_name(name, counter));
            match create_new(&path).await {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => counter += 1,
                Err(e) => {
                    return Err(AppError::Io(format!(
                        "Failed to create {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        }
    }
}

/// Opens `path` for writing, failing with `AlreadyExists` instead of
/// truncating an existing file.
async fn create_new(path: &Path) -> std::io::Result<tokio::fs::File> {
    tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
}

fn numbered_name(name: &str, counter: u32) -> String {
    if counter == 0 {
        return name.to_string();
    }

    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    match path.extension() {
        Some(ext) => format!("{} ({}).{}", stem, counter, ext.to_string_lossy()),
        None => format!("{} ({})", stem, counter),
    }
}

#[async_trait]
impl FileSaver for DirectoryFileSaver {
    async fn save(&self, bytes: Bytes, suggested_name: &str) -> Result<PathBuf, AppError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Io(format!("Failed to create directory: {}", e)))?;

        let (path, file) = self.create_unique(&safe_name(suggested_name)).await?;
        write_all(file, &bytes).await?;
        info!(path = %path.display(), "Saved audio");
        Ok(path)
    }
}
