//! File intake for request attachments.
//!
//! Validates declared name/type, caps size, and stores each accepted file
//! under a fresh timestamped name inside the storage directory.

use std::path::{Path, PathBuf};

use rand::Rng;

/// Hard cap on a single attachment.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_TYPES: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Only PDF, JPG, JPEG, and PNG files are allowed: {name}")]
    UnsupportedFileType { name: String },
    #[error("uploaded file exceeds the size limit")]
    FileTooLarge,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Storage directory for uploaded attachments, created lazily on first accept.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final component of the storage directory, used to build the relative
    /// paths recorded on request rows (e.g. `Uploads/1723-42.pdf`).
    fn dir_name(&self) -> String {
        self.dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.dir.display().to_string())
    }

    /// Validates and persists one uploaded file, returning the relative path
    /// to record on the request row.
    pub async fn accept(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        let Some(extension) = allowed_extension(original_name, content_type) else {
            return Err(UploadError::UnsupportedFileType {
                name: original_name.to_string(),
            });
        };
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::FileTooLarge);
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let filename = generate_filename(&extension);
        tokio::fs::write(self.dir.join(&filename), bytes).await?;

        Ok(format!("{}/{}", self.dir_name(), filename))
    }

    /// Maps a requested download name to its on-disk location. The name is
    /// reduced to its final path component first so callers can never reach
    /// outside the storage directory. Returns `None` for names with no usable
    /// component (empty, `.`, `..`).
    pub fn resolve(&self, requested: &str) -> Option<(String, PathBuf)> {
        let name = normalize_filename(requested)?;
        let path = self.dir.join(&name);
        Some((name, path))
    }
}

/// Strips any directory portion (either separator convention) from a
/// requested filename.
pub fn normalize_filename(requested: &str) -> Option<String> {
    let forward = requested.replace('\\', "/");
    let name = forward.rsplit('/').next().unwrap_or_default();
    match name {
        "" | "." | ".." => None,
        _ => Some(name.to_string()),
    }
}

/// Returns the lowercased extension when both the declared name and the
/// declared MIME type belong to the allowed family.
fn allowed_extension(original_name: &str, content_type: Option<&str>) -> Option<String> {
    let extension = Path::new(original_name)
        .extension()?
        .to_string_lossy()
        .to_lowercase();
    if !ALLOWED_TYPES.contains(&extension.as_str()) {
        return None;
    }
    let mime = content_type?.to_lowercase();
    if !ALLOWED_TYPES.iter().any(|t| mime.contains(t)) {
        return None;
    }
    Some(extension)
}

/// Collision avoidance: millisecond timestamp plus a random suffix.
fn generate_filename(extension: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{}-{}.{}", millis, suffix, extension)
}
