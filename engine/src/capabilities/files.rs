//! Local file search, open, and listing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use sdk::capability::{FileAccess, Result};
use sdk::errors::AssistantError;

/// Search stops after this many hits; spoken lists get useless beyond it.
const SEARCH_CAP: usize = 10;

pub struct FileManager {
    /// Directories probed, in order, when a bare filename is opened.
    common_dirs: Vec<PathBuf>,
}

impl FileManager {
    pub fn new(common_dirs: Vec<PathBuf>) -> Self {
        Self { common_dirs }
    }

    fn map_io(path: &Path, e: std::io::Error) -> AssistantError {
        match e.kind() {
            std::io::ErrorKind::NotFound => {
                AssistantError::NotFound(path.display().to_string())
            }
            std::io::ErrorKind::PermissionDenied => {
                AssistantError::PermissionDenied(path.display().to_string())
            }
            _ => AssistantError::Io(e),
        }
    }

    /// Resolve the path to open: as given if it exists, otherwise probe the
    /// common directories for a file of that name.
    async fn resolve_open_target(&self, path: &str) -> Result<PathBuf> {
        let direct = PathBuf::from(path);
        if fs::try_exists(&direct).await.unwrap_or(false) {
            return Ok(direct);
        }
        for dir in &self.common_dirs {
            let candidate = dir.join(path);
            if fs::try_exists(&candidate).await.unwrap_or(false) {
                debug!("resolved '{}' to {}", path, candidate.display());
                return Ok(candidate);
            }
        }
        Err(AssistantError::NotFound(path.to_string()))
    }
}

#[async_trait]
impl FileAccess for FileManager {
    async fn search_by_name(&self, keyword: &str, root: &Path) -> Result<Vec<PathBuf>> {
        let keyword = keyword.to_lowercase();
        let mut hits = Vec::new();
        let mut pending = vec![root.to_path_buf()];

        info!("searching for '{}' under {}", keyword, root.display());

        while let Some(dir) = pending.pop() {
            if hits.len() >= SEARCH_CAP {
                break;
            }
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if dir == root => return Err(Self::map_io(&dir, e)),
                Err(e) => {
                    // Unreadable subtrees are skipped, not fatal.
                    warn!("skipping {}: {}", dir.display(), e);
                    continue;
                }
            };

            while let Some(entry) = entries.next_entry().await.map_err(AssistantError::Io)? {
                let file_type = entry.file_type().await.map_err(AssistantError::Io)?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if entry
                    .file_name()
                    .to_string_lossy()
                    .to_lowercase()
                    .contains(&keyword)
                {
                    hits.push(entry.path());
                    if hits.len() >= SEARCH_CAP {
                        break;
                    }
                }
            }
        }

        debug!("{} hit(s) for '{}'", hits.len(), keyword);
        Ok(hits)
    }

    async fn open(&self, path: &str) -> Result<PathBuf> {
        let target = self.resolve_open_target(path).await?;
        info!("opening {}", target.display());

        #[cfg(target_os = "macos")]
        let status = tokio::process::Command::new("open")
            .arg(&target)
            .status()
            .await;

        #[cfg(target_os = "linux")]
        let status = tokio::process::Command::new("xdg-open")
            .arg(&target)
            .status()
            .await;

        #[cfg(target_os = "windows")]
        let status = tokio::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(&target)
            .status()
            .await;

        let status = status.map_err(|e| Self::map_io(&target, e))?;
        if !status.success() {
            return Err(AssistantError::ExternalService {
                service: "file opener".to_string(),
                detail: format!("exit status {} for {}", status, target.display()),
            });
        }
        Ok(target)
    }

    async fn list(&self, path: &Path) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(path)
            .await
            .map_err(|e| Self::map_io(path, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(AssistantError::Io)? {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        Ok(names)
    }
}
