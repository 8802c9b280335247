/// Path-scoped filesystem operations.
///
/// A [`Workspace`] owns the base directory every caller-supplied path is
/// resolved against. All list/read/write/delete operations go through
/// [`Workspace::resolve`], which applies the configured [`PathPolicy`].
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::models::{
    DeleteOutcome, ErrorKind, FileEntry, FileListing, ProjectEntry, WriteOutcome,
};

/// How resolved paths are checked against the base directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathPolicy {
    /// Reject any path that resolves outside the base directory,
    /// including escapes through symlinks.
    #[default]
    Confined,
    /// Join and normalize only. Paths may escape the base directory.
    Unrestricted,
}

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("base directory is not usable: {0}")]
    InvalidBase(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("path resolves outside the base directory: {0}")]
    OutsideRoot(String),

    #[error("path does not exist: {0}")]
    NotFound(String),

    #[error("path does not exist or is not a directory: {0}")]
    NotADirectory(String),

    #[error("path is not a file: {0}")]
    NotAFile(String),

    #[error("directory is not empty: {0}")]
    DirectoryNotEmpty(String),

    #[error("refusing to delete the base directory")]
    ProtectedRoot,

    #[error("file is not valid UTF-8: {0}")]
    InvalidEncoding(String),

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl WorkspaceError {
    fn io(path: &str, source: io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBase(_) => ErrorKind::Internal,
            Self::InvalidPath(_) => ErrorKind::InvalidParams,
            Self::OutsideRoot(_) => ErrorKind::OutsideRoot,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NotADirectory(_) => ErrorKind::NotADirectory,
            Self::NotAFile(_) => ErrorKind::NotAFile,
            Self::DirectoryNotEmpty(_) => ErrorKind::DirectoryNotEmpty,
            Self::ProtectedRoot => ErrorKind::PermissionDenied,
            Self::InvalidEncoding(_) => ErrorKind::InvalidEncoding,
            Self::Io { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => ErrorKind::NotFound,
                io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
                _ => ErrorKind::Io,
            },
        }
    }
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

#[derive(Debug, Clone)]
pub struct Workspace {
    base: PathBuf,
    policy: PathPolicy,
}

impl Workspace {
    /// Open a workspace rooted at `base`. The base must be an existing
    /// directory; it is canonicalized so containment checks compare like
    /// with like.
    pub fn new(base: impl AsRef<Path>, policy: PathPolicy) -> WorkspaceResult<Self> {
        let base = base.as_ref();
        let canonical = base.canonicalize().map_err(|e| {
            WorkspaceError::InvalidBase(format!("{}: {}", base.display(), e))
        })?;

        if !canonical.is_dir() {
            return Err(WorkspaceError::InvalidBase(format!(
                "{} is not a directory",
                canonical.display()
            )));
        }

        Ok(Self {
            base: canonical,
            policy,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn policy(&self) -> PathPolicy {
        self.policy
    }

    /// Join `path` with the base directory and collapse `.` and `..`.
    ///
    /// An empty path means the base directory. An absolute path replaces the
    /// base, which the confined policy then rejects unless it points back
    /// inside.
    pub fn resolve(&self, path: &str) -> WorkspaceResult<PathBuf> {
        let resolved = self.resolve_lexical(path)?;
        if self.policy == PathPolicy::Confined {
            self.check_real_location(path, &resolved)?;
        }
        Ok(resolved)
    }

    /// Resolve `path` without following a symlink in its final component.
    ///
    /// Only the parent directory has to really live inside the base, so a
    /// link can be removed even when it dangles or points outside.
    pub fn resolve_entry(&self, path: &str) -> WorkspaceResult<PathBuf> {
        let resolved = self.resolve_lexical(path)?;
        if self.policy == PathPolicy::Confined {
            if let Some(parent) = resolved.parent().filter(|p| p.starts_with(&self.base)) {
                self.check_real_location(path, parent)?;
            }
        }
        Ok(resolved)
    }

    fn resolve_lexical(&self, path: &str) -> WorkspaceResult<PathBuf> {
        if path.contains('\0') {
            return Err(WorkspaceError::InvalidPath("path contains a null byte".to_string()));
        }

        let requested = if path.is_empty() { "." } else { path };
        let resolved = normalize(&self.base.join(requested));

        if self.policy == PathPolicy::Confined && !resolved.starts_with(&self.base) {
            return Err(WorkspaceError::OutsideRoot(path.to_string()));
        }
        Ok(resolved)
    }

    // Lexically inside; make sure no symlink on the way to `target` leads out.
    fn check_real_location(&self, path: &str, target: &Path) -> WorkspaceResult<()> {
        if let Some(existing) = nearest_existing(target) {
            let canonical = existing
                .canonicalize()
                .map_err(|e| WorkspaceError::io(path, e))?;
            if !canonical.starts_with(&self.base) {
                return Err(WorkspaceError::OutsideRoot(path.to_string()));
            }
        }
        Ok(())
    }

    /// Render an absolute path the way listings report it: relative to the
    /// base with `/` separators, or absolute when it lies outside the base.
    pub fn display_path(&self, path: &Path) -> String {
        match path.strip_prefix(&self.base) {
            Ok(relative) if relative.as_os_str().is_empty() => ".".to_string(),
            Ok(relative) => relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => path.to_string_lossy().into_owned(),
        }
    }

    /// Walk the directory at `path`.
    ///
    /// Entries of the starting directory are at depth 0. Without `recursive`
    /// only depth 0 is reported; with it, subdirectories are descended while
    /// their depth stays within `max_depth`. Directories contribute 0 to the
    /// total size. Symlinked directories are listed but never descended.
    pub async fn list_files(
        &self,
        path: &str,
        recursive: bool,
        max_depth: usize,
    ) -> WorkspaceResult<FileListing> {
        let root = self.resolve(path)?;
        match fs::metadata(&root).await {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => return Err(WorkspaceError::NotADirectory(path.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(WorkspaceError::NotADirectory(path.to_string()));
            }
            Err(e) => return Err(WorkspaceError::io(path, e)),
        }

        let mut files = Vec::new();
        let mut total_size = 0u64;
        let mut pending = vec![(root.clone(), 0usize)];

        while let Some((dir, depth)) = pending.pop() {
            let entries = match read_dir_sorted(&dir).await {
                Ok(entries) => entries,
                Err(e) if dir == root => return Err(WorkspaceError::io(path, e)),
                Err(e) => {
                    warn!("Skipping unreadable directory {}: {}", dir.display(), e);
                    continue;
                }
            };

            let mut subdirs = Vec::new();
            for entry in entries {
                let size = if entry.is_directory { 0 } else { entry.size };
                total_size += size;
                files.push(FileEntry {
                    name: entry.name,
                    path: self.display_path(&entry.path),
                    is_directory: entry.is_directory,
                    size,
                });

                if entry.is_directory && !entry.is_symlink {
                    subdirs.push(entry.path);
                }
            }

            if recursive && depth < max_depth {
                // Reversed so the stack pops siblings in name order.
                for subdir in subdirs.into_iter().rev() {
                    pending.push((subdir, depth + 1));
                }
            }
        }

        debug!(
            "Listed {} ({} entries, {} bytes, recursive={}, max_depth={})",
            root.display(),
            files.len(),
            total_size,
            recursive,
            max_depth
        );

        Ok(FileListing { files, total_size })
    }

    /// Top-level directories of the base directory.
    pub async fn list_projects(&self) -> WorkspaceResult<Vec<ProjectEntry>> {
        let entries = read_dir_sorted(&self.base)
            .await
            .map_err(|e| WorkspaceError::io(".", e))?;

        Ok(entries
            .into_iter()
            .filter(|entry| entry.is_directory)
            .map(|entry| ProjectEntry { name: entry.name })
            .collect())
    }

    /// Resolve `path` and require it to be an existing regular file.
    pub async fn resolve_file(&self, path: &str) -> WorkspaceResult<PathBuf> {
        let resolved = self.resolve(path)?;
        match fs::metadata(&resolved).await {
            Ok(metadata) if metadata.is_file() => Ok(resolved),
            Ok(_) => Err(WorkspaceError::NotAFile(path.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(WorkspaceError::NotFound(path.to_string()))
            }
            Err(e) => Err(WorkspaceError::io(path, e)),
        }
    }

    /// Resolve `path` and require it to be an existing directory.
    pub async fn resolve_directory(&self, path: &str) -> WorkspaceResult<PathBuf> {
        let resolved = self.resolve(path)?;
        match fs::metadata(&resolved).await {
            Ok(metadata) if metadata.is_dir() => Ok(resolved),
            Ok(_) => Err(WorkspaceError::NotADirectory(path.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(WorkspaceError::NotFound(path.to_string()))
            }
            Err(e) => Err(WorkspaceError::io(path, e)),
        }
    }

    pub async fn read_file(&self, path: &str) -> WorkspaceResult<String> {
        let resolved = self.resolve_file(path).await?;
        let bytes = fs::read(&resolved)
            .await
            .map_err(|e| WorkspaceError::io(path, e))?;

        let content = String::from_utf8(bytes)
            .map_err(|_| WorkspaceError::InvalidEncoding(path.to_string()))?;

        debug!("Read file: {} ({} bytes)", path, content.len());
        Ok(content)
    }

    /// Create or truncate the file at `path`. Parent directories are not
    /// created.
    pub async fn write_file(&self, path: &str, content: &str) -> WorkspaceResult<WriteOutcome> {
        let resolved = self.resolve(path)?;
        if let Ok(metadata) = fs::metadata(&resolved).await {
            if metadata.is_dir() {
                return Err(WorkspaceError::NotAFile(path.to_string()));
            }
        }

        fs::write(&resolved, content)
            .await
            .map_err(|e| WorkspaceError::io(path, e))?;

        info!("Wrote file: {} ({} bytes)", path, content.len());
        Ok(WriteOutcome {
            path: path.to_string(),
            bytes_written: content.len(),
        })
    }

    /// Remove a file, a symlink, or an empty directory.
    pub async fn delete_path(&self, path: &str) -> WorkspaceResult<DeleteOutcome> {
        let resolved = self.resolve_entry(path)?;
        if resolved == self.base {
            return Err(WorkspaceError::ProtectedRoot);
        }

        let metadata = match fs::symlink_metadata(&resolved).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(WorkspaceError::NotFound(path.to_string()));
            }
            Err(e) => return Err(WorkspaceError::io(path, e)),
        };

        let is_directory = metadata.is_dir();
        if is_directory {
            fs::remove_dir(&resolved).await.map_err(|e| {
                if e.kind() == io::ErrorKind::DirectoryNotEmpty {
                    WorkspaceError::DirectoryNotEmpty(path.to_string())
                } else {
                    WorkspaceError::io(path, e)
                }
            })?;
        } else {
            fs::remove_file(&resolved)
                .await
                .map_err(|e| WorkspaceError::io(path, e))?;
        }

        info!(
            "Deleted {}: {}",
            if is_directory { "directory" } else { "file" },
            path
        );

        Ok(DeleteOutcome {
            path: path.to_string(),
            deleted: true,
            is_directory,
        })
    }
}

struct DirEntryInfo {
    name: String,
    path: PathBuf,
    is_directory: bool,
    is_symlink: bool,
    size: u64,
}

// Entries of one directory, sorted by name so listings are stable across
// filesystems.
async fn read_dir_sorted(dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let path = entry.path();
        let file_type = entry.file_type().await?;
        let is_symlink = file_type.is_symlink();

        // Follow symlinks for classification; a dangling link counts as an
        // empty file.
        let (is_directory, size) = if is_symlink {
            match fs::metadata(&path).await {
                Ok(metadata) => (metadata.is_dir(), metadata.len()),
                Err(_) => (false, 0),
            }
        } else if file_type.is_dir() {
            (true, 0)
        } else {
            (false, entry.metadata().await?.len())
        };

        entries.push(DirEntryInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            is_directory,
            is_symlink,
            size,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn nearest_existing(path: &Path) -> Option<&Path> {
    path.ancestors().find(|ancestor| ancestor.symlink_metadata().is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace(dir: &TempDir) -> Workspace {
        Workspace::new(dir.path(), PathPolicy::Confined).unwrap()
    }

    fn sample_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("b.txt"), "abc").unwrap();
        std::fs::create_dir(dir.path().join("sub").join("deeper")).unwrap();
        std::fs::write(dir.path().join("sub").join("deeper").join("c.txt"), "1234567").unwrap();
        dir
    }

    #[test]
    fn test_resolve_normalizes_dot_segments() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);

        let resolved = ws.resolve("./sub/../a.txt").unwrap();
        assert_eq!(resolved, ws.base_dir().join("a.txt"));
        assert_eq!(ws.resolve("").unwrap(), ws.base_dir());
        assert_eq!(ws.resolve(".").unwrap(), ws.base_dir());
    }

    #[test]
    fn test_confined_policy_rejects_escape() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);

        let err = ws.resolve("../outside.txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutsideRoot);

        let absolute = std::env::temp_dir().join("elsewhere.txt");
        let err = ws.resolve(&absolute.to_string_lossy()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutsideRoot);
    }

    #[test]
    fn test_unrestricted_policy_allows_escape() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path(), PathPolicy::Unrestricted).unwrap();

        let resolved = ws.resolve("../outside.txt").unwrap();
        assert_eq!(resolved, ws.base_dir().parent().unwrap().join("outside.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_confined_policy_rejects_symlink_escape() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();
        let ws = workspace(&dir);

        let err = ws.resolve("link/secret.txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutsideRoot);
    }

    #[test]
    fn test_new_rejects_missing_base() {
        let dir = TempDir::new().unwrap();
        let result = Workspace::new(dir.path().join("missing"), PathPolicy::Confined);
        assert!(matches!(result, Err(WorkspaceError::InvalidBase(_))));
    }

    #[tokio::test]
    async fn test_list_non_recursive_returns_immediate_children() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("inner.txt"), "ignored").unwrap();
        let ws = workspace(&dir);

        let listing = ws.list_files(".", false, 3).await.unwrap();

        assert_eq!(
            listing.files,
            vec![
                FileEntry {
                    name: "a.txt".to_string(),
                    path: "a.txt".to_string(),
                    is_directory: false,
                    size: 5,
                },
                FileEntry {
                    name: "sub".to_string(),
                    path: "sub".to_string(),
                    is_directory: true,
                    size: 0,
                },
            ]
        );
        assert_eq!(listing.total_size, 5);
    }

    #[tokio::test]
    async fn test_recursive_with_zero_depth_matches_non_recursive() {
        let dir = sample_tree();
        let ws = workspace(&dir);

        let flat = ws.list_files(".", false, 3).await.unwrap();
        let zero = ws.list_files(".", true, 0).await.unwrap();

        assert_eq!(flat.files, zero.files);
        assert_eq!(flat.total_size, zero.total_size);
    }

    #[tokio::test]
    async fn test_recursive_listing_respects_max_depth() {
        let dir = sample_tree();
        let ws = workspace(&dir);

        let one = ws.list_files(".", true, 1).await.unwrap();
        let paths: Vec<_> = one.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a.txt", "sub", "sub/b.txt", "sub/deeper"]);
        assert_eq!(one.total_size, 8);

        let all = ws.list_files(".", true, 3).await.unwrap();
        let paths: Vec<_> = all.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["a.txt", "sub", "sub/b.txt", "sub/deeper", "sub/deeper/c.txt"]
        );
        assert_eq!(all.total_size, 15);
    }

    #[tokio::test]
    async fn test_list_subdirectory_reports_base_relative_paths() {
        let dir = sample_tree();
        let ws = workspace(&dir);

        let listing = ws.list_files("sub", false, 3).await.unwrap();
        let paths: Vec<_> = listing.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["sub/b.txt", "sub/deeper"]);
    }

    #[tokio::test]
    async fn test_list_rejects_missing_and_file_paths() {
        let dir = sample_tree();
        let ws = workspace(&dir);

        let err = ws.list_files("missing", false, 3).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotADirectory);

        let err = ws.list_files("a.txt", false, 3).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotADirectory);
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);

        for content in ["", "plain text", "héllo wörld ✓\nsecond line"] {
            let outcome = ws.write_file("note.txt", content).await.unwrap();
            assert_eq!(outcome.bytes_written, content.len());
            assert_eq!(ws.read_file("note.txt").await.unwrap(), content);
        }
    }

    #[tokio::test]
    async fn test_read_errors_carry_kind() {
        let dir = sample_tree();
        let ws = workspace(&dir);

        let err = ws.read_file("missing.txt").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = ws.read_file("sub").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAFile);

        std::fs::write(dir.path().join("binary.bin"), [0xff, 0xfe, 0x00]).unwrap();
        let err = ws.read_file("binary.bin").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEncoding);
    }

    #[tokio::test]
    async fn test_write_without_parent_fails() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);

        let err = ws.write_file("missing/dir/file.txt", "data").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!dir.path().join("missing").exists());
    }

    #[tokio::test]
    async fn test_write_to_directory_fails() {
        let dir = sample_tree();
        let ws = workspace(&dir);

        let err = ws.write_file("sub", "data").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAFile);
    }

    #[tokio::test]
    async fn test_delete_non_empty_directory_leaves_it_intact() {
        let dir = sample_tree();
        let ws = workspace(&dir);

        let err = ws.delete_path("sub").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DirectoryNotEmpty);
        assert!(dir.path().join("sub").join("b.txt").exists());
        assert!(dir.path().join("sub").join("deeper").join("c.txt").exists());
    }

    #[tokio::test]
    async fn test_delete_missing_path_is_not_found() {
        let dir = sample_tree();
        let ws = workspace(&dir);
        let before = ws.list_files(".", true, 5).await.unwrap();

        let err = ws.delete_path("nope.txt").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let after = ws.list_files(".", true, 5).await.unwrap();
        assert_eq!(before.files, after.files);
    }

    #[tokio::test]
    async fn test_delete_file_and_empty_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();
        std::fs::create_dir(dir.path().join("empty")).unwrap();
        let ws = workspace(&dir);

        let outcome = ws.delete_path("a.txt").await.unwrap();
        assert!(outcome.deleted);
        assert!(!outcome.is_directory);
        assert!(!dir.path().join("a.txt").exists());

        let outcome = ws.delete_path("empty").await.unwrap();
        assert!(outcome.is_directory);
        assert!(!dir.path().join("empty").exists());
    }

    #[tokio::test]
    async fn test_delete_refuses_base_directory() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);

        let err = ws.delete_path(".").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert!(dir.path().exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_delete_removes_dangling_symlink() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("dangling");
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), &link).unwrap();
        let ws = workspace(&dir);

        let listing = ws.list_files(".", false, 0).await.unwrap();
        assert_eq!(listing.files[0].name, "dangling");
        assert_eq!(listing.files[0].size, 0);

        let outcome = ws.delete_path("dangling").await.unwrap();
        assert!(outcome.deleted);
        assert!(!outcome.is_directory);
        assert!(link.symlink_metadata().is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_delete_removes_link_pointing_outside_but_not_target() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        std::fs::write(outside.path().join("keep.txt"), "x").unwrap();
        let link = dir.path().join("out");
        std::os::unix::fs::symlink(outside.path(), &link).unwrap();
        let ws = workspace(&dir);

        let err = ws.delete_path("out/keep.txt").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutsideRoot);

        ws.delete_path("out").await.unwrap();
        assert!(link.symlink_metadata().is_err());
        assert!(outside.path().join("keep.txt").exists());
    }

    #[tokio::test]
    async fn test_list_projects_returns_directories_only() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("beta")).unwrap();
        std::fs::create_dir(dir.path().join("alpha")).unwrap();
        std::fs::write(dir.path().join("readme.md"), "# hi").unwrap();
        let ws = workspace(&dir);

        let projects = ws.list_projects().await.unwrap();
        let names: Vec<_> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }
}
