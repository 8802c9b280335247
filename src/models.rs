use serde::{Deserialize, Serialize};

// One entry of a directory listing. Paths are relative to the base directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
    pub size: u64,
}

// Result of a list-files call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListing {
    pub files: Vec<FileEntry>,
    pub total_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectListing {
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContent {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOutcome {
    pub path: String,
    pub bytes_written: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub path: String,
    pub deleted: bool,
    pub is_directory: bool,
}

// Captured result of a shell command. `exit_code` is None when the process
// was terminated by a signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

/// Error kinds shared by every adapter, so callers can branch on the kind
/// instead of matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    NotADirectory,
    NotAFile,
    DirectoryNotEmpty,
    OutsideRoot,
    InvalidEncoding,
    PermissionDenied,
    Io,
    CommandFailed,
    CommandDisabled,
    Timeout,
    InvalidParams,
    UnknownTool,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    pub message: String,
}

// Wire shape of a failed operation: {"error": {"kind": ..., "message": ...}}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorPayload,
}

impl ErrorBody {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error: ErrorPayload {
                kind,
                message: message.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_entry_uses_camel_case() {
        let entry = FileEntry {
            name: "a.txt".to_string(),
            path: "a.txt".to_string(),
            is_directory: false,
            size: 5,
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({"name": "a.txt", "path": "a.txt", "isDirectory": false, "size": 5})
        );
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody::new(ErrorKind::DirectoryNotEmpty, "directory is not empty: sub");
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["error"]["kind"], "directory_not_empty");
        assert_eq!(value["error"]["message"], "directory is not empty: sub");
    }
}
