/// File system tools for MCP
///
/// Thin adapters from validated tool arguments to [`crate::workspace::Workspace`]
/// operations. Paths are always relative to the workspace base directory.
pub mod delete_path;
pub mod list_files;
pub mod list_projects;
pub mod read_file;
pub mod write_file;

pub use self::{
    delete_path::DeletePathTool, list_files::ListFilesTool, list_projects::ListProjectsTool,
    read_file::ReadFileTool, write_file::WriteFileTool,
};

pub(crate) fn default_path() -> String {
    ".".to_string()
}
