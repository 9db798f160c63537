use std::path::PathBuf;

/// Errors that stop a conversion before any entry is processed.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("project not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("not a Scrivener project: {}", .0.display())]
    NotAProject(PathBuf),

    #[error("no .scrivx file found in {}", .0.display())]
    IndexNotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed project index: {0}")]
    Xml(#[from] quick_xml::de::DeError),
}

/// Failure to flatten an RTF document. Callers downgrade these to empty text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RtfError {
    #[error("unbalanced closing brace at byte {0}")]
    UnbalancedGroup(usize),

    #[error("malformed hex escape at byte {0}")]
    BadHexEscape(usize),
}
