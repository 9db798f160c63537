use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use tracing::{debug, warn};

use crate::binder::{Binder, BinderEntry};
use crate::error::ProjectError;
use crate::rtf::read_rtf;
use crate::utils::{decode_lossy, read_optional_text};

pub const PROJECT_EXTENSION: &str = "scriv";
pub const INDEX_EXTENSION: &str = "scrivx";

/// An opened Scrivener project: its location on disk plus the parsed binder.
#[derive(Debug)]
pub struct ScrivenerProject {
    path: PathBuf,
    index_path: PathBuf,
    binder: Binder,
}

/// Check that `path` looks like a `.scriv` project directory.
/// Conversion itself does not require the extension; callers use this first.
pub fn validate_source(path: &Path) -> Result<(), ProjectError> {
    if !path.exists() {
        return Err(ProjectError::NotFound(path.to_path_buf()));
    }
    let has_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PROJECT_EXTENSION));
    if !path.is_dir() || !has_extension {
        return Err(ProjectError::NotAProject(path.to_path_buf()));
    }
    Ok(())
}

impl ScrivenerProject {
    pub fn open(path: &Path) -> Result<Self, ProjectError> {
        if !path.exists() {
            return Err(ProjectError::NotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(ProjectError::NotAProject(path.to_path_buf()));
        }

        let index_path = find_index(path)?;
        debug!("Reading project index {}", index_path.display());
        let bytes = fs::read(&index_path).map_err(|source| ProjectError::Io {
            path: index_path.clone(),
            source,
        })?;
        let binder = Binder::parse(&decode_lossy(&bytes))?;

        Ok(Self {
            path: path.to_path_buf(),
            index_path,
            binder,
        })
    }

    /// Project name: the directory name without its `.scriv` extension.
    pub fn name(&self) -> String {
        project_name(&self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    pub fn binder(&self) -> &Binder {
        &self.binder
    }

    fn data_dir(&self, entry: &BinderEntry) -> PathBuf {
        self.path.join("Files").join("Data").join(&entry.uuid)
    }

    pub fn content_path(&self, entry: &BinderEntry) -> PathBuf {
        self.data_dir(entry).join("content.rtf")
    }

    pub fn synopsis_path(&self, entry: &BinderEntry) -> PathBuf {
        self.data_dir(entry).join("synopsis.txt")
    }

    pub fn notes_path(&self, entry: &BinderEntry) -> PathBuf {
        self.data_dir(entry).join("notes.rtf")
    }

    pub fn read_content(&self, entry: &BinderEntry) -> String {
        read_rtf(&self.content_path(entry))
    }

    /// Trimmed synopsis text; empty when the sidecar file is absent.
    pub fn read_synopsis(&self, entry: &BinderEntry) -> Result<String> {
        let path = self.synopsis_path(entry);
        let text = read_optional_text(&path)
            .wrap_err_with(|| format!("Failed to read synopsis: {}", path.display()))?;
        Ok(text.map(|t| t.trim().to_string()).unwrap_or_default())
    }

    pub fn read_notes(&self, entry: &BinderEntry) -> String {
        read_rtf(&self.notes_path(entry))
    }
}

pub fn project_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn find_index(project_dir: &Path) -> Result<PathBuf, ProjectError> {
    let entries = fs::read_dir(project_dir).map_err(|source| ProjectError::Io {
        path: project_dir.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == INDEX_EXTENSION))
        .collect();
    candidates.sort();

    if candidates.len() > 1 {
        warn!(
            "Found {} .{} files in {}; using {}",
            candidates.len(),
            INDEX_EXTENSION,
            project_dir.display(),
            candidates[0].display()
        );
    }
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProjectError::IndexNotFound(project_dir.to_path_buf()))
}
