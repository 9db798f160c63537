use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::binder::{BinderEntry, EntryId, EntryKind};
use crate::planner::{path_segments, segment_name};
use crate::project::ScrivenerProject;
use crate::renderer::{Document, write_markdown};
use crate::utils::ConvertConfig;

/// Report of one conversion run. Always produced, even when the project
/// could not be opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    pub success: bool,
    pub documents_converted: usize,
    pub folders_created: usize,
    pub skipped: Vec<String>,
    pub errors: Vec<String>,
}

impl ConversionResult {
    fn failed(message: String) -> Self {
        Self {
            success: false,
            errors: vec![message],
            ..Default::default()
        }
    }

    /// A run with errors still counts as successful while errors are
    /// outnumbered by converted documents.
    fn finish(&mut self) {
        self.success = self.errors.is_empty() || self.errors.len() < self.documents_converted;
    }

    /// One-line human readable outcome.
    pub fn summary(&self) -> String {
        if self.success {
            let mut message = format!("Converted {} documents", self.documents_converted);
            if self.folders_created > 0 {
                message.push_str(&format!(" and created {} folders", self.folders_created));
            }
            message
        } else {
            match self.errors.first() {
                Some(first) => format!("Conversion failed: {}", first),
                None => "Conversion failed".to_string(),
            }
        }
    }
}

/// What happened to a single binder entry.
#[derive(Debug)]
enum EntryOutcome {
    FolderCreated(PathBuf),
    DocumentWritten(PathBuf),
    /// The entry is a trash folder.
    Trashed,
    /// The entry sits somewhere below a trash folder.
    InsideTrash,
    /// Binder types that have no vault representation (PDFs, images, ...).
    Ignored,
}

/// Convert the project at `source` into a vault rooted at `destination`.
pub fn convert_project(source: &Path, destination: &Path) -> ConversionResult {
    run(&ConvertConfig {
        source: source.to_path_buf(),
        target_dir: destination.to_path_buf(),
        quiet: true,
    })
}

/// Convert with a progress bar unless `config.quiet` is set.
pub fn run(config: &ConvertConfig) -> ConversionResult {
    let project = match ScrivenerProject::open(&config.source) {
        Ok(p) => p,
        Err(e) => {
            warn!("Could not open project {}: {}", config.source.display(), e);
            return ConversionResult::failed(format!("Could not open project: {}", e));
        }
    };

    if let Err(e) = fs::create_dir_all(&config.target_dir) {
        return ConversionResult::failed(format!(
            "Could not create destination {}: {}",
            config.target_dir.display(),
            e
        ));
    }

    let binder = project.binder();
    info!(
        "Converting '{}' ({} binder entries) into {}",
        project.name(),
        binder.len(),
        config.target_dir.display()
    );

    let pb = progress_bar(binder.len() as u64, config.quiet);
    let mut result = ConversionResult::default();

    for id in binder.walk() {
        let entry = binder.get(id);
        match convert_entry(&project, id, &config.target_dir) {
            Ok(EntryOutcome::FolderCreated(path)) => {
                debug!("Folder: {}", path.display());
                result.folders_created += 1;
            }
            Ok(EntryOutcome::DocumentWritten(path)) => {
                debug!("Document: {}", path.display());
                result.documents_converted += 1;
            }
            Ok(EntryOutcome::Trashed) => {
                debug!("Skipping trash folder '{}'", entry.title);
                result.skipped.push(format!("{} (trash)", entry.title));
            }
            Ok(EntryOutcome::InsideTrash) | Ok(EntryOutcome::Ignored) => {}
            Err(e) => {
                let message = format!("Error converting '{}': {:#}", entry.title, e);
                warn!("{}", message);
                result.errors.push(message);
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    result.finish();

    info!(
        "Done. {} documents, {} folders, {} skipped, {} error(s).",
        result.documents_converted,
        result.folders_created,
        result.skipped.len(),
        result.errors.len()
    );
    result
}

fn progress_bar(total: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
    {
        bar.set_style(style.progress_chars("=>-"));
    }
    bar
}

fn convert_entry(project: &ScrivenerProject, id: EntryId, target_dir: &Path) -> Result<EntryOutcome> {
    let binder = project.binder();
    let entry = binder.get(id);

    let outcome = match &entry.kind {
        EntryKind::TrashFolder => EntryOutcome::Trashed,
        _ if binder.is_in_trash(id) => EntryOutcome::InsideTrash,
        EntryKind::Folder | EntryKind::DraftFolder | EntryKind::ResearchFolder => {
            let dir = parent_dir(project, id, target_dir).join(segment_name(entry));
            fs::create_dir_all(&dir)
                .wrap_err_with(|| format!("Failed to create folder: {}", dir.display()))?;
            EntryOutcome::FolderCreated(dir)
        }
        EntryKind::Text => {
            let dir = parent_dir(project, id, target_dir);
            let path = write_document(project, entry, &dir)?;
            EntryOutcome::DocumentWritten(path)
        }
        EntryKind::Other(kind) => {
            debug!("Ignoring '{}' of type {}", entry.title, kind);
            EntryOutcome::Ignored
        }
    };
    Ok(outcome)
}

fn parent_dir(project: &ScrivenerProject, id: EntryId, target_dir: &Path) -> PathBuf {
    path_segments(project.binder(), id)
        .iter()
        .fold(target_dir.to_path_buf(), |dir, segment| dir.join(segment))
}

fn write_document(project: &ScrivenerProject, entry: &BinderEntry, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Failed to create folder: {}", dir.display()))?;

    let content = project.read_content(entry);
    let synopsis = project.read_synopsis(entry)?;
    let notes = project.read_notes(entry);

    let doc = Document {
        title: &entry.title,
        content: &content,
        synopsis: Some(synopsis.as_str()),
        notes: Some(notes.as_str()),
        label: entry.label.as_deref(),
        status: entry.status.as_deref(),
        include_in_compile: entry.include_in_compile,
    };

    let path = dir.join(format!("{}.md", segment_name(entry)));
    let file = File::create(&path)
        .wrap_err_with(|| format!("Failed to create: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_markdown(&mut writer, &doc).wrap_err("Failed to write markdown")?;
    writer.flush().wrap_err("Failed to flush markdown file")?;

    Ok(path)
}
