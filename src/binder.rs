//! The project binder as an arena-backed tree.
//!
//! Entries live in one `Vec` and refer to each other by [`EntryId`]. Ownership
//! runs from the root list down through `children`; `parent` is a lookup-only
//! back-reference used for ancestry walks.

use std::collections::HashMap;

use crate::error::ProjectError;
use crate::importer::{BinderItemXml, ProjectXml, VocabEntryXml};
use crate::sanitize::PLACEHOLDER_NAME;

const NO_LABEL: &str = "No Label";
const NO_STATUS: &str = "No Status";

/// Index of an entry inside its [`Binder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(usize);

/// What a binder entry is, fixed at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Folder,
    DraftFolder,
    ResearchFolder,
    TrashFolder,
    Text,
    /// Any other binder type (`PDF`, `Image`, `WebArchive`, ...), kept verbatim.
    Other(String),
}

impl EntryKind {
    pub fn from_type(item_type: &str) -> Self {
        match item_type {
            "Folder" => Self::Folder,
            "DraftFolder" => Self::DraftFolder,
            "ResearchFolder" => Self::ResearchFolder,
            "TrashFolder" => Self::TrashFolder,
            "Text" => Self::Text,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BinderEntry {
    /// Identifier of the entry's folder in the content store.
    pub uuid: String,
    pub title: String,
    pub kind: EntryKind,
    pub include_in_compile: bool,
    pub label: Option<String>,
    pub status: Option<String>,
    /// Zero-based index among siblings.
    pub position: usize,
    pub children: Vec<EntryId>,
    pub parent: Option<EntryId>,
}

/// Label and status names keyed by their identifiers, for one project.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    labels: HashMap<String, String>,
    statuses: HashMap<String, String>,
}

impl Vocabulary {
    pub fn from_project(project: &ProjectXml) -> Self {
        let labels = project
            .label_settings
            .as_ref()
            .map(|s| collect_names(s.entries(), NO_LABEL))
            .unwrap_or_default();
        let statuses = project
            .status_settings
            .as_ref()
            .map(|s| collect_names(s.entries(), NO_STATUS))
            .unwrap_or_default();
        Self { labels, statuses }
    }

    pub fn label(&self, id: Option<&str>) -> Option<String> {
        id.and_then(|id| self.labels.get(id)).cloned()
    }

    pub fn status(&self, id: Option<&str>) -> Option<String> {
        id.and_then(|id| self.statuses.get(id)).cloned()
    }
}

fn collect_names<'a>(
    entries: impl Iterator<Item = &'a VocabEntryXml>,
    sentinel: &str,
) -> HashMap<String, String> {
    entries
        .filter_map(|e| {
            let id = e.id.as_deref().filter(|s| !s.is_empty())?;
            let name = e.name.as_deref().filter(|s| !s.is_empty() && *s != sentinel)?;
            Some((id.to_string(), name.to_string()))
        })
        .collect()
}

/// The parsed binder tree. Built once, never mutated afterwards.
#[derive(Debug, Default)]
pub struct Binder {
    entries: Vec<BinderEntry>,
    roots: Vec<EntryId>,
}

impl Binder {
    /// Parse the XML text of a `.scrivx` file.
    pub fn parse(xml: &str) -> Result<Self, ProjectError> {
        let project = ProjectXml::parse(xml)?;
        let vocabulary = Vocabulary::from_project(&project);
        Ok(Self::from_project(&project, &vocabulary))
    }

    /// Build the tree from the deserialized index, resolving labels and
    /// statuses against `vocabulary`.
    pub fn from_project(project: &ProjectXml, vocabulary: &Vocabulary) -> Self {
        let mut binder = Binder::default();
        if let Some(items) = project.binder.as_ref().map(|b| &b.items) {
            for (position, item) in items.iter().enumerate() {
                let id = binder.insert(item, None, position, vocabulary);
                binder.roots.push(id);
            }
        }
        binder
    }

    fn insert(
        &mut self,
        item: &BinderItemXml,
        parent: Option<EntryId>,
        position: usize,
        vocabulary: &Vocabulary,
    ) -> EntryId {
        let meta = item.metadata.as_ref();
        let title = item
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(PLACEHOLDER_NAME);

        let id = EntryId(self.entries.len());
        self.entries.push(BinderEntry {
            uuid: item.identifier().to_string(),
            title: title.to_string(),
            kind: EntryKind::from_type(item.item_type.as_deref().unwrap_or("Text")),
            include_in_compile: meta
                .and_then(|m| m.include_in_compile.as_deref())
                .is_some_and(|v| v.eq_ignore_ascii_case("yes")),
            label: vocabulary.label(meta.and_then(|m| m.label_id.as_deref())),
            status: vocabulary.status(meta.and_then(|m| m.status_id.as_deref())),
            position,
            children: Vec::new(),
            parent,
        });

        if let Some(children) = item.children.as_ref() {
            for (child_position, child) in children.items.iter().enumerate() {
                let child_id = self.insert(child, Some(id), child_position, vocabulary);
                self.entries[id.0].children.push(child_id);
            }
        }
        id
    }

    pub fn get(&self, id: EntryId) -> &BinderEntry {
        &self.entries[id.0]
    }

    pub fn roots(&self) -> &[EntryId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pre-order traversal of every entry: each entry before its children,
    /// siblings in position order.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            binder: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Ancestors of `id`, nearest first. Does not include `id` itself.
    pub fn ancestors(&self, id: EntryId) -> Ancestors<'_> {
        Ancestors {
            binder: self,
            next: self.get(id).parent,
        }
    }

    /// Whether any ancestor of `id` is a trash folder.
    pub fn is_in_trash(&self, id: EntryId) -> bool {
        self.ancestors(id)
            .any(|a| matches!(self.get(a).kind, EntryKind::TrashFolder))
    }
}

pub struct Walk<'a> {
    binder: &'a Binder,
    stack: Vec<EntryId>,
}

impl Iterator for Walk<'_> {
    type Item = EntryId;

    fn next(&mut self) -> Option<EntryId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.binder.get(id).children.iter().rev().copied());
        Some(id)
    }
}

pub struct Ancestors<'a> {
    binder: &'a Binder,
    next: Option<EntryId>,
}

impl Iterator for Ancestors<'_> {
    type Item = EntryId;

    fn next(&mut self) -> Option<EntryId> {
        let id = self.next?;
        self.next = self.binder.get(id).parent;
        Some(id)
    }
}
