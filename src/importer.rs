//! Self-contained serde type definitions for the Scrivener project index (`.scrivx`).
//!
//! Only the parts of the schema the exporter reads are modelled; every other
//! element and attribute is ignored by the deserializer.
//!
//! Abridged layout:
//! ```xml
//! <ScrivenerProject Version="2.0">
//!   <Binder>
//!     <BinderItem UUID="..." Type="DraftFolder">
//!       <Title>Draft</Title>
//!       <MetaData>
//!         <IncludeInCompile>Yes</IncludeInCompile>
//!         <LabelID>1</LabelID>
//!         <StatusID>2</StatusID>
//!       </MetaData>
//!       <Children>
//!         <BinderItem UUID="..." Type="Text">...</BinderItem>
//!       </Children>
//!     </BinderItem>
//!   </Binder>
//!   <LabelSettings>
//!     <Labels>
//!       <Label ID="-1">No Label</Label>
//!       <Label ID="1">Concept</Label>
//!     </Labels>
//!   </LabelSettings>
//!   <StatusSettings>
//!     <Statuses>
//!       <Status ID="-1">No Status</Status>
//!       <Status ID="2">First Draft</Status>
//!     </Statuses>
//!   </StatusSettings>
//! </ScrivenerProject>
//! ```
//!
//! Older projects put `Label`/`Status` directly under the settings element
//! without the `Labels`/`Statuses` wrapper; both shapes are accepted.

use serde::Deserialize;

use crate::error::ProjectError;

// ---------------------------------------------------------------------------
// Project root
// ---------------------------------------------------------------------------

/// Root element of the `.scrivx` file. The element name itself is not checked.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectXml {
    #[serde(rename = "Binder", default)]
    pub binder: Option<BinderXml>,
    #[serde(rename = "LabelSettings", default)]
    pub label_settings: Option<LabelSettingsXml>,
    #[serde(rename = "StatusSettings", default)]
    pub status_settings: Option<StatusSettingsXml>,
}

impl ProjectXml {
    pub fn parse(xml: &str) -> Result<Self, ProjectError> {
        quick_xml::de::from_str(xml).map_err(ProjectError::Xml)
    }
}

// ---------------------------------------------------------------------------
// Binder
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct BinderXml {
    #[serde(rename = "BinderItem", default)]
    pub items: Vec<BinderItemXml>,
}

/// One node of the binder. `Type` is a free-form string such as `Text`,
/// `Folder`, `DraftFolder`, `ResearchFolder`, `TrashFolder`, `PDF` or `Image`.
#[derive(Debug, Default, Deserialize)]
pub struct BinderItemXml {
    #[serde(rename = "@UUID", default)]
    pub uuid: Option<String>,
    #[serde(rename = "@ID", default)]
    pub legacy_id: Option<String>,
    #[serde(rename = "@Type", default)]
    pub item_type: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "MetaData", default)]
    pub metadata: Option<MetaDataXml>,
    #[serde(rename = "Children", default)]
    pub children: Option<ChildrenXml>,
}

impl BinderItemXml {
    /// Identifier used to locate the item's folder in the content store.
    /// Scrivener 3 writes `UUID`; Scrivener 2 wrote a numeric `ID`.
    pub fn identifier(&self) -> &str {
        self.uuid
            .as_deref()
            .or(self.legacy_id.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChildrenXml {
    #[serde(rename = "BinderItem", default)]
    pub items: Vec<BinderItemXml>,
}

/// Per-item metadata. Every field is optional; absence means "unset".
#[derive(Debug, Default, Deserialize)]
pub struct MetaDataXml {
    #[serde(rename = "IncludeInCompile", default)]
    pub include_in_compile: Option<String>,
    #[serde(rename = "LabelID", default)]
    pub label_id: Option<String>,
    #[serde(rename = "StatusID", default)]
    pub status_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Vocabulary tables
// ---------------------------------------------------------------------------

/// `ID` attribute plus display text, shared by `Label` and `Status`.
#[derive(Debug, Default, Deserialize)]
pub struct VocabEntryXml {
    #[serde(rename = "@ID", default)]
    pub id: Option<String>,
    #[serde(rename = "$text", default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LabelSettingsXml {
    #[serde(rename = "Labels", default)]
    pub labels: Option<LabelsXml>,
    #[serde(rename = "Label", default)]
    pub bare_labels: Vec<VocabEntryXml>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LabelsXml {
    #[serde(rename = "Label", default)]
    pub entries: Vec<VocabEntryXml>,
}

impl LabelSettingsXml {
    pub fn entries(&self) -> impl Iterator<Item = &VocabEntryXml> {
        self.bare_labels
            .iter()
            .chain(self.labels.iter().flat_map(|l| l.entries.iter()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusSettingsXml {
    #[serde(rename = "Statuses", default)]
    pub statuses: Option<StatusesXml>,
    #[serde(rename = "Status", default)]
    pub bare_statuses: Vec<VocabEntryXml>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusesXml {
    #[serde(rename = "Status", default)]
    pub entries: Vec<VocabEntryXml>,
}

impl StatusSettingsXml {
    pub fn entries(&self) -> impl Iterator<Item = &VocabEntryXml> {
        self.bare_statuses
            .iter()
            .chain(self.statuses.iter().flat_map(|s| s.entries.iter()))
    }
}
