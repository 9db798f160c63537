use crate::binder::{Binder, BinderEntry, EntryId, EntryKind};
use crate::sanitize::sanitize_filename;

/// `"NN Title"`: two-digit, 1-based sibling position plus the sanitized title.
pub fn segment_name(entry: &BinderEntry) -> String {
    format!("{:02} {}", entry.position + 1, sanitize_filename(&entry.title))
}

/// Directory segments from the vault root down to the folder holding `id`.
/// Trash folders contribute no segment; root-level entries yield none.
pub fn path_segments(binder: &Binder, id: EntryId) -> Vec<String> {
    let mut segments: Vec<String> = binder
        .ancestors(id)
        .map(|a| binder.get(a))
        .filter(|a| !matches!(a.kind, EntryKind::TrashFolder))
        .map(segment_name)
        .collect();
    segments.reverse();
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = r#"<ScrivenerProject><Binder>
  <BinderItem UUID="A" Type="DraftFolder"><Title>Draft</Title><Children>
    <BinderItem UUID="B" Type="Folder"><Title>Part: One?</Title><Children>
      <BinderItem UUID="C" Type="Text"><Title>First</Title></BinderItem>
      <BinderItem UUID="D" Type="Text"><Title>Second</Title></BinderItem>
    </Children></BinderItem>
  </Children></BinderItem>
  <BinderItem UUID="T" Type="TrashFolder"><Title>Trash</Title><Children>
    <BinderItem UUID="E" Type="Text"><Title>Gone</Title></BinderItem>
  </Children></BinderItem>
</Binder></ScrivenerProject>"#;

    fn find(binder: &Binder, uuid: &str) -> EntryId {
        binder.walk().find(|&id| binder.get(id).uuid == uuid).unwrap()
    }

    #[test]
    fn nested_entry_gets_prefixed_ancestor_segments() {
        let binder = Binder::parse(PROJECT).unwrap();
        let second = find(&binder, "D");
        assert_eq!(path_segments(&binder, second), ["01 Draft", "01 Part- One-"]);
        assert_eq!(segment_name(binder.get(second)), "02 Second");
    }

    #[test]
    fn root_entries_have_no_segments() {
        let binder = Binder::parse(PROJECT).unwrap();
        assert!(path_segments(&binder, find(&binder, "A")).is_empty());
        assert_eq!(segment_name(binder.get(find(&binder, "T"))), "02 Trash");
    }

    #[test]
    fn trash_ancestors_are_skipped() {
        let binder = Binder::parse(PROJECT).unwrap();
        assert!(path_segments(&binder, find(&binder, "E")).is_empty());
    }

    #[test]
    fn sibling_prefixes_follow_position_not_title() {
        let binder = Binder::parse(PROJECT).unwrap();
        let names: Vec<_> = binder
            .get(find(&binder, "B"))
            .children
            .iter()
            .map(|&c| segment_name(binder.get(c)))
            .collect();
        assert_eq!(names, ["01 First", "02 Second"]);
    }
}
