use std::fs;
use std::path::{Path, PathBuf};

use scriv_export::convert_project;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    source: PathBuf,
    vault: PathBuf,
}

fn project(binder: &str) -> Fixture {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("Book.scriv");
    fs::create_dir_all(source.join("Files/Data")).unwrap();
    let index = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ScrivenerProject Identifier="1" Version="2.0">
  <Binder>{binder}</Binder>
  <LabelSettings>
    <Title>Label</Title>
    <Labels>
      <Label ID="-1">No Label</Label>
      <Label ID="1">Final Draft</Label>
    </Labels>
  </LabelSettings>
  <StatusSettings>
    <Statuses>
      <Status ID="-1">No Status</Status>
      <Status ID="2">Done</Status>
    </Statuses>
  </StatusSettings>
</ScrivenerProject>"#
    );
    fs::write(source.join("Book.scrivx"), index).unwrap();
    let vault = dir.path().join("out/vault");
    Fixture {
        _dir: dir,
        source,
        vault,
    }
}

fn write_data(source: &Path, uuid: &str, file: &str, contents: &str) {
    let dir = source.join("Files/Data").join(uuid);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), contents).unwrap();
}

/// Every path below `root`, relative and `/`-separated, sorted.
fn tree(root: &Path) -> Vec<String> {
    fn visit(root: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            let rel = path.strip_prefix(root).unwrap();
            out.push(rel.to_string_lossy().replace('\\', "/"));
            if path.is_dir() {
                visit(root, &path, out);
            }
        }
    }
    let mut out = Vec::new();
    visit(root, root, &mut out);
    out.sort();
    out
}

const FULL_BINDER: &str = r#"
<BinderItem UUID="D" Type="DraftFolder">
  <Title>Draft</Title>
  <Children>
    <BinderItem UUID="C1" Type="Text">
      <Title>Chapter: One</Title>
      <MetaData>
        <IncludeInCompile>Yes</IncludeInCompile>
        <LabelID>1</LabelID>
        <StatusID>2</StatusID>
      </MetaData>
    </BinderItem>
    <BinderItem UUID="P2" Type="Folder">
      <Title>Part 2</Title>
      <Children>
        <BinderItem UUID="S1" Type="Text"><Title>Scene</Title></BinderItem>
      </Children>
    </BinderItem>
  </Children>
</BinderItem>
<BinderItem UUID="R" Type="ResearchFolder">
  <Title>Research</Title>
  <Children>
    <BinderItem UUID="PDF1" Type="PDF"><Title>Scan</Title></BinderItem>
  </Children>
</BinderItem>
<BinderItem UUID="T" Type="TrashFolder">
  <Title>Trash</Title>
  <Children>
    <BinderItem UUID="X1" Type="Text"><Title>Deleted</Title></BinderItem>
    <BinderItem UUID="X2" Type="Folder"><Title>Old Folder</Title></BinderItem>
  </Children>
</BinderItem>
<BinderItem UUID="L1" Type="Text"><Title>Loose Note</Title></BinderItem>
"#;

#[test]
fn converts_full_project() {
    let fx = project(FULL_BINDER);
    write_data(
        &fx.source,
        "C1",
        "content.rtf",
        r"{\rtf1\ansi{\fonttbl\f0 Times;}\f0 Once upon a time.\par The end.}",
    );
    write_data(&fx.source, "C1", "synopsis.txt", "Opening scene.\nSets the tone.\n");
    write_data(&fx.source, "C1", "notes.rtf", r"{\rtf1 Check dates.}");
    write_data(&fx.source, "X1", "content.rtf", r"{\rtf1 Should never appear.}");
    write_data(&fx.source, "L1", "content.rtf", "{\\rtf1 Loose}");

    let result = convert_project(&fx.source, &fx.vault);

    assert!(result.success, "{:?}", result.errors);
    assert_eq!(result.documents_converted, 3);
    assert_eq!(result.folders_created, 3);
    assert_eq!(result.skipped, ["Trash (trash)"]);
    assert!(result.errors.is_empty());

    assert_eq!(
        tree(&fx.vault),
        [
            "01 Draft",
            "01 Draft/01 Chapter- One.md",
            "01 Draft/02 Part 2",
            "01 Draft/02 Part 2/01 Scene.md",
            "02 Research",
            "04 Loose Note.md",
        ]
    );

    let chapter = fs::read_to_string(fx.vault.join("01 Draft/01 Chapter- One.md")).unwrap();
    assert_eq!(
        chapter,
        "---\n\
         title: \"Chapter: One\"\n\
         synopsis: |\n  Opening scene.\n  Sets the tone.\n\
         tags:\n  - label/final-draft\n  - status/done\n\
         include_in_compile: true\n\
         ---\n\
         \n\
         Once upon a time.\nThe end.\n\
         \n\
         > [!note] Author Notes\n\
         > Check dates.\n"
    );
}

#[test]
fn missing_content_still_emits_document() {
    let fx = project(FULL_BINDER);

    let result = convert_project(&fx.source, &fx.vault);
    assert!(result.success);
    assert_eq!(result.documents_converted, 3);

    let scene = fs::read_to_string(fx.vault.join("01 Draft/02 Part 2/01 Scene.md")).unwrap();
    assert_eq!(scene, "---\ntitle: \"Scene\"\ninclude_in_compile: false\n---\n");
}

#[test]
fn trash_only_project_produces_nothing() {
    let fx = project(
        r#"<BinderItem UUID="T" Type="TrashFolder"><Title>Trash</Title><Children>
             <BinderItem UUID="X" Type="Text"><Title>Gone</Title></BinderItem>
           </Children></BinderItem>"#,
    );
    write_data(&fx.source, "X", "content.rtf", r"{\rtf1 gone}");

    let result = convert_project(&fx.source, &fx.vault);
    assert_eq!(result.documents_converted, 0);
    assert_eq!(result.folders_created, 0);
    assert!(!result.skipped.is_empty());
    assert!(result.errors.is_empty());
    assert!(fx.vault.is_dir());
    assert!(tree(&fx.vault).is_empty());
}

#[test]
fn one_failing_entry_does_not_stop_the_run() {
    let fx = project(
        r#"<BinderItem UUID="A" Type="Text"><Title>Broken</Title></BinderItem>
           <BinderItem UUID="B" Type="Text"><Title>Fine</Title></BinderItem>
           <BinderItem UUID="C" Type="Text"><Title>Also Fine</Title></BinderItem>"#,
    );
    // A directory where the synopsis file should be makes reading it fail.
    fs::create_dir_all(fx.source.join("Files/Data/A/synopsis.txt")).unwrap();

    let result = convert_project(&fx.source, &fx.vault);
    assert_eq!(result.documents_converted, 2);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Error converting 'Broken':"));
    assert!(result.success);
    assert_eq!(tree(&fx.vault), ["02 Fine.md", "03 Also Fine.md"]);
}

#[test]
fn errors_matching_documents_fail_the_run() {
    let fx = project(
        r#"<BinderItem UUID="A" Type="Text"><Title>Broken</Title></BinderItem>
           <BinderItem UUID="B" Type="Text"><Title>Fine</Title></BinderItem>"#,
    );
    fs::create_dir_all(fx.source.join("Files/Data/A/synopsis.txt")).unwrap();

    let result = convert_project(&fx.source, &fx.vault);
    assert_eq!(result.documents_converted, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(!result.success);
}

#[test]
fn rerun_is_idempotent() {
    let fx = project(FULL_BINDER);
    let first = convert_project(&fx.source, &fx.vault);
    let before = tree(&fx.vault);
    let second = convert_project(&fx.source, &fx.vault);
    assert_eq!(first, second);
    assert_eq!(before, tree(&fx.vault));
}

#[test]
fn missing_index_is_fatal() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("Empty.scriv");
    fs::create_dir_all(&source).unwrap();
    let vault = dir.path().join("vault");

    let result = convert_project(&source, &vault);
    assert!(!result.success);
    assert_eq!(result.documents_converted, 0);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Could not open project: no .scrivx file found"));
    assert!(!vault.exists());
}

#[test]
fn malformed_index_is_fatal() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("Bad.scriv");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("Bad.scrivx"), "<ScrivenerProject><Binder>").unwrap();

    let result = convert_project(&source, &dir.path().join("vault"));
    assert!(!result.success);
    assert!(result.errors[0].contains("malformed project index"));
}
