use std::io::{self, Write};

use crate::sanitize::tag_slug;

pub const NOTES_HEADER: &str = "> [!note] Author Notes";

/// Everything that goes into one generated note.
#[derive(Debug, Default, Clone)]
pub struct Document<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub synopsis: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub label: Option<&'a str>,
    pub status: Option<&'a str>,
    pub include_in_compile: bool,
}

impl Document<'_> {
    fn tags(&self) -> Vec<String> {
        let mut tags = Vec::with_capacity(2);
        if let Some(label) = self.label.filter(|l| !l.is_empty()) {
            tags.push(format!("label/{}", tag_slug(label)));
        }
        if let Some(status) = self.status.filter(|s| !s.is_empty()) {
            tags.push(format!("status/{}", tag_slug(status)));
        }
        tags
    }
}

fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Write the note: YAML frontmatter, then the body text, then the author
/// notes as an Obsidian callout. Output depends only on `doc`.
pub fn write_markdown<W: Write>(writer: &mut W, doc: &Document<'_>) -> io::Result<()> {
    writeln!(writer, "---")?;
    writeln!(writer, "title: {}", quoted(doc.title))?;

    if let Some(synopsis) = doc.synopsis.filter(|s| !s.is_empty()) {
        if synopsis.contains('\n') {
            writeln!(writer, "synopsis: |")?;
            for line in synopsis.split('\n') {
                writeln!(writer, "  {}", line.trim_end_matches('\r'))?;
            }
        } else {
            writeln!(writer, "synopsis: {}", quoted(synopsis))?;
        }
    }

    let tags = doc.tags();
    if !tags.is_empty() {
        writeln!(writer, "tags:")?;
        for tag in &tags {
            writeln!(writer, "  - {}", tag)?;
        }
    }

    writeln!(writer, "include_in_compile: {}", doc.include_in_compile)?;
    writeln!(writer, "---")?;

    if !doc.content.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{}", doc.content)?;
    }

    if let Some(notes) = doc.notes.filter(|n| !n.is_empty()) {
        writeln!(writer)?;
        writeln!(writer, "{}", NOTES_HEADER)?;
        for line in notes.split('\n') {
            writeln!(writer, "> {}", line)?;
        }
    }

    Ok(())
}

pub fn render_markdown(doc: &Document<'_>) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_markdown(&mut buf, doc);
    String::from_utf8_lossy(&buf).into_owned()
}
