//! Best-effort RTF to plain text flattening.
//!
//! Scrivener stores every document body and note as RTF. The exporter only
//! needs the words, so formatting is discarded: header tables and ignorable
//! destinations are skipped, paragraph marks become newlines, and escapes are
//! decoded (`\'hh` as Windows-1252, `\uN` as Unicode with `\ucN` fallback skipping).

use std::path::Path;

use tracing::debug;

use crate::error::RtfError;
use crate::utils::read_optional_text;

/// Destinations whose content is never text.
const IGNORED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "expandedcolortbl",
    "stylesheet",
    "listtable",
    "listoverridetable",
    "listtext",
    "rsidtbl",
    "revtbl",
    "filetbl",
    "info",
    "generator",
    "xmlnstbl",
    "themedata",
    "colorschememapping",
    "datastore",
    "latentstyles",
    "pict",
    "nonshppict",
    "object",
    "fldinst",
    "header",
    "headerl",
    "headerr",
    "headerf",
    "footer",
    "footerl",
    "footerr",
    "footerf",
];

#[derive(Clone, Copy)]
struct Group {
    ignorable: bool,
    uc: usize,
}

struct Flattener {
    out: String,
    cur: Group,
    stack: Vec<Group>,
    // Fallback characters still to drop after a `\uN`.
    skip: usize,
    pending_high: Option<u32>,
}

/// Read an RTF file and return its plain text.
///
/// A missing, unreadable, blank or undecodable file yields an empty string.
pub fn read_rtf(path: &Path) -> String {
    let raw = match read_optional_text(path) {
        Ok(Some(raw)) => raw,
        Ok(None) => return String::new(),
        Err(e) => {
            debug!("Could not read {}: {}", path.display(), e);
            return String::new();
        }
    };
    if raw.trim().is_empty() {
        return String::new();
    }
    match rtf_to_text(&raw) {
        Ok(text) => text,
        Err(e) => {
            debug!("Could not flatten {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Flatten an RTF document to trimmed plain text.
///
/// Input that is not RTF at all is returned trimmed, unchanged.
pub fn rtf_to_text(input: &str) -> Result<String, RtfError> {
    if !input.trim_start().starts_with("{\\rtf") {
        return Ok(input.trim().to_string());
    }

    let mut f = Flattener {
        out: String::with_capacity(input.len() / 2),
        cur: Group {
            ignorable: false,
            uc: 1,
        },
        stack: Vec::new(),
        skip: 0,
        pending_high: None,
    };

    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                f.stack.push(f.cur);
                f.skip = 0;
                i += 1;
            }
            b'}' => {
                f.cur = f.stack.pop().ok_or(RtfError::UnbalancedGroup(i))?;
                f.skip = 0;
                i += 1;
            }
            b'\\' => i = f.control(input, i)?,
            b'\r' | b'\n' => i += 1,
            _ => {
                let Some(c) = input[i..].chars().next() else {
                    break;
                };
                f.emit(c);
                i += c.len_utf8();
            }
        }
    }

    Ok(f.out.trim().to_string())
}

impl Flattener {
    fn emit(&mut self, c: char) {
        if self.skip > 0 {
            self.skip -= 1;
            return;
        }
        if !self.cur.ignorable {
            self.out.push(c);
        }
    }

    fn emit_byte(&mut self, b: u8) {
        if self.skip > 0 {
            self.skip -= 1;
            return;
        }
        if let Some(c) = cp1252(b) {
            self.emit(c);
        }
    }

    /// Handle the control sequence starting at `start` (a backslash) and
    /// return the index just past it.
    fn control(&mut self, input: &str, start: usize) -> Result<usize, RtfError> {
        let bytes = input.as_bytes();
        let mut i = start + 1;
        let Some(&next) = bytes.get(i) else {
            return Ok(i);
        };

        if next.is_ascii_alphabetic() {
            let word_start = i;
            while bytes.get(i).is_some_and(u8::is_ascii_alphabetic) {
                i += 1;
            }
            let word = &input[word_start..i];

            let param_start = i;
            if bytes.get(i) == Some(&b'-') && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
            let param = input[param_start..i].parse::<i32>().ok();

            if bytes.get(i) == Some(&b' ') {
                i += 1;
            }

            if word == "bin" {
                // Raw binary payload of `param` bytes follows.
                let len = param.unwrap_or(0).max(0) as usize;
                let mut end = i.saturating_add(len).min(bytes.len());
                // The payload may end inside a multibyte character.
                while !input.is_char_boundary(end) {
                    end += 1;
                }
                return Ok(end);
            }
            self.control_word(word, param);
            return Ok(i);
        }

        match next {
            b'\'' => {
                let hex = bytes
                    .get(i + 1..i + 3)
                    .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                    .ok_or(RtfError::BadHexEscape(start))?;
                let value = (hex_value(hex[0]) << 4) | hex_value(hex[1]);
                self.emit_byte(value);
                Ok(i + 3)
            }
            b'\\' | b'{' | b'}' => {
                self.emit(next as char);
                Ok(i + 1)
            }
            b'~' => {
                self.emit('\u{a0}');
                Ok(i + 1)
            }
            b'_' => {
                self.emit('-');
                Ok(i + 1)
            }
            b'*' => {
                self.cur.ignorable = true;
                Ok(i + 1)
            }
            b'\n' | b'\r' => {
                self.emit('\n');
                Ok(i + 1)
            }
            _ => {
                let width = input[i..].chars().next().map_or(1, char::len_utf8);
                Ok(i + width)
            }
        }
    }

    fn control_word(&mut self, word: &str, param: Option<i32>) {
        if IGNORED_DESTINATIONS.contains(&word) {
            self.cur.ignorable = true;
            return;
        }
        match word {
            "par" | "line" | "sect" | "page" | "row" => self.emit('\n'),
            "tab" | "cell" => self.emit('\t'),
            "emdash" => self.emit('\u{2014}'),
            "endash" => self.emit('\u{2013}'),
            "bullet" => self.emit('\u{2022}'),
            "lquote" => self.emit('\u{2018}'),
            "rquote" => self.emit('\u{2019}'),
            "ldblquote" => self.emit('\u{201c}'),
            "rdblquote" => self.emit('\u{201d}'),
            "emspace" | "enspace" | "qmspace" => self.emit(' '),
            "uc" => self.cur.uc = param.unwrap_or(1).max(0) as usize,
            "u" => {
                if let Some(n) = param {
                    self.unicode(n);
                }
            }
            _ => {}
        }
    }

    fn unicode(&mut self, n: i32) {
        let code = (if n < 0 { n + 0x10000 } else { n }) as u32;
        let decoded = match code {
            0xD800..=0xDBFF => {
                self.pending_high = Some(code);
                None
            }
            0xDC00..=0xDFFF => self
                .pending_high
                .take()
                .and_then(|high| char::from_u32(0x10000 + ((high - 0xD800) << 10) + (code - 0xDC00))),
            _ => char::from_u32(code),
        };
        if let Some(c) = decoded
            && !self.cur.ignorable
        {
            self.out.push(c);
        }
        self.skip = self.cur.uc;
    }
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

/// Windows-1252 decoding of a single byte; `None` for the five unassigned slots.
fn cp1252(b: u8) -> Option<char> {
    let c = match b {
        0x80 => '\u{20ac}',
        0x82 => '\u{201a}',
        0x83 => '\u{0192}',
        0x84 => '\u{201e}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02c6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017d}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201c}',
        0x94 => '\u{201d}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02dc}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203a}',
        0x9C => '\u{0153}',
        0x9E => '\u{017e}',
        0x9F => '\u{0178}',
        0x81 | 0x8D | 0x8F | 0x90 | 0x9D => return None,
        other => other as char,
    };
    Some(c)
}
