//! RTF font substitution.
//!
//! RTF carries per-run point size (`\fsN`) and bold/italic state (`\b`,
//! `\i`) as inline control words; runs reference fonts only by index into
//! the `\fonttbl` group. Rewriting the table's face names therefore
//! substitutes the family uniformly across every run while leaving each
//! run's size and traits untouched. Entries naming a styled face (for
//! example "Helvetica-Bold") are re-resolved against the target family with
//! the same traits, falling back to the plain family when no such face
//! exists.

use crate::error::SwitchError;
use crate::source::{FaceTraits, FontSource};

/// One `\fonttbl` entry: `\fN` index, the face name, and the byte range of
/// that name within the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FontTableEntry {
    pub index: u32,
    pub name: String,
    pub traits: FaceTraits,
    name_start: usize,
    name_end: usize,
}

/// Replaces every font-table face name with the target family's matching
/// face, leaving the rest of the document byte-for-byte intact.
pub fn substitute_family(
    rtf: &str,
    family: &str,
    source: &dyn FontSource,
) -> Result<String, SwitchError> {
    let entries = parse_font_table(rtf)?;
    if entries.is_empty() {
        return Err(SwitchError::MalformedRichText(
            "font table has no entries".into(),
        ));
    }

    let mut out = String::with_capacity(rtf.len());
    let mut cursor = 0;
    for entry in &entries {
        let replacement = source
            .styled_face(family, entry.traits)
            .unwrap_or_else(|| family.to_owned());
        out.push_str(&rtf[cursor..entry.name_start]);
        out.push_str(&replacement);
        cursor = entry.name_end;
    }
    out.push_str(&rtf[cursor..]);
    Ok(out)
}

/// Parses the `{\fonttbl ...}` group. Entries may be bare
/// (`\f0\froman Times;`) or group-wrapped (`{\f0\froman Times;}`); nested
/// groups inside an entry (such as `{\*\falt ...}` alternates) are skipped.
pub(crate) fn parse_font_table(rtf: &str) -> Result<Vec<FontTableEntry>, SwitchError> {
    let table_start = rtf
        .find("{\\fonttbl")
        .ok_or_else(|| SwitchError::MalformedRichText("no font table".into()))?;
    let inner_start = table_start + "{\\fonttbl".len();
    let inner_end = group_end(rtf, table_start)
        .ok_or_else(|| SwitchError::MalformedRichText("unterminated font table".into()))?;

    let bytes = rtf.as_bytes();
    let mut entries = Vec::new();
    let mut i = inner_start;
    while i < inner_end {
        if bytes[i] == b'\\' {
            if let Some((index, after)) = font_index_at(rtf, i, inner_end) {
                let (entry, next) = parse_entry(rtf, index, after, inner_end);
                if let Some(entry) = entry {
                    entries.push(entry);
                }
                i = next;
                continue;
            }
        }
        i += 1;
    }
    Ok(entries)
}

/// Byte offset one past the matching `}` content for the group opening at
/// `open` (i.e. the offset of the closing brace). Escaped braces do not
/// affect nesting.
fn group_end(rtf: &str, open: usize) -> Option<usize> {
    let bytes = rtf.as_bytes();
    debug_assert_eq!(bytes[open], b'{');
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// If a `\fN` control word (N numeric) starts at `i`, returns its index and
/// the offset just past it.
fn font_index_at(rtf: &str, i: usize, end: usize) -> Option<(u32, usize)> {
    let bytes = rtf.as_bytes();
    if bytes[i] != b'\\' || i + 1 >= end || bytes[i + 1] != b'f' {
        return None;
    }
    let mut j = i + 2;
    while j < end && bytes[j].is_ascii_digit() {
        j += 1;
    }
    if j == i + 2 {
        return None;
    }
    let index: u32 = rtf[i + 2..j].parse().ok()?;
    Some((index, j))
}

/// Parses one entry starting just past its `\fN`. Returns the entry (if it
/// carries a name) and the offset to resume scanning from.
fn parse_entry(
    rtf: &str,
    index: u32,
    mut i: usize,
    end: usize,
) -> (Option<FontTableEntry>, usize) {
    let bytes = rtf.as_bytes();
    let mut name_start: Option<usize> = None;
    while i < end {
        match bytes[i] {
            b';' => {
                let entry = name_start.map(|start| {
                    let name = rtf[start..i].trim_end().to_owned();
                    FontTableEntry {
                        index,
                        traits: infer_traits(&name),
                        name_end: start + name.len(),
                        name_start: start,
                        name,
                    }
                });
                return (entry, i + 1);
            }
            b'}' => {
                // Group-wrapped entry ended without a terminator.
                return (None, i + 1);
            }
            b'{' => {
                // Alternate-name or embedded group; its text is not the name.
                match group_end(rtf, i) {
                    Some(close) => i = close + 1,
                    None => return (None, end),
                }
            }
            b'\\' if i + 1 < end && bytes[i + 1].is_ascii_alphabetic() => {
                // A control word resets the name accumulator.
                i = skip_control_word(bytes, i + 1, end);
                name_start = None;
            }
            b' ' if name_start.is_none() => i += 1,
            _ => {
                if name_start.is_none() {
                    name_start = Some(i);
                }
                i += 1;
            }
        }
    }
    (None, end)
}

/// Advances past a control word's letters, optional signed numeric
/// parameter, and its single-space delimiter if present.
fn skip_control_word(bytes: &[u8], mut i: usize, end: usize) -> usize {
    while i < end && bytes[i].is_ascii_alphabetic() {
        i += 1;
    }
    if i < end && bytes[i] == b'-' {
        i += 1;
    }
    while i < end && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < end && bytes[i] == b' ' {
        i += 1;
    }
    i
}

/// Symbolic traits inferred from a face name's style markers.
pub(crate) fn infer_traits(face: &str) -> FaceTraits {
    let lower = face.to_lowercase();
    FaceTraits {
        bold: lower.contains("bold"),
        italic: lower.contains("italic") || lower.contains("oblique"),
    }
}
