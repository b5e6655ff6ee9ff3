//! Line-level grammar: comment stripping, classification and section headers.
//!
//! Comment markers are not escapable, so a value containing `#` or `;` is
//! always cut at the marker.

use crate::error::SyntaxErrorKind;

pub const COMMENT_MARKERS: [char; 2] = ['#', ';'];
const TRIM: [char; 4] = [' ', '\t', '\r', '\n'];

/// A normalized source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Header(Header<'a>),
    KeyValue { key: &'a str, value: &'a str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub name: &'a str,
    pub depth: usize,
}

/// Cut at the first comment marker and trim surrounding whitespace.
pub fn normalize(raw: &str) -> &str {
    let cut = raw.find(COMMENT_MARKERS).unwrap_or(raw.len());
    trim(&raw[..cut])
}

fn trim(s: &str) -> &str {
    s.trim_matches(TRIM)
}

/// Classify a raw line. Headers are split into depth and name here as well.
pub fn classify(raw: &str, strict_headers: bool) -> Result<Line<'_>, SyntaxErrorKind> {
    let line = normalize(raw);
    if line.is_empty() {
        return Ok(Line::Blank);
    }
    if line.starts_with('[') {
        return parse_header(line, strict_headers).map(Line::Header);
    }
    let Some(eq) = line.find('=') else {
        return Err(SyntaxErrorKind::MissingAssignment);
    };
    let key = trim(&line[..eq]);
    let value = normalize(&line[eq + 1..]);
    Ok(Line::KeyValue { key, value })
}

/// Depth is the count of leading `[`. In strict mode the line must close with
/// the same number of `]`; otherwise that many trailing characters are dropped
/// whatever they are.
pub fn parse_header(line: &str, strict: bool) -> Result<Header<'_>, SyntaxErrorKind> {
    let depth = line.bytes().take_while(|b| *b == b'[').count();
    let rest = &line[depth..];
    let name = if strict {
        let closing = rest.bytes().rev().take_while(|b| *b == b']').count();
        if closing < depth {
            return Err(SyntaxErrorKind::MalformedHeader);
        }
        &rest[..rest.len() - depth]
    } else {
        let keep = rest.len().saturating_sub(depth);
        if !rest.is_char_boundary(keep) {
            return Err(SyntaxErrorKind::MalformedHeader);
        }
        if !rest[keep..].bytes().all(|b| b == b']') {
            log::warn!("header '{line}' does not close with {depth} brackets");
        }
        &rest[..keep]
    };
    if name.is_empty() {
        return Err(SyntaxErrorKind::MalformedHeader);
    }
    Ok(Header { name, depth })
}
