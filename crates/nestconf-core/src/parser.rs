use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::error::{LoadError, ParseError, SyntaxErrorKind};
use crate::model::{Document, SectionId};
use crate::text::{self, Header, Line};

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Reject headers whose closing brackets do not match the opening count.
    pub strict_headers: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict_headers: true,
        }
    }
}

/// Line-by-line reader feeding the tree builder.
#[derive(Debug)]
pub struct Parser<R> {
    reader: R,
    opts: ParseOptions,
    line_no: usize,
    buf: String,
    builder: Builder,
}

impl<R: BufRead> Parser<R> {
    pub fn new(reader: R, opts: ParseOptions) -> Self {
        Self {
            reader,
            opts,
            line_no: 0,
            buf: String::new(),
            builder: Builder::default(),
        }
    }

    /// Consume the whole stream. Any error aborts; no partial document is returned.
    pub fn parse_stream(mut self) -> Result<Document, ParseError> {
        loop {
            self.buf.clear();
            let n = self
                .reader
                .read_line(&mut self.buf)
                .map_err(|source| ParseError::Read {
                    line: self.line_no + 1,
                    source,
                })?;
            if n == 0 {
                break;
            }
            self.line_no += 1;
            let line = text::classify(&self.buf, self.opts.strict_headers)
                .map_err(|kind| ParseError::syntax(self.line_no, kind))?;
            log::trace!("line {}: {:?}", self.line_no, line);
            self.builder
                .apply(line, self.line_no)
                .map_err(|kind| ParseError::syntax(self.line_no, kind))?;
        }
        let doc = self.builder.finish();
        log::debug!(
            "parsed {} lines into {} sections",
            self.line_no,
            doc.section_count()
        );
        Ok(doc)
    }
}

/// Section tree state machine. Tracks the section that key/value lines attach to.
#[derive(Debug)]
struct Builder {
    doc: Document,
    current: SectionId,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            doc: Document::new(),
            current: SectionId::ROOT,
        }
    }
}

impl Builder {
    fn apply(&mut self, line: Line<'_>, line_no: usize) -> Result<(), SyntaxErrorKind> {
        match line {
            Line::Blank => Ok(()),
            Line::Header(h) => self.open_section(h, line_no),
            Line::KeyValue { key, value } => self
                .doc
                .insert_value(self.current, key, value)
                .map_err(|_| SyntaxErrorKind::DuplicateKey(key.to_string())),
        }
    }

    fn open_section(&mut self, header: Header<'_>, line_no: usize) -> Result<(), SyntaxErrorKind> {
        let cur_depth = self.doc.node(self.current).depth;
        if header.depth > cur_depth + 1 {
            return Err(SyntaxErrorKind::DepthJump {
                from: cur_depth,
                to: header.depth,
            });
        }
        // climb to the section at depth - 1; zero steps for a direct child
        let mut parent = self.current;
        for _ in 0..(cur_depth + 1 - header.depth) {
            match self.doc.node(parent).parent {
                Some(p) => parent = p,
                None => break,
            }
        }
        debug_assert_eq!(self.doc.node(parent).depth + 1, header.depth);

        let id = self
            .doc
            .insert_section(parent, header.name)
            .map_err(|_| SyntaxErrorKind::DuplicateSection(header.name.to_string()))?;
        log::debug!(
            "line {line_no}: opened section '{}' at depth {}",
            header.name,
            header.depth
        );
        self.current = id;
        Ok(())
    }

    fn finish(self) -> Document {
        self.doc
    }
}

pub fn parse_reader<R: BufRead>(reader: R, opts: &ParseOptions) -> Result<Document, ParseError> {
    Parser::new(reader, *opts).parse_stream()
}

pub fn parse_str(s: &str) -> Result<Document, ParseError> {
    parse_reader(s.as_bytes(), &ParseOptions::default())
}

/// Open `path` and parse it.
pub fn parse_file(path: &Path, opts: &ParseOptions) -> Result<Document, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::StreamUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_reader(BufReader::new(file), opts)?)
}

impl Document {
    pub fn from_reader<R: BufRead>(reader: R, opts: &ParseOptions) -> Result<Self, ParseError> {
        parse_reader(reader, opts)
    }
}

impl FromStr for Document {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_str(s)
    }
}
