//! nestconf-core: parser, exporter and typed lookups for nested INI-style files
//!
//! The surface is small:
//! - Line grammar (comments, headers, `key=value`) and the section tree builder
//! - Read-only section views keeping source order for keys and subsections
//! - Canonical exporter; `parse(export(doc)) == doc`
//! - Value casting to scalars and `{a, b}` arrays, plus a JSON view for tooling
//!
pub mod cast;
pub mod error;
pub mod export;
pub mod json;
pub mod model;
pub mod parser;
pub mod text;

pub use cast::{FromLeaf, Kind, Request, Typed, cast_as, get_as};
pub use error::{CastError, LoadError, ParseError, SyntaxErrorKind};
pub use export::{ExportOptions, export, export_to_string, export_with};
pub use json::{document_to_json_value, dump_json};
pub use model::{Document, SectionId, SectionRef};
pub use parser::{ParseOptions, Parser, parse_file, parse_reader, parse_str};
