use std::fmt;
use std::io::{self, Write};

use crate::model::{Document, SectionRef};

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Written as a leading `# ...` comment line. Dropped again on re-parse.
    pub banner: Option<String>,
}

/// Write `doc` in canonical form.
pub fn export<W: Write>(doc: &Document, w: &mut W) -> io::Result<()> {
    export_with(doc, w, &ExportOptions::default())
}

pub fn export_with<W: Write>(doc: &Document, w: &mut W, opts: &ExportOptions) -> io::Result<()> {
    let mut wrote_any = false;
    if let Some(banner) = &opts.banner {
        for l in banner.lines() {
            writeln!(w, "# {l}")?;
        }
        wrote_any = true;
    }
    // depth-first, explicit stack; children pushed in reverse to keep source order
    let mut stack: Vec<SectionRef<'_>> = vec![doc.root()];
    while let Some(sec) = stack.pop() {
        if !sec.is_root() {
            if wrote_any {
                writeln!(w)?;
            }
            write_header(w, sec.name(), sec.depth())?;
            wrote_any = true;
        }
        for (k, v) in sec.entries() {
            writeln!(w, "{k}={v}")?;
            wrote_any = true;
        }
        let children: Vec<_> = sec.sections().collect();
        for child in children.into_iter().rev() {
            debug_assert_eq!(child.depth(), sec.depth() + 1);
            stack.push(child);
        }
    }
    Ok(())
}

fn write_header<W: Write>(w: &mut W, name: &str, depth: usize) -> io::Result<()> {
    let open = "[".repeat(depth);
    let close = "]".repeat(depth);
    writeln!(w, "{open}{name}{close}")
}

pub fn export_to_string(doc: &Document, opts: &ExportOptions) -> String {
    let mut out = Vec::new();
    // writing into a Vec cannot fail
    let _ = export_with(doc, &mut out, opts);
    String::from_utf8_lossy(&out).into_owned()
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&export_to_string(self, &ExportOptions::default()))
    }
}
