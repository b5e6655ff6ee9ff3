//! Section tree storage.
//!
//! Sections live in a flat arena owned by the [`Document`] and refer to each
//! other by [`SectionId`]. Each section pairs a lookup map with a list of keys
//! in first-seen order; the map enforces uniqueness and the list drives export.

use std::collections::HashMap;

use crate::cast::{self, FromLeaf};
use crate::error::CastError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId(usize);

impl SectionId {
    pub const ROOT: SectionId = SectionId(0);
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Section {
    pub(crate) name: String,
    pub(crate) depth: usize,
    pub(crate) parent: Option<SectionId>,
    pub(crate) values: HashMap<String, String>,
    pub(crate) value_order: Vec<String>,
    pub(crate) subsections: HashMap<String, SectionId>,
    pub(crate) subsection_order: Vec<String>,
}

/// Returned when an insert would break per-section uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Occupied;

/// A parsed configuration: the anonymous root section and everything below it.
#[derive(Debug, Clone)]
pub struct Document {
    sections: Vec<Section>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only the root.
    pub fn new() -> Self {
        Self {
            sections: vec![Section::default()],
        }
    }

    pub fn root(&self) -> SectionRef<'_> {
        self.section_ref(SectionId::ROOT)
    }

    /// Follow a chain of subsection names from the root.
    pub fn find_section<'p, I>(&self, path: I) -> Option<SectionRef<'_>>
    where
        I: IntoIterator<Item = &'p str>,
    {
        let mut cur = self.root();
        for name in path {
            cur = cur.section(name)?;
        }
        Some(cur)
    }

    /// Number of sections, root included.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.len() == 1 && self.sections[0].values.is_empty()
    }

    /// Drop every section and value, leaving an empty root.
    pub fn clear(&mut self) {
        self.sections.clear();
        self.sections.push(Section::default());
    }

    fn section_ref(&self, id: SectionId) -> SectionRef<'_> {
        SectionRef {
            doc: self,
            id,
            section: &self.sections[id.0],
        }
    }

    // builder side

    pub(crate) fn node(&self, id: SectionId) -> &Section {
        &self.sections[id.0]
    }

    pub(crate) fn insert_value(
        &mut self,
        id: SectionId,
        key: &str,
        value: &str,
    ) -> Result<(), Occupied> {
        let sec = &mut self.sections[id.0];
        if sec.values.contains_key(key) {
            return Err(Occupied);
        }
        sec.values.insert(key.to_string(), value.to_string());
        sec.value_order.push(key.to_string());
        Ok(())
    }

    pub(crate) fn insert_section(
        &mut self,
        parent: SectionId,
        name: &str,
    ) -> Result<SectionId, Occupied> {
        if self.sections[parent.0].subsections.contains_key(name) {
            return Err(Occupied);
        }
        let id = SectionId(self.sections.len());
        let depth = self.sections[parent.0].depth + 1;
        self.sections.push(Section {
            name: name.to_string(),
            depth,
            parent: Some(parent),
            ..Section::default()
        });
        let p = &mut self.sections[parent.0];
        p.subsections.insert(name.to_string(), id);
        p.subsection_order.push(name.to_string());
        Ok(id)
    }
}

/// Borrowed, read-only view of one section.
#[derive(Clone, Copy)]
pub struct SectionRef<'a> {
    doc: &'a Document,
    id: SectionId,
    section: &'a Section,
}

impl<'a> SectionRef<'a> {
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Empty for the root.
    pub fn name(&self) -> &'a str {
        &self.section.name
    }

    pub fn depth(&self) -> usize {
        self.section.depth
    }

    pub fn is_root(&self) -> bool {
        self.section.parent.is_none()
    }

    pub fn parent(&self) -> Option<SectionRef<'a>> {
        self.section.parent.map(|p| self.doc.section_ref(p))
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.section.values.get(key).map(String::as_str)
    }

    /// Like [`get`](Self::get) but absent keys read as an empty string.
    pub fn value(&self, key: &str) -> &'a str {
        self.get(key).unwrap_or("")
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.section.values.contains_key(key)
    }

    /// Look up a key and cast it. `Ok(None)` when the key is absent.
    pub fn get_as<T: FromLeaf>(&self, key: &str) -> Result<Option<T>, CastError> {
        self.get(key).map(cast::get_as::<T>).transpose()
    }

    pub fn section(&self, name: &str) -> Option<SectionRef<'a>> {
        self.section
            .subsections
            .get(name)
            .map(|id| self.doc.section_ref(*id))
    }

    /// Key/value pairs in source order.
    pub fn entries(self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let section = self.section;
        let values = &section.values;
        section
            .value_order
            .iter()
            .map(move |k| (k.as_str(), values[k].as_str()))
    }

    /// Direct subsections in source order.
    pub fn sections(self) -> impl Iterator<Item = SectionRef<'a>> + 'a {
        let (doc, section) = (self.doc, self.section);
        let subs = &section.subsections;
        section
            .subsection_order
            .iter()
            .map(move |n| doc.section_ref(subs[n]))
    }

    pub fn value_count(&self) -> usize {
        self.section.values.len()
    }

    pub fn section_len(&self) -> usize {
        self.section.subsections.len()
    }
}

impl std::fmt::Debug for SectionRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionRef")
            .field("name", &self.section.name)
            .field("depth", &self.section.depth)
            .field("values", &self.section.value_order.len())
            .field("sections", &self.section.subsection_order.len())
            .finish()
    }
}

/// Structural equality: same sections, depths, pairs and order.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self.root(), other.root())];
        while let Some((a, b)) = stack.pop() {
            let same = a.name() == b.name()
                && a.depth() == b.depth()
                && a.entries().eq(b.entries())
                && a.section_len() == b.section_len();
            if !same {
                return false;
            }
            stack.extend(a.sections().zip(b.sections()));
        }
        true
    }
}

impl Eq for Document {}
