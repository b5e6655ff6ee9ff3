use std::collections::HashMap;

use serde_json::{Map, Value as J};

use crate::model::{Document, SectionId, SectionRef};

/// `{"values": {..}, "sections": {name: {..}}}` per section, in source order.
/// Keys and section names live in separate maps since they may collide.
pub fn document_to_json_value(doc: &Document) -> J {
    section_to_json_value(doc.root())
}

pub fn section_to_json_value(top: SectionRef<'_>) -> J {
    // pre-order walk, then build bottom-up so every child is ready before its parent
    let mut order = Vec::new();
    let mut stack = vec![top];
    while let Some(sec) = stack.pop() {
        order.push(sec);
        stack.extend(sec.sections());
    }
    let mut built: HashMap<SectionId, J> = HashMap::with_capacity(order.len());
    for sec in order.into_iter().rev() {
        let mut values = Map::with_capacity(sec.value_count());
        for (k, v) in sec.entries() {
            values.insert(k.to_string(), J::String(v.to_string()));
        }
        let mut sections = Map::with_capacity(sec.section_len());
        for child in sec.sections() {
            let v = built.remove(&child.id()).unwrap_or(J::Null);
            sections.insert(child.name().to_string(), v);
        }
        let mut out = Map::with_capacity(2);
        out.insert("values".to_string(), J::Object(values));
        out.insert("sections".to_string(), J::Object(sections));
        built.insert(sec.id(), J::Object(out));
    }
    built.remove(&top.id()).unwrap_or(J::Null)
}

pub fn dump_json(doc: &Document) -> String {
    let mut s = serde_json::to_string_pretty(&document_to_json_value(doc)).unwrap_or_default();
    s.push('\n');
    s
}
