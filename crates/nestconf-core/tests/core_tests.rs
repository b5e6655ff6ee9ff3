use nestconf_core::{
    Document, ExportOptions, LoadError, ParseError, ParseOptions, SectionRef, SyntaxErrorKind,
};

const SAMPLE: &str = "\
# defining a configuration file
a-b*2=1 # an unusually named key!
b=1

# section 'e'
[e]
ea=1 ; middle line comment
eb=1

[c]
ca=2
cb=2 # another middle line comment

# nested section in 'c' called 'd'
[[d]]
da=3.0
db={3, 4, 5}  ; <- look an integer vector...

[A]
Aa=true
A-b=foo-bar # a key with an unusual character inside it
";

fn parse(s: &str) -> Document {
    s.parse().expect("parse")
}

fn syntax_kind(s: &str) -> (usize, SyntaxErrorKind) {
    match s.parse::<Document>().expect_err("should fail") {
        ParseError::Syntax { line, kind } => (line, kind),
        other => panic!("expected a syntax error, got {other}"),
    }
}

#[test]
fn scenario_tree_and_casts() {
    let doc = parse("a=1\n[e]\nea=1\n[[d]]\nda=3.0\ndb={3,4,5}\n");
    let root = doc.root();
    assert_eq!(root.get("a"), Some("1"));
    let e = root.section("e").unwrap();
    assert_eq!(e.depth(), 1);
    assert_eq!(e.get("ea"), Some("1"));
    let d = e.section("d").unwrap();
    assert_eq!(d.depth(), 2);
    assert_eq!(d.get("da"), Some("3.0"));
    assert_eq!(d.get("db"), Some("{3,4,5}"));
    assert_eq!(d.get_as::<Vec<i32>>("db").unwrap(), Some(vec![3, 4, 5]));
    assert_eq!(d.get_as::<f32>("da").unwrap(), Some(3.0));
}

#[test]
fn sample_document_lookups() {
    let doc = parse(SAMPLE);
    let root = doc.root();
    assert_eq!(nestconf_core::get_as::<i32>(root.value("a-b*2")).unwrap(), 1);
    let d = doc.find_section(["c", "d"]).unwrap();
    assert_eq!(d.get("db"), Some("{3, 4, 5}"));
    assert_eq!(d.parent().unwrap().name(), "c");
    let a = root.section("A").unwrap();
    assert_eq!(a.get_as::<bool>("Aa").unwrap(), Some(true));
    assert_eq!(a.value("A-b"), "foo-bar");
    // absent keys read as empty and create nothing
    assert_eq!(a.value("missing"), "");
    assert!(!a.contains_key("missing"));
    assert_eq!(a.get_as::<i32>("missing").unwrap(), None);
    assert!(root.section("nope").is_none());
}

#[test]
fn order_is_source_order() {
    let doc = parse("z=1\na=2\nm=3\n[zz]\n[aa]\n[mm]\n");
    let root = doc.root();
    let keys: Vec<_> = root.entries().map(|(k, _)| k).collect();
    assert_eq!(keys, ["z", "a", "m"]);
    let names: Vec<_> = root.sections().map(|s| s.name()).collect();
    assert_eq!(names, ["zz", "aa", "mm"]);
}

#[test]
fn comment_stripping() {
    assert_eq!(parse("key=value # trailing"), parse("key=value"));
    assert_eq!(parse("key=value ; trailing"), parse("key=value"));
}

#[test]
fn depth_invariant_holds() {
    let doc = parse(SAMPLE);
    fn check(sec: SectionRef<'_>) {
        for child in sec.sections() {
            assert_eq!(child.depth(), sec.depth() + 1);
            assert_eq!(child.parent().unwrap().id(), sec.id());
            check(child);
        }
    }
    check(doc.root());
    assert_eq!(doc.root().depth(), 0);
    assert!(doc.root().is_root());
}

#[test]
fn closing_nested_sections_by_depth() {
    let doc = parse("[a]\n[[b]]\n[[[c]]]\nx=1\n[[d]]\ny=2\n[e]\nz=3\n");
    let a = doc.root().section("a").unwrap();
    let names: Vec<_> = a.sections().map(|s| s.name()).collect();
    assert_eq!(names, ["b", "d"]);
    assert_eq!(doc.find_section(["a", "b", "c"]).unwrap().get("x"), Some("1"));
    assert_eq!(doc.find_section(["a", "d"]).unwrap().get("y"), Some("2"));
    assert_eq!(doc.find_section(["e"]).unwrap().get("z"), Some("3"));
    assert_eq!(doc.section_count(), 6);
}

#[test]
fn trailing_content_stays_in_deepest_section() {
    let doc = parse("[a]\n[[b]]\n[[[c]]]\nlast=1");
    assert_eq!(
        doc.find_section(["a", "b", "c"]).unwrap().get("last"),
        Some("1")
    );
}

#[test]
fn same_name_under_different_parents_is_allowed() {
    let doc = parse("[a]\n[[x]]\n[b]\n[[x]]\n");
    assert!(doc.find_section(["a", "x"]).is_some());
    assert!(doc.find_section(["b", "x"]).is_some());
}

#[test]
fn depth_jump_fails() {
    let (line, kind) = syntax_kind("a=1\n[[x]]\n");
    assert_eq!(line, 2);
    assert!(matches!(kind, SyntaxErrorKind::DepthJump { from: 0, to: 2 }));
}

#[test]
fn duplicate_key_fails() {
    let (line, kind) = syntax_kind("a=1\na=2\n");
    assert_eq!(line, 2);
    assert!(matches!(kind, SyntaxErrorKind::DuplicateKey(k) if k == "a"));
}

#[test]
fn duplicate_section_fails() {
    let (line, kind) = syntax_kind("[a]\nx=1\n[b]\n[a]\n");
    assert_eq!(line, 4);
    assert!(matches!(kind, SyntaxErrorKind::DuplicateSection(n) if n == "a"));
    // re-opening a nested section is rejected as well
    let (_, kind) = syntax_kind("[a]\n[[b]]\n[[b]]\n");
    assert!(matches!(kind, SyntaxErrorKind::DuplicateSection(_)));
}

#[test]
fn missing_assignment_fails() {
    let (line, kind) = syntax_kind("\n\njust words\n");
    assert_eq!(line, 3);
    assert!(matches!(kind, SyntaxErrorKind::MissingAssignment));
    let err = "x\n".parse::<Document>().unwrap_err();
    assert_eq!(err.to_string(), "missing assignment operator on line #1");
}

#[test]
fn read_failure_reports_line() {
    let err = Document::from_reader(&b"a=1\n\xff\n"[..], &ParseOptions::default()).unwrap_err();
    assert_eq!(err.line(), 2);
    assert!(matches!(err, ParseError::Read { .. }));
    assert!(err.syntax_kind().is_none());
    assert!(err.to_string().starts_with("read failed on line #2"));
}

#[test]
fn malformed_header_strict_and_lenient() {
    let (line, kind) = syntax_kind("[a]\n[[x]\n");
    assert_eq!(line, 2);
    assert!(matches!(kind, SyntaxErrorKind::MalformedHeader));
    let (_, kind) = syntax_kind("[a] trailing\n");
    assert!(matches!(kind, SyntaxErrorKind::MalformedHeader));

    let lenient = ParseOptions {
        strict_headers: false,
    };
    let doc = Document::from_reader("[abc\n".as_bytes(), &lenient).unwrap();
    assert!(doc.root().section("ab").is_some());
}

#[test]
fn round_trip_export() {
    let doc = parse(SAMPLE);
    let text = doc.to_string();
    let again = parse(&text);
    assert_eq!(doc, again);
    // canonical output is stable
    assert_eq!(text, again.to_string());
    assert!(text.starts_with("a-b*2=1\nb=1\n\n[e]\n"));
    assert!(text.contains("\n[[d]]\nda=3.0\ndb={3, 4, 5}\n"));
}

#[test]
fn round_trip_grammar_edges() {
    let cases = [
        ("empty key", "=v\n"),
        ("name ending in bracket", "[a]]\nk=\n"),
        ("spaces inside brackets", "[x]\n[[ b ]]\n[ ]\n"),
        ("value holding '='", "x==y\n[s]\nurl=a=b=c\n"),
        ("same name at each depth", "[a]\n[[a]]\n[[[a]]]\nv=1\n"),
        ("crlf line endings", "a=1\r\n[s]\r\nb=2 ; c\r\n[[t]]\r\n"),
    ];
    for (what, src) in cases {
        let doc = parse(src);
        let text = doc.to_string();
        let again: Document = text
            .parse()
            .unwrap_or_else(|e| panic!("{what}: re-parse failed: {e}"));
        assert_eq!(doc, again, "{what}");
        assert_eq!(text, again.to_string(), "{what}: export not stable");
    }
    let doc = parse("[a]]\n[[ b ]]\n");
    assert!(doc.find_section(["a]", " b "]).is_some());
}

#[test]
fn deep_nesting_without_recursion() {
    let depth = 2000;
    let mut src = String::new();
    for d in 1..=depth {
        src.push_str(&format!("{}s{}\nk=v\n", "[".repeat(d), "]".repeat(d)));
    }
    let doc = parse(&src);
    assert_eq!(doc.section_count(), depth + 1);
    let again = parse(&doc.to_string());
    assert_eq!(doc, again);
}

#[test]
fn export_headers_and_blank_lines() {
    let doc = parse("[a]\nk=v\n[[b]]\n");
    assert_eq!(doc.to_string(), "[a]\nk=v\n\n[[b]]\n");
    let empty = Document::new();
    assert_eq!(empty.to_string(), "");
}

#[test]
fn export_banner_is_dropped_on_reparse() {
    let doc = parse(SAMPLE);
    let opts = ExportOptions {
        banner: Some("generated".into()),
    };
    let text = nestconf_core::export_to_string(&doc, &opts);
    assert!(text.starts_with("# generated\n"));
    assert_eq!(parse(&text), doc);
}

#[test]
fn clear_resets_everything() {
    let mut doc = parse(SAMPLE);
    assert!(!doc.is_empty());
    doc.clear();
    assert!(doc.is_empty());
    assert_eq!(doc.section_count(), 1);
    assert_eq!(doc, Document::new());
}

#[test]
fn json_view_keeps_order() {
    let doc = parse("b=1\na=2\n[s]\nx={1,2}\n");
    let v = nestconf_core::document_to_json_value(&doc);
    assert_eq!(
        v,
        serde_json::json!({
            "values": {"b": "1", "a": "2"},
            "sections": {"s": {"values": {"x": "{1,2}"}, "sections": {}}}
        })
    );
    let keys: Vec<_> = v["values"].as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["b", "a"]);
}

#[test]
fn parse_file_and_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("app.cfg");
    std::fs::write(&p, SAMPLE).unwrap();
    let doc = nestconf_core::parse_file(&p, &ParseOptions::default()).expect("load");
    assert_eq!(doc, parse(SAMPLE));

    let missing = dir.path().join("nope.cfg");
    let err = nestconf_core::parse_file(&missing, &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::StreamUnavailable { .. }));

    let bad = dir.path().join("bad.cfg");
    std::fs::write(&bad, "a=1\na=1\n").unwrap();
    let err = nestconf_core::parse_file(&bad, &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::Parse(e) if e.line() == 2));
}
