//! Dotted-path evaluation.

use json_doc::Doc;

const USERS: &[u8] = b"{\"users\":[{\"id\":\"1\",\"name\":\"x\"},{\"id\":\"2\",\"name\":\"y\"}]}";

#[test]
fn numeric_index_step() {
    let mut doc = Doc::new();
    let j = doc.parse(USERS);
    assert!(!doc.is_error(j));
    assert_eq!(doc.path_view(j, "users.1.name"), Some(&b"y"[..]));
    assert_eq!(doc.path_view(j, "users.0.id"), Some(&b"1"[..]));
}

#[test]
fn filter_step_selects_first_match() {
    let mut doc = Doc::new();
    let j = doc.parse(USERS);
    assert!(!doc.is_error(j));

    let u2 = doc.path(j, "users.id=2").unwrap();
    assert!(doc.is_object(u2));
    assert_eq!(doc.to_view(doc.obj_scan(u2, b"name"), b"?"), b"y");

    // filter then field in one path
    assert_eq!(doc.path_view(j, "users.id=2.name"), Some(&b"y"[..]));
}

#[test]
fn misses_return_none() {
    let mut doc = Doc::new();
    let j = doc.parse(USERS);
    assert!(!doc.is_error(j));
    assert!(doc.path(j, "users.999").is_none());
    assert!(doc.path(j, "users.x").is_none());
    assert!(doc.path(j, "users.id=3").is_none());
    assert!(doc.path(j, "missing.name").is_none());
    // scalar mid-path
    assert!(doc.path(j, "users.0.id.deeper").is_none());
}

#[test]
fn dot_escape_addresses_literal_dots() {
    let mut doc = Doc::new();
    let j = doc.parse(b"{\"obj\": {\"x.y\": 3}, \"c.d\": 2}");
    assert!(!doc.is_error(j));
    assert_eq!(doc.path_view(j, "obj.x\\.y"), Some(&b"3"[..]));
    assert_eq!(doc.path_view(j, "c\\.d"), Some(&b"2"[..]));
    // without the escape the dot splits the segment
    assert!(doc.path(j, "c.d").is_none());
}

#[test]
fn filter_compares_encoded_view() {
    // The stored form of the first row's value is the escape sequence, so
    // a filter on the decoded character does not match it.
    let mut doc = Doc::new();
    let j = doc.parse(b"{\"rows\":[{\"k\":\"\\u0041\"},{\"k\":\"B\"}]}");
    assert!(!doc.is_error(j));
    assert!(doc.path(j, "rows.k=A").is_none());
    let row = doc.path(j, "rows.k=B").unwrap();
    assert!(doc.is_object(row));
}

#[test]
fn decoded_variant_applies_escapes() {
    let mut doc = Doc::new();
    let j = doc.parse(b"{\"s\":\"a\\nb\"}");
    assert!(!doc.is_error(j));
    assert_eq!(doc.path_view(j, "s"), Some(&b"a\\nb"[..]));
    assert_eq!(doc.path_decoded(j, "s").unwrap().as_ref(), b"a\nb");
}

#[test]
fn path_over_built_tree() {
    let mut doc = Doc::new();
    let root = doc.object();
    let arr = doc.array();
    doc.obj_append(root, b"items", arr);
    for v in [5i64, 6, 7] {
        let n = doc.number_i64(v);
        doc.arr_append(arr, n);
    }
    assert_eq!(doc.path_view(root, "items.2"), Some(&b"7"[..]));
}
