//! Ordered-map engine: insertion order, snapshot/tree indexes, and their
//! cross-invalidation.

use json_doc::Doc;

#[test]
fn insertion_order_preserved_on_dump() {
    let mut doc = Doc::new();
    let o = doc.object();
    let v1 = doc.number_i64(1);
    let v2 = doc.number_i64(2);
    let v3 = doc.number_i64(3);
    doc.obj_append(o, b"z", v1);
    doc.obj_append(o, b"a", v2);
    doc.obj_append(o, b"m", v3);
    assert_eq!(doc.dump_compact(o), b"{\"z\":1,\"a\":2,\"m\":3}");
}

#[test]
fn iteration_follows_entry_links() {
    let mut doc = Doc::new();
    let j = doc.parse(b"{\"z\":1,\"a\":2,\"m\":3}");
    assert!(!doc.is_error(j));
    let mut keys = Vec::new();
    let mut e = doc.obj_first(j);
    while let Some(ei) = e {
        keys.push(doc.obj_entry_key(ei).to_vec());
        e = doc.obj_next(ei);
    }
    assert_eq!(keys, [b"z".to_vec(), b"a".to_vec(), b"m".to_vec()]);

    let mut rev = Vec::new();
    let mut e = doc.obj_last(j);
    while let Some(ei) = e {
        rev.push(doc.obj_entry_key(ei).to_vec());
        e = doc.obj_prev(ei);
    }
    assert_eq!(rev, [b"m".to_vec(), b"a".to_vec(), b"z".to_vec()]);
}

#[test]
fn snapshot_is_stale_for_appends() {
    let mut doc = Doc::new();
    let o = doc.object();
    let v1 = doc.number_i64(1);
    let t = doc.bool_true();
    doc.obj_append(o, b"a", v1);
    doc.obj_append(o, b"b", t);

    // First get builds the snapshot.
    let a = doc.obj_get(o, b"a");
    assert_eq!(doc.to_view(a, b"?"), b"1");
    let b = doc.obj_get(o, b"b");
    assert_eq!(doc.to_view(b, b"?"), b"true");

    // Appends are invisible to the snapshot but visible to find.
    let late = doc.string(b"late");
    doc.obj_append(o, b"z", late);
    assert!(doc.obj_get(o, b"z").is_none());
    let z = doc.obj_find(o, b"z");
    assert_eq!(doc.to_view(z, b"?"), b"late");
}

#[test]
fn get_after_find_returns_current_values() {
    let mut doc = Doc::new();
    let o = doc.object();
    let n = doc.number_i64(123);
    doc.obj_append(o, b"n", n);

    // Build the tree index first.
    assert!(doc.obj_find(o, b"missing").is_none());

    // The snapshot must be rebuilt from the live list, not searched stale.
    let n = doc.obj_get(o, b"n");
    assert_eq!(doc.to_i64(n, 0), 123);
}

#[test]
fn get_after_set_rebuilds_snapshot() {
    let mut doc = Doc::new();
    let o = doc.object();
    let v1 = doc.number_i64(1);
    let v2 = doc.number_i64(2);
    doc.obj_append(o, b"a", v1);
    doc.obj_append(o, b"b", v2);

    let a = doc.obj_get(o, b"a");
    assert_eq!(doc.to_i64(a, 0), 1);

    let v3 = doc.number_i64(3);
    doc.obj_set(o, b"c", v3);
    let c = doc.obj_get(o, b"c");
    assert_eq!(doc.to_i64(c, 0), 3);
}

#[test]
fn remove_invalidates_snapshot() {
    let mut doc = Doc::new();
    let o = doc.object();
    let v = doc.number_i64(7);
    doc.obj_append(o, b"k", v);

    let k = doc.obj_get(o, b"k");
    assert_eq!(doc.to_i64(k, 0), 7);
    assert!(doc.obj_remove(o, b"k"));
    assert!(doc.obj_get(o, b"k").is_none());
    assert_eq!(doc.obj_count(o), 0);
}

#[test]
fn set_replaces_in_place() {
    let mut doc = Doc::new();
    let o = doc.object();
    let one = doc.string(b"one");
    let y = doc.number_i64(9);
    doc.obj_append(o, b"x", one);
    doc.obj_append(o, b"y", y);

    let two = doc.string(b"two");
    doc.obj_set(o, b"x", two);
    assert_eq!(doc.to_view(doc.obj_scan(o, b"x"), b"?"), b"two");
    // position preserved
    assert_eq!(doc.dump_compact(o), b"{\"x\":\"two\",\"y\":9}");
}

#[test]
fn insert_updates_existing_and_adds_new() {
    let mut doc = Doc::new();
    let o = doc.object();
    let one = doc.string(b"one");
    doc.obj_append(o, b"x", one);

    let two = doc.string(b"two");
    doc.obj_insert(o, b"x", two);
    let x = doc.obj_find(o, b"x");
    assert_eq!(doc.to_view(x, b"?"), b"two");

    let three = doc.number_i64(3);
    doc.obj_insert(o, b"y", three);
    let y = doc.obj_find(o, b"y");
    assert_eq!(doc.to_i64(y, 0), 3);
    assert_eq!(doc.obj_count(o), 2);
}

#[test]
fn insert_keeps_tree_current_with_removals() {
    let mut doc = Doc::new();
    let o = doc.object();
    for i in 0..60i64 {
        let key = format!("key{i:02}");
        let v = doc.number_i64(i);
        doc.obj_insert(o, key.as_bytes(), v);
    }
    assert_eq!(doc.obj_count(o), 60);
    for i in 0..60i64 {
        let key = format!("key{i:02}");
        let found = doc.obj_find(o, key.as_bytes());
        assert_eq!(doc.to_i64(found, -1), i);
    }
    // Remove every other key while the tree index is active.
    for i in (0..60i64).step_by(2) {
        let key = format!("key{i:02}");
        assert!(doc.obj_remove(o, key.as_bytes()));
    }
    assert_eq!(doc.obj_count(o), 30);
    for i in 0..60i64 {
        let key = format!("key{i:02}");
        let found = doc.obj_find(o, key.as_bytes());
        if i % 2 == 0 {
            assert!(found.is_none(), "removed key {key} still found");
        } else {
            assert_eq!(doc.to_i64(found, -1), i);
        }
    }
}

#[test]
fn remove_head_tail_middle_keeps_order() {
    let mut doc = Doc::new();
    let o = doc.object();
    for (k, v) in [(&b"a"[..], 1i64), (b"b", 2), (b"c", 3)] {
        let n = doc.number_i64(v);
        doc.obj_append(o, k, n);
    }
    assert_eq!(doc.obj_count(o), 3);

    assert!(doc.obj_remove(o, b"a"));
    assert_eq!(doc.obj_count(o), 2);
    assert!(doc.obj_scan(o, b"a").is_none());
    assert_eq!(doc.dump_compact(o), b"{\"b\":2,\"c\":3}");

    assert!(doc.obj_remove(o, b"c"));
    assert_eq!(doc.obj_count(o), 1);
    assert_eq!(doc.dump_compact(o), b"{\"b\":2}");

    assert!(doc.obj_remove(o, b"b"));
    assert_eq!(doc.obj_count(o), 0);
    assert_eq!(doc.dump_compact(o), b"{}");

    assert!(!doc.obj_remove(o, b"b"));
}

#[test]
fn duplicate_keys_lookup_returns_a_match() {
    let mut doc = Doc::new();
    let j = doc.parse(b"{\"x\":1,\"x\":2}");
    assert!(!doc.is_error(j));
    let got_node = doc.obj_get(j, b"x");
    let got = doc.to_view(got_node, b"?").to_vec();
    assert!(got == b"1" || got == b"2");
    let found_node = doc.obj_find(j, b"x");
    let found = doc.to_view(found_node, b"?").to_vec();
    assert!(found == b"1" || found == b"2");
}

#[test]
fn count_is_zero_for_non_objects() {
    let mut doc = Doc::new();
    let n = doc.null();
    assert_eq!(doc.obj_count(n), 0);
    let a = doc.array();
    assert_eq!(doc.obj_count(a), 0);
}

#[test]
fn parent_pointers_track_membership() {
    let mut doc = Doc::new();
    let o = doc.object();
    let v = doc.number_i64(5);
    doc.obj_append(o, b"k", v);
    assert_eq!(doc.parent(v), Some(o));
    assert!(doc.obj_remove(o, b"k"));
    assert_eq!(doc.parent(v), None);
}

#[test]
fn append_ref_aliases_key_bytes() {
    let key: &[u8] = b"shared-key";
    let mut doc = Doc::new();
    let o = doc.object();
    let v = doc.number_i64(1);
    let e = doc.obj_append_ref(o, key, v).unwrap();
    assert!(std::ptr::eq(doc.obj_entry_key(e).as_ptr(), key.as_ptr()));
}
