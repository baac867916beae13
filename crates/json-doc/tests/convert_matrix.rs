//! Converters and extractors over tree nodes.

use json_doc::{convert, Doc};

#[test]
fn converters_compose_with_lookups() {
    let mut doc = Doc::new();
    let j = doc.parse(b"{\"n\":123,\"d\":3.5,\"t\":true,\"s\":\"42\"}");
    assert!(!doc.is_error(j));

    assert_eq!(doc.to_i64(doc.obj_scan(j, b"n"), -1), 123);
    assert!((doc.to_f64(doc.obj_scan(j, b"d"), 0.0) - 3.5).abs() < 1e-9);
    assert!(doc.to_bool(doc.obj_scan(j, b"t"), false));
    // numeric-looking strings parse
    assert_eq!(doc.to_i64(doc.obj_scan(j, b"s"), -1), 42);

    // misses fall back to the default through every lookup flavor
    assert_eq!(doc.to_i64(doc.obj_scan(j, b"missing"), -1), -1);
    let got = doc.obj_get(j, b"missing");
    assert_eq!(doc.to_i64(got, -2), -2);
    let found = doc.obj_find(j, b"missing");
    assert_eq!(doc.to_i64(found, -3), -3);
}

#[test]
fn non_value_nodes_return_defaults() {
    let mut doc = Doc::new();
    let o = doc.object();
    let a = doc.array();
    let null = doc.null();
    assert_eq!(doc.to_i32(Some(o), 5), 5);
    assert_eq!(doc.to_i32(Some(a), 6), 6);
    assert_eq!(doc.to_i32(Some(null), 11), 11);
    assert_eq!(doc.to_f64(Some(o), 1.0), 1.0);
    assert!(doc.to_bool(Some(a), true));
    assert_eq!(doc.to_i32(None, 7), 7);
}

#[test]
fn bool_nodes_and_policy() {
    let mut doc = Doc::new();
    let t = doc.bool_true();
    let f = doc.bool_false();
    let z = doc.zero();
    let n = doc.number_i64(-42);

    assert!(doc.to_bool(Some(t), false));
    assert!(!doc.to_bool(Some(f), true));
    // "0" is false even against a true default
    assert!(!doc.to_bool(Some(z), true));
    // other numeric text is not boolean: the default survives
    assert!(!doc.to_bool(Some(n), false));
    assert!(doc.to_bool(Some(n), true));

    let yes = doc.string(b"yes");
    let upper = doc.string(b"FALSE");
    let vague = doc.string(b"maybe");
    assert!(doc.to_bool(Some(yes), false));
    assert!(!doc.to_bool(Some(upper), true));
    assert_eq!(doc.try_to_bool(Some(vague)), None);
}

#[test]
fn try_variants_report_misses() {
    let mut doc = Doc::new();
    let good = doc.string(b"123");
    let bad = doc.string(b"12x");
    let exp = doc.string(b"3.5e1");
    assert_eq!(doc.try_to_i32(Some(good)), Some(123));
    assert_eq!(doc.try_to_i32(Some(bad)), None);
    assert_eq!(doc.try_to_f64(Some(exp)), Some(35.0));
    assert_eq!(doc.try_to_i32(None), None);
}

#[test]
fn integer_boundaries_and_overflow() {
    let mut doc = Doc::new();
    let umax = doc.string(b"18446744073709551615");
    let uover = doc.string(b"18446744073709551616");
    let uneg = doc.string(b"-1");
    assert_eq!(doc.to_u64(Some(umax), 0), u64::MAX);
    assert_eq!(doc.to_u64(Some(uover), 7), 7);
    assert_eq!(doc.to_u64(Some(uneg), 9), 9);

    let imin = doc.string(b"-9223372036854775808");
    let imax = doc.string(b"9223372036854775807");
    let below = doc.string(b"-9223372036854775809");
    let above = doc.string(b"9223372036854775808");
    assert_eq!(doc.to_i64(Some(imin), 1), i64::MIN);
    assert_eq!(doc.to_i64(Some(imax), 1), i64::MAX);
    assert_eq!(doc.to_i64(Some(below), 13), 13);
    assert_eq!(doc.to_i64(Some(above), 17), 17);

    let u32max = doc.string(b"4294967295");
    assert_eq!(doc.to_u32(Some(u32max), 0), u32::MAX);
}

#[test]
fn view_and_decoded_defaults() {
    let mut doc = Doc::new();
    let null = doc.null();
    assert_eq!(doc.to_view(Some(null), b"DEF"), b"DEF");
    assert_eq!(doc.to_decoded(Some(null), b"DEF2").as_ref(), b"DEF2");

    let mut doc2 = Doc::new();
    let err = doc2.parse(b"{,}");
    assert!(doc2.is_error(err));
    assert_eq!(doc2.to_view(Some(err), b"DEF"), b"DEF");

    let s = doc.string(b"a\\tb");
    assert_eq!(doc.to_view(Some(s), b"?"), b"a\\tb");
    assert_eq!(doc.to_decoded(Some(s), b"?").as_ref(), b"a\tb");
}

#[test]
fn string_array_extraction() {
    let mut doc = Doc::new();

    // scalar yields a singleton
    let solo = doc.string(b"solo");
    assert_eq!(doc.extract_string_array(Some(solo)), ["solo"]);

    let arr = doc.array();
    for s in [&b"a"[..], b"b", b"c"] {
        let n = doc.string(s);
        doc.arr_append(arr, n);
    }
    assert_eq!(doc.extract_string_array(Some(arr)), ["a", "b", "c"]);

    // decoded form is used
    let esc = doc.array();
    let n = doc.string(b"x\\ny");
    doc.arr_append(esc, n);
    assert_eq!(doc.extract_string_array(Some(esc)), ["x\ny"]);

    assert!(doc.extract_string_array(None).is_empty());
}

#[test]
fn float_array_coerces_non_numeric_to_zero() {
    let mut doc = Doc::new();
    let arr = doc.array();
    let d = doc.decimal_text("1.25");
    let n = doc.number_i64(2);
    let s = doc.string(b"x");
    doc.arr_append(arr, d);
    doc.arr_append(arr, n);
    doc.arr_append(arr, s);

    let out = doc.extract_float_array(Some(arr));
    assert_eq!(out.len(), 3);
    assert!((out[0] - 1.25).abs() < 1e-6);
    assert_eq!(out[1], 2.0);
    assert_eq!(out[2], 0.0);

    let scalar = doc.decimal_text("0.5");
    assert_eq!(doc.extract_float_array(Some(scalar)), [0.5]);
}

#[test]
fn free_functions_match_methods() {
    assert_eq!(convert::try_to_i64(b"99"), Some(99));
    assert_eq!(convert::try_to_bool(b"No"), Some(false));
    assert_eq!(convert::try_to_f32(b"1.5"), Some(1.5));
    assert_eq!(convert::try_to_u32(b"abc"), None);
}
