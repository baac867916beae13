//! Scalar conversions and array extractors.
//!
//! The free functions parse a scalar's textual view; the whole string must
//! parse and overflow is a miss. The `Doc` methods take `Option<NodeId>` so
//! lookup misses flow straight into the default, e.g.
//! `doc.to_i64(doc.obj_scan(o, b"n"), -1)`.

use std::borrow::Cow;

use crate::node::NodeId;
use crate::Doc;

fn as_str(s: &[u8]) -> Option<&str> {
    std::str::from_utf8(s).ok()
}

pub fn try_to_i32(s: &[u8]) -> Option<i32> {
    as_str(s)?.parse().ok()
}

pub fn try_to_u32(s: &[u8]) -> Option<u32> {
    as_str(s)?.parse().ok()
}

pub fn try_to_i64(s: &[u8]) -> Option<i64> {
    as_str(s)?.parse().ok()
}

pub fn try_to_u64(s: &[u8]) -> Option<u64> {
    as_str(s)?.parse().ok()
}

pub fn try_to_f32(s: &[u8]) -> Option<f32> {
    as_str(s)?.parse().ok()
}

pub fn try_to_f64(s: &[u8]) -> Option<f64> {
    as_str(s)?.parse().ok()
}

/// Case-insensitive `true`/`yes`/`1` and `false`/`no`/`0`; `"0"` is false
/// no matter what default a caller would apply. Anything else misses.
pub fn try_to_bool(s: &[u8]) -> Option<bool> {
    if s.eq_ignore_ascii_case(b"true") || s.eq_ignore_ascii_case(b"yes") || s == b"1" {
        Some(true)
    } else if s.eq_ignore_ascii_case(b"false") || s.eq_ignore_ascii_case(b"no") || s == b"0" {
        Some(false)
    } else {
        None
    }
}

macro_rules! doc_converters {
    ($(($to:ident, $try:ident, $ty:ty)),+ $(,)?) => {
        // `try_to_*` reports a miss as `None`; `to_*` substitutes the
        // caller's default. Both see through `Option<NodeId>` lookups.
        impl<'a> Doc<'a> {
            $(
                pub fn $try(&self, j: Option<NodeId>) -> Option<$ty> {
                    $try(self.scalar_bytes(j?)?)
                }

                pub fn $to(&self, j: Option<NodeId>, default: $ty) -> $ty {
                    self.$try(j).unwrap_or(default)
                }
            )+
        }
    };
}

doc_converters!(
    (to_i32, try_to_i32, i32),
    (to_u32, try_to_u32, u32),
    (to_i64, try_to_i64, i64),
    (to_u64, try_to_u64, u64),
    (to_f32, try_to_f32, f32),
    (to_f64, try_to_f64, f64),
    (to_bool, try_to_bool, bool),
);

impl<'a> Doc<'a> {
    /// Encoded textual view, or `default` for misses and viewless nodes.
    pub fn to_view<'s>(&'s self, j: Option<NodeId>, default: &'s [u8]) -> &'s [u8] {
        j.and_then(|j| self.scalar_bytes(j)).unwrap_or(default)
    }

    /// Decoded string, or `default` for misses and viewless nodes.
    pub fn to_decoded<'s>(&'s self, j: Option<NodeId>, default: &'s [u8]) -> Cow<'s, [u8]> {
        match j.and_then(|j| self.decoded(j)) {
            Some(d) => d,
            None => Cow::Borrowed(default),
        }
    }

    /// Decoded strings of an array's elements; a scalar yields a singleton.
    /// Elements without a textual view contribute an empty string.
    pub fn extract_string_array(&self, j: Option<NodeId>) -> Vec<String> {
        let Some(j) = j else {
            return Vec::new();
        };
        if self.is_array(j) {
            let mut out = Vec::with_capacity(self.arr_count(j));
            let mut e = self.arr_first(j);
            while let Some(ei) = e {
                let v = self.arr_entry_value(ei);
                out.push(self.decoded_string(v));
                e = self.arr_next(ei);
            }
            return out;
        }
        if self.decoded(j).is_some() {
            vec![self.decoded_string(j)]
        } else {
            Vec::new()
        }
    }

    /// Float values of an array's elements; a scalar yields a singleton.
    /// Non-numeric elements coerce to `0.0`.
    pub fn extract_float_array(&self, j: Option<NodeId>) -> Vec<f32> {
        let Some(j) = j else {
            return Vec::new();
        };
        if self.is_array(j) {
            let mut out = Vec::with_capacity(self.arr_count(j));
            let mut e = self.arr_first(j);
            while let Some(ei) = e {
                let v = self.arr_entry_value(ei);
                out.push(self.to_f32(Some(v), 0.0));
                e = self.arr_next(ei);
            }
            return out;
        }
        vec![self.to_f32(Some(j), 0.0)]
    }

    fn decoded_string(&self, j: NodeId) -> String {
        match self.decoded(j) {
            Some(d) => String::from_utf8_lossy(d.as_ref()).into_owned(),
            None => String::new(),
        }
    }
}
