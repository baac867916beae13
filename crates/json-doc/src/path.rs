//! Dotted-path lookup over a tree.
//!
//! Segments are split on `.`; a backslash escapes the following character,
//! so keys containing literal dots are addressed as `a\.b`. Against an
//! object a segment is a literal key (encoded form, scan semantics).
//! Against an array a segment of digits is an index, and `key=value`
//! selects the first element whose `key` scalar view equals `value`.

use std::borrow::Cow;

use crate::node::NodeId;
use crate::Doc;

/// Splits on `sep` honoring `esc`: an escaped separator (or any escaped
/// character) is taken literally and the escape byte dropped.
fn split_with_escape(sep: char, esc: char, s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut seg = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == esc {
            match chars.next() {
                Some(next) => seg.push(next),
                None => seg.push(c),
            }
        } else if c == sep {
            out.push(std::mem::take(&mut seg));
        } else {
            seg.push(c);
        }
    }
    out.push(seg);
    out
}

impl<'a> Doc<'a> {
    /// Resolves a dotted path from `j`; `None` on any miss.
    ///
    /// Array filters (`key=value`) compare against the encoded scalar view,
    /// not the decoded form.
    pub fn path(&self, j: NodeId, path: &str) -> Option<NodeId> {
        let mut curr = j;
        for seg in split_with_escape('.', '\\', path) {
            curr = self.path_step(curr, &seg)?;
        }
        Some(curr)
    }

    fn path_step(&self, j: NodeId, seg: &str) -> Option<NodeId> {
        if self.is_array(j) {
            if let Some((key, want)) = seg.split_once('=') {
                let mut e = self.arr_first(j);
                while let Some(ei) = e {
                    let child = self.arr_entry_value(ei);
                    let hit = self
                        .obj_scan(child, key.as_bytes())
                        .and_then(|v| self.scalar_bytes(v))
                        .is_some_and(|v| v == want.as_bytes());
                    if hit {
                        return Some(child);
                    }
                    e = self.arr_next(ei);
                }
                return None;
            }
            if seg.is_empty() || !seg.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let nth: isize = seg.parse().ok()?;
            return self.arr_scan_index(j, nth);
        }
        self.obj_scan(j, seg.as_bytes())
    }

    /// Path lookup returning the scalar's encoded textual view.
    pub fn path_view(&self, j: NodeId, path: &str) -> Option<&[u8]> {
        self.scalar_bytes(self.path(j, path)?)
    }

    /// Path lookup returning the decoded string.
    pub fn path_decoded(&self, j: NodeId, path: &str) -> Option<Cow<'_, [u8]>> {
        self.decoded(self.path(j, path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::split_with_escape;

    #[test]
    fn test_split_plain() {
        assert_eq!(split_with_escape('.', '\\', "a.b.c"), ["a", "b", "c"]);
    }

    #[test]
    fn test_split_escaped_dot() {
        assert_eq!(split_with_escape('.', '\\', "obj.x\\.y"), ["obj", "x.y"]);
    }

    #[test]
    fn test_split_trailing_escape() {
        assert_eq!(split_with_escape('.', '\\', "a\\"), ["a\\"]);
    }

    #[test]
    fn test_split_single_segment() {
        assert_eq!(split_with_escape('.', '\\', "users"), ["users"]);
    }
}
