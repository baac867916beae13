//! Single-pass JSON parser building the node tree in place.
//!
//! The machine has three states: expecting a value, expecting an object
//! key, and sitting after a value inside a container. The chain of open
//! containers is implicit — closing one walks the `parent` id. The input
//! is never modified; scalar payloads are stored as borrowed slices.

use std::borrow::Cow;

use crate::error::ParseError;
use crate::node::{NodeData, NodeId};
use crate::Doc;

const SP: u8 = 0x20;
const TAB: u8 = 0x09;
const LF: u8 = 0x0A;
const CR: u8 = 0x0D;

enum St {
    Value,
    Key,
    Post,
}

enum Scalar<'a> {
    String(&'a [u8]),
    Number(&'a [u8]),
    Decimal(&'a [u8]),
    Zero,
    True,
    False,
    Null,
}

pub(crate) struct Parser<'d, 'a> {
    doc: &'d mut Doc<'a>,
    src: &'a [u8],
    pos: usize,
}

impl<'d, 'a> Parser<'d, 'a> {
    pub(crate) fn new(doc: &'d mut Doc<'a>, src: &'a [u8]) -> Self {
        Self { doc, src, pos: 0 }
    }

    pub(crate) fn parse(mut self) -> NodeId {
        match self.run() {
            Ok(id) => id,
            Err(offset) => {
                let err = ParseError::at(self.src, offset);
                self.doc.error_node(err)
            }
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(SP | TAB | LF | CR)) {
            self.pos += 1;
        }
    }

    fn run(&mut self) -> Result<NodeId, usize> {
        let mut container: Option<NodeId> = None;
        let mut key: Option<&'a [u8]> = None;
        let mut state = St::Value;
        let mut after_comma = false;

        loop {
            match state {
                St::Value => {
                    self.skip_ws();
                    let Some(c) = self.peek() else {
                        return Err(self.src.len());
                    };
                    match c {
                        b'{' => {
                            self.pos += 1;
                            let id = self.doc.object();
                            self.attach(container, key.take(), id);
                            container = Some(id);
                            state = St::Key;
                            after_comma = false;
                        }
                        b'[' => {
                            self.pos += 1;
                            let id = self.doc.array();
                            self.attach(container, key.take(), id);
                            container = Some(id);
                            state = St::Value;
                            after_comma = false;
                        }
                        b']' if !after_comma && self.is_array(container) => {
                            self.pos += 1;
                            match self.close(&mut container) {
                                Some(root) => return Ok(root),
                                None => state = St::Post,
                            }
                        }
                        _ => {
                            let scalar = self.scalar()?;
                            let id = self.make_scalar(scalar);
                            self.attach(container, key.take(), id);
                            match container {
                                // Top-level value; trailing bytes are ignored.
                                None => return Ok(id),
                                Some(_) => state = St::Post,
                            }
                        }
                    }
                }
                St::Key => {
                    self.skip_ws();
                    let Some(c) = self.peek() else {
                        return Err(self.src.len());
                    };
                    match c {
                        b'"' => {
                            self.pos += 1;
                            let k = self.string_body()?;
                            self.skip_ws();
                            if self.peek() != Some(b':') {
                                return Err(self.pos + 1);
                            }
                            self.pos += 1;
                            key = Some(k);
                            state = St::Value;
                        }
                        b'}' if !after_comma => {
                            self.pos += 1;
                            match self.close(&mut container) {
                                Some(root) => return Ok(root),
                                None => state = St::Post,
                            }
                        }
                        _ => return Err(self.pos + 1),
                    }
                }
                St::Post => {
                    self.skip_ws();
                    let Some(c) = self.peek() else {
                        return Err(self.src.len());
                    };
                    let in_object = self.is_object(container);
                    match c {
                        b',' => {
                            self.pos += 1;
                            after_comma = true;
                            state = if in_object { St::Key } else { St::Value };
                        }
                        b'}' if in_object => {
                            self.pos += 1;
                            match self.close(&mut container) {
                                Some(root) => return Ok(root),
                                None => state = St::Post,
                            }
                        }
                        b']' if !in_object => {
                            self.pos += 1;
                            match self.close(&mut container) {
                                Some(root) => return Ok(root),
                                None => state = St::Post,
                            }
                        }
                        _ => return Err(self.pos + 1),
                    }
                }
            }
        }
    }

    fn is_object(&self, container: Option<NodeId>) -> bool {
        container.is_some_and(|c| self.doc.is_object(c))
    }

    fn is_array(&self, container: Option<NodeId>) -> bool {
        container.is_some_and(|c| self.doc.is_array(c))
    }

    fn attach(&mut self, container: Option<NodeId>, key: Option<&'a [u8]>, id: NodeId) {
        let Some(c) = container else {
            return;
        };
        if self.doc.is_object(c) {
            let key = key.expect("object value carries a key");
            self.doc.obj_append_key(c, Cow::Borrowed(key), id);
        } else {
            self.doc.arr_append(c, id);
        }
    }

    /// Pops the innermost container. Returns the root when it was the
    /// outermost one.
    fn close(&mut self, container: &mut Option<NodeId>) -> Option<NodeId> {
        let c = container.expect("close inside a container");
        match self.doc.parent(c) {
            None => Some(c),
            Some(p) => {
                *container = Some(p);
                None
            }
        }
    }

    fn make_scalar(&mut self, s: Scalar<'a>) -> NodeId {
        match s {
            Scalar::String(t) => self.doc.push_node(NodeData::String(Cow::Borrowed(t))),
            Scalar::Number(t) => self.doc.push_node(NodeData::Number(Cow::Borrowed(t))),
            Scalar::Decimal(t) => self.doc.push_node(NodeData::Decimal(Cow::Borrowed(t))),
            Scalar::Zero => self.doc.push_node(NodeData::Zero),
            Scalar::True => self.doc.push_node(NodeData::Bool(true)),
            Scalar::False => self.doc.push_node(NodeData::Bool(false)),
            Scalar::Null => self.doc.push_node(NodeData::Null),
        }
    }

    fn scalar(&mut self) -> Result<Scalar<'a>, usize> {
        match self.peek().expect("caller checked") {
            b'"' => {
                self.pos += 1;
                Ok(Scalar::String(self.string_body()?))
            }
            b't' => self.literal(b"true", Scalar::True),
            b'f' => self.literal(b"false", Scalar::False),
            b'n' => self.literal(b"null", Scalar::Null),
            b'-' | b'0'..=b'9' => self.number(),
            _ => Err(self.pos + 1),
        }
    }

    /// Case-sensitive literal; the error points one past the first
    /// mismatching byte.
    fn literal(&mut self, lit: &'static [u8], out: Scalar<'a>) -> Result<Scalar<'a>, usize> {
        for (k, &b) in lit.iter().enumerate() {
            if self.src.get(self.pos + k) != Some(&b) {
                return Err(self.pos + k + 1);
            }
        }
        self.pos += lit.len();
        Ok(out)
    }

    /// Number production. Leading zeros are rejected; the literal `0` maps
    /// to the zero kind, any text with a fraction to decimal, the rest
    /// (including `-0` and exponent forms) to number.
    fn number(&mut self) -> Result<Scalar<'a>, usize> {
        let src = self.src;
        let start = self.pos;
        let mut i = start;
        if src.get(i) == Some(&b'-') {
            i += 1;
        }
        match src.get(i) {
            Some(b'0') => {
                i += 1;
                if matches!(src.get(i), Some(b'0'..=b'9')) {
                    return Err(i + 1);
                }
            }
            Some(b'1'..=b'9') => {
                i += 1;
                while matches!(src.get(i), Some(b'0'..=b'9')) {
                    i += 1;
                }
            }
            _ => return Err(i + 1),
        }
        let mut decimal = false;
        if src.get(i) == Some(&b'.') {
            decimal = true;
            i += 1;
            if !matches!(src.get(i), Some(b'0'..=b'9')) {
                return Err(i + 1);
            }
            while matches!(src.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        if matches!(src.get(i), Some(b'e' | b'E')) {
            i += 1;
            if matches!(src.get(i), Some(b'+' | b'-')) {
                i += 1;
            }
            if !matches!(src.get(i), Some(b'0'..=b'9')) {
                return Err(i + 1);
            }
            while matches!(src.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        self.pos = i;
        let text = &src[start..i];
        Ok(if text == b"0" {
            Scalar::Zero
        } else if decimal {
            Scalar::Decimal(text)
        } else {
            Scalar::Number(text)
        })
    }

    /// String body after the opening quote. The closing quote is the next
    /// `"` preceded by an even run of backslashes; the body is returned
    /// verbatim, escapes included.
    fn string_body(&mut self) -> Result<&'a [u8], usize> {
        let src = self.src;
        let start = self.pos;
        let mut from = start;
        loop {
            let Some(k) = memchr::memchr(b'"', &src[from..]) else {
                return Err(src.len());
            };
            let q = from + k;
            let mut backslashes = 0;
            while q > backslashes && src[q - backslashes - 1] == b'\\' {
                backslashes += 1;
            }
            if backslashes % 2 == 1 {
                from = q + 1;
                continue;
            }
            self.pos = q + 1;
            return Ok(&src[start..q]);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Doc, Kind};

    #[test]
    fn test_scalar_root() {
        let mut doc = Doc::new();
        let j = doc.parse(b"42");
        assert_eq!(doc.kind(j), Kind::Number);
        assert_eq!(doc.scalar_bytes(j), Some(&b"42"[..]));
    }

    #[test]
    fn test_string_with_escaped_quote() {
        let mut doc = Doc::new();
        let j = doc.parse(br#"{"k":"x\"y"}"#);
        assert!(!doc.is_error(j));
        let v = doc.obj_scan(j, b"k").unwrap();
        assert_eq!(doc.scalar_bytes(v), Some(&br#"x\"y"#[..]));
    }

    #[test]
    fn test_even_backslash_run_closes_string() {
        let mut doc = Doc::new();
        // body is `a\\` — the quote after an even run closes the string
        let j = doc.parse(br#"{"k":"a\\"}"#);
        assert!(!doc.is_error(j));
        let v = doc.obj_scan(j, b"k").unwrap();
        assert_eq!(doc.scalar_bytes(v), Some(&br"a\\"[..]));
    }

    #[test]
    fn test_nested_containers_set_parents() {
        let mut doc = Doc::new();
        let j = doc.parse(b"{\"a\":[{\"b\":1}]}");
        assert!(!doc.is_error(j));
        let arr = doc.obj_scan(j, b"a").unwrap();
        assert_eq!(doc.parent(arr), Some(j));
        let inner = doc.arr_scan_index(arr, 0).unwrap();
        assert_eq!(doc.parent(inner), Some(arr));
    }

    #[test]
    fn test_error_offset_is_one_past() {
        let mut doc = Doc::new();
        let j = doc.parse(b"[1,2,,3]");
        let err = doc.parse_error(j).expect("error node");
        assert_eq!(err.offset, 6);
    }

    #[test]
    fn test_empty_input_is_error() {
        let mut doc = Doc::new();
        let j = doc.parse(b"");
        assert!(doc.is_error(j));
    }
}
