//! The document arena: node storage, builders, and scalar accessors.

use std::borrow::Cow;
use std::fmt;

use crate::array::{ArrEntry, ArrNode};
use crate::codec;
use crate::error::ParseError;
use crate::node::{ArrEntryId, Kind, Node, NodeData, NodeId, ObjEntryId};
use crate::object::{ObjEntry, ObjNode};
use crate::parser::Parser;

/// An arena-owned forest of JSON values.
///
/// Every node, container entry, and copied byte buffer lives in the
/// document and is freed collectively when it is dropped. Borrowed string
/// payloads (from [`Doc::parse`] or the `*_ref` builders) tie the document
/// to the source lifetime `'a`; erased entries are unlinked but their
/// arena slots are never reused.
pub struct Doc<'a> {
    pub(crate) nodes: Vec<Node<'a>>,
    pub(crate) arr_entries: Vec<ArrEntry>,
    pub(crate) obj_entries: Vec<ObjEntry<'a>>,
}

impl<'a> Default for Doc<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Doc<'a> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            arr_entries: Vec::new(),
            obj_entries: Vec::new(),
        }
    }

    // ---- Parsing ----

    /// Parses a JSON value from `src`, returning the root node.
    ///
    /// Scalar payloads borrow from `src`; the buffer is never modified.
    /// On failure the returned node is an error node (see
    /// [`Doc::parse_error`]) positioned at the offending byte. Trailing
    /// bytes after a complete top-level value are ignored.
    pub fn parse(&mut self, src: &'a [u8]) -> NodeId {
        Parser::new(self, src).parse()
    }

    /// [`Doc::parse`] over `&str` input.
    pub fn parse_str(&mut self, src: &'a str) -> NodeId {
        self.parse(src.as_bytes())
    }

    // ---- Builders ----

    pub(crate) fn push_node(&mut self, data: NodeData<'a>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { data, parent: None });
        id
    }

    pub fn null(&mut self) -> NodeId {
        self.push_node(NodeData::Null)
    }

    pub fn bool_true(&mut self) -> NodeId {
        self.push_node(NodeData::Bool(true))
    }

    pub fn bool_false(&mut self) -> NodeId {
        self.push_node(NodeData::Bool(false))
    }

    /// The literal `0` (kind [`Kind::Zero`]).
    pub fn zero(&mut self) -> NodeId {
        self.push_node(NodeData::Zero)
    }

    pub fn object(&mut self) -> NodeId {
        self.push_node(NodeData::Object(ObjNode::new()))
    }

    pub fn array(&mut self) -> NodeId {
        self.push_node(NodeData::Array(ArrNode::new()))
    }

    pub fn number_i64(&mut self, n: i64) -> NodeId {
        let mut buf = itoa::Buffer::new();
        let text = buf.format(n).as_bytes().to_vec();
        self.push_node(NodeData::Number(Cow::Owned(text)))
    }

    pub fn number_u64(&mut self, n: u64) -> NodeId {
        let mut buf = itoa::Buffer::new();
        let text = buf.format(n).as_bytes().to_vec();
        self.push_node(NodeData::Number(Cow::Owned(text)))
    }

    /// Number node from literal text; the text is stored as given.
    pub fn number_text(&mut self, s: &str) -> NodeId {
        self.push_node(NodeData::Number(Cow::Owned(s.as_bytes().to_vec())))
    }

    /// Decimal node from literal text; the text is stored as given.
    pub fn decimal_text(&mut self, s: &str) -> NodeId {
        self.push_node(NodeData::Decimal(Cow::Owned(s.as_bytes().to_vec())))
    }

    /// Number node from formatted text, e.g.
    /// `doc.number_fmt(format_args!("{}{}", 12, "34"))`.
    pub fn number_fmt(&mut self, args: fmt::Arguments<'_>) -> NodeId {
        let text = fmt::format(args).into_bytes();
        self.push_node(NodeData::Number(Cow::Owned(text)))
    }

    /// Decimal node from formatted text.
    pub fn decimal_fmt(&mut self, args: fmt::Arguments<'_>) -> NodeId {
        let text = fmt::format(args).into_bytes();
        self.push_node(NodeData::Decimal(Cow::Owned(text)))
    }

    /// String node from already-encoded bytes, copied into the arena.
    ///
    /// No escaping is applied; bytes that would break the JSON surface
    /// (an unescaped quote, say) are emitted as stored.
    pub fn string(&mut self, s: &[u8]) -> NodeId {
        self.push_node(NodeData::String(Cow::Owned(s.to_vec())))
    }

    /// String node aliasing already-encoded caller bytes.
    ///
    /// The source must outlive the document; later changes to it are
    /// visible through the node.
    pub fn string_ref(&mut self, s: &'a [u8]) -> NodeId {
        self.push_node(NodeData::String(Cow::Borrowed(s)))
    }

    /// String node from raw bytes, escaped and stored in the arena.
    pub fn string_encoded(&mut self, s: &[u8]) -> NodeId {
        let enc = codec::encode(s).into_owned();
        self.push_node(NodeData::String(Cow::Owned(enc)))
    }

    /// String node from raw caller bytes; aliases the source when no byte
    /// needs escaping, otherwise stores the escaped copy.
    pub fn string_encoded_ref(&mut self, s: &'a [u8]) -> NodeId {
        let enc = codec::encode(s);
        self.push_node(NodeData::String(enc))
    }

    pub(crate) fn error_node(&mut self, err: ParseError) -> NodeId {
        self.push_node(NodeData::Error(err))
    }

    // ---- Predicates and views ----

    pub fn kind(&self, j: NodeId) -> Kind {
        self.nodes[j.idx()].kind()
    }

    pub fn is_error(&self, j: NodeId) -> bool {
        self.kind(j) == Kind::Error
    }

    pub fn is_object(&self, j: NodeId) -> bool {
        self.kind(j) == Kind::Object
    }

    pub fn is_array(&self, j: NodeId) -> bool {
        self.kind(j) == Kind::Array
    }

    pub fn is_null(&self, j: NodeId) -> bool {
        self.kind(j) == Kind::Null
    }

    pub fn is_bool(&self, j: NodeId) -> bool {
        matches!(self.kind(j), Kind::True | Kind::False)
    }

    pub fn is_string(&self, j: NodeId) -> bool {
        self.kind(j) == Kind::String
    }

    pub fn is_number(&self, j: NodeId) -> bool {
        self.kind(j).is_number()
    }

    pub fn parent(&self, j: NodeId) -> Option<NodeId> {
        self.nodes[j.idx()].parent
    }

    /// The scalar's stored textual form: the encoded body for strings, the
    /// literal text for numbers and `true`/`false`/`0`. `None` for `null`,
    /// containers, and errors.
    pub fn scalar_bytes(&self, j: NodeId) -> Option<&[u8]> {
        self.nodes[j.idx()].view()
    }

    /// Decoded form: strings run through the escape decoder, other scalars
    /// return their literal text. `None` for `null`, containers, errors.
    pub fn decoded(&self, j: NodeId) -> Option<Cow<'_, [u8]>> {
        match &self.nodes[j.idx()].data {
            NodeData::String(t) => Some(codec::decode(t.as_ref())),
            NodeData::Number(t) | NodeData::Decimal(t) => Some(Cow::Borrowed(t.as_ref())),
            NodeData::Bool(true) => Some(Cow::Borrowed(b"true")),
            NodeData::Bool(false) => Some(Cow::Borrowed(b"false")),
            NodeData::Zero => Some(Cow::Borrowed(b"0")),
            _ => None,
        }
    }

    /// The parse failure carried by an error node.
    pub fn parse_error(&self, j: NodeId) -> Option<&ParseError> {
        match &self.nodes[j.idx()].data {
            NodeData::Error(e) => Some(e),
            _ => None,
        }
    }

    // ---- Entry accessors ----

    pub fn obj_entry_key(&self, e: ObjEntryId) -> &[u8] {
        self.obj_entries[e.idx()].key.as_ref()
    }

    pub fn obj_entry_value(&self, e: ObjEntryId) -> NodeId {
        self.obj_entries[e.idx()].value
    }

    pub fn arr_entry_value(&self, e: ArrEntryId) -> NodeId {
        self.arr_entries[e.idx()].value
    }
}
