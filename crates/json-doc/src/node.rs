//! Node model: ids, kinds, and the tagged value record.

use std::borrow::Cow;

use crate::array::ArrNode;
use crate::error::ParseError;
use crate::object::ObjNode;

/// Index of a node in the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

/// Index of an object entry in the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjEntryId(pub(crate) u32);

/// Index of an array entry in the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrEntryId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

impl ObjEntryId {
    #[inline]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

impl ArrEntryId {
    #[inline]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Observable type of a node.
///
/// `False`, `Zero`, and `Null` group the false-like values; `Number`,
/// `Decimal`, and `True` the true-like ones. `Zero` is the literal `0`
/// exactly; every other number is `Number` or (with a fraction) `Decimal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Error,
    Object,
    Array,
    Null,
    String,
    False,
    Zero,
    Number,
    Decimal,
    True,
}

impl Kind {
    /// Scalars that expose a textual view (everything but containers,
    /// `null`, and errors).
    pub fn has_view(self) -> bool {
        matches!(
            self,
            Kind::String | Kind::False | Kind::Zero | Kind::Number | Kind::Decimal | Kind::True
        )
    }

    pub fn is_number(self) -> bool {
        matches!(self, Kind::Zero | Kind::Number | Kind::Decimal)
    }
}

/// Payload bytes: borrowed from the parsed source / an aliased caller
/// buffer, or owned by the document arena.
pub(crate) type Text<'a> = Cow<'a, [u8]>;

pub(crate) enum NodeData<'a> {
    Error(ParseError),
    Object(ObjNode),
    Array(ArrNode),
    Null,
    Bool(bool),
    Zero,
    /// Integer literal text (sign and exponent allowed).
    Number(Text<'a>),
    /// Number literal text containing a fraction.
    Decimal(Text<'a>),
    /// JSON-encoded string body, without the surrounding quotes.
    String(Text<'a>),
}

pub(crate) struct Node<'a> {
    pub(crate) data: NodeData<'a>,
    pub(crate) parent: Option<NodeId>,
}

impl<'a> Node<'a> {
    pub(crate) fn kind(&self) -> Kind {
        match &self.data {
            NodeData::Error(_) => Kind::Error,
            NodeData::Object(_) => Kind::Object,
            NodeData::Array(_) => Kind::Array,
            NodeData::Null => Kind::Null,
            NodeData::Bool(false) => Kind::False,
            NodeData::Bool(true) => Kind::True,
            NodeData::Zero => Kind::Zero,
            NodeData::Number(_) => Kind::Number,
            NodeData::Decimal(_) => Kind::Decimal,
            NodeData::String(_) => Kind::String,
        }
    }

    /// Textual view of a scalar, in its stored (encoded) form.
    pub(crate) fn view(&self) -> Option<&[u8]> {
        match &self.data {
            NodeData::String(t) | NodeData::Number(t) | NodeData::Decimal(t) => Some(t.as_ref()),
            NodeData::Bool(true) => Some(b"true"),
            NodeData::Bool(false) => Some(b"false"),
            NodeData::Zero => Some(b"0"),
            _ => None,
        }
    }
}
