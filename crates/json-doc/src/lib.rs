//! Arena-backed JSON document engine.
//!
//! A [`Doc`] owns every node, container entry, and copied string of one or
//! more JSON trees. Parsing borrows the input buffer and stores scalar
//! payloads as slices into it; nothing is unescaped until asked for.
//! Emitters walk the tree into a growable buffer, a caller-sized memory
//! region, or an [`std::io::Write`] stream, with size estimators that are
//! exact for valid-UTF-8 content.
//!
//! Objects keep insertion order and offer three lookups: linear `scan`,
//! a sorted-snapshot `get` for read-mostly trees, and a tree-backed `find`
//! that stays current under `insert`. Arrays pair a linked entry list with
//! a lazily built direct-access table.
//!
//! # Example
//!
//! ```
//! use json_doc::Doc;
//!
//! let mut doc = Doc::new();
//! let root = doc.parse(br#"{"users":[{"id":"1"},{"id":"2"}]}"#);
//! assert!(!doc.is_error(root));
//! assert_eq!(doc.path_view(root, "users.1.id"), Some(&b"2"[..]));
//! assert_eq!(
//!     doc.dump_compact(root),
//!     br#"{"users":[{"id":"1"},{"id":"2"}]}"#.to_vec()
//! );
//! ```

pub mod codec;
pub mod convert;

mod array;
mod doc;
mod emit;
mod error;
mod node;
mod object;
mod parser;
mod path;

pub use doc::Doc;
pub use error::ParseError;
pub use node::{ArrEntryId, Kind, NodeId, ObjEntryId};
