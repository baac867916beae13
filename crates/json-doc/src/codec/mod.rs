//! Byte-level codecs: JSON string escaping and UTF-8 filtering.

mod escape;
mod utf8;

pub use escape::{decode, encode, needs_escape};
pub use utf8::filter_utf8;
