//! Emitters: one recursive walker over a byte sink.
//!
//! The counter sink accounts string payloads at face length while writing
//! sinks pass them through the UTF-8 filter, so an estimate equals the
//! written size plus the terminator slot exactly when every string payload
//! is valid UTF-8, and exceeds it otherwise. Keys are written verbatim;
//! error nodes emit nothing.

use std::io;

use json_doc_buffers::ByteBuf;

use crate::codec::filter_utf8;
use crate::node::{NodeData, NodeId};
use crate::Doc;

const DEFAULT_STEP: usize = 2;
const SPACES: [u8; 32] = [b' '; 32];

trait Sink {
    fn put(&mut self, bytes: &[u8]);

    #[inline]
    fn byte(&mut self, b: u8) {
        self.put(&[b]);
    }

    /// String payload path; writers filter, the counter does not.
    fn payload(&mut self, bytes: &[u8]) {
        filter_utf8(bytes, |run| self.put(run));
    }
}

/// Byte counter standing in for a writer.
struct Counter(usize);

impl Sink for Counter {
    fn put(&mut self, bytes: &[u8]) {
        self.0 += bytes.len();
    }

    fn payload(&mut self, bytes: &[u8]) {
        self.0 += bytes.len();
    }
}

impl Sink for ByteBuf {
    fn put(&mut self, bytes: &[u8]) {
        self.append_bytes(bytes);
    }

    fn byte(&mut self, b: u8) {
        self.append_byte(b);
    }
}

/// Writer into a caller-sized region; overflow is truncated.
struct SliceSink<'b> {
    out: &'b mut [u8],
    at: usize,
}

impl Sink for SliceSink<'_> {
    fn put(&mut self, bytes: &[u8]) {
        let n = bytes.len().min(self.out.len() - self.at);
        self.out[self.at..self.at + n].copy_from_slice(&bytes[..n]);
        self.at += n;
    }
}

/// Stream writer; the first error is latched and surfaced after the walk.
struct IoSink<'w, W: io::Write> {
    w: &'w mut W,
    err: Option<io::Error>,
}

impl<W: io::Write> Sink for IoSink<'_, W> {
    fn put(&mut self, bytes: &[u8]) {
        if self.err.is_none() {
            if let Err(e) = self.w.write_all(bytes) {
                self.err = Some(e);
            }
        }
    }
}

fn indent<S: Sink>(out: &mut S, mut n: usize) {
    while n > SPACES.len() {
        out.put(&SPACES);
        n -= SPACES.len();
    }
    out.put(&SPACES[..n]);
}

fn norm_step(step: i32) -> usize {
    if step <= 0 {
        DEFAULT_STEP
    } else {
        step as usize
    }
}

impl<'a> Doc<'a> {
    fn write<S: Sink>(&self, j: NodeId, out: &mut S) {
        match &self.nodes[j.idx()].data {
            NodeData::Error(_) => {}
            NodeData::Null => out.put(b"null"),
            NodeData::Bool(true) => out.put(b"true"),
            NodeData::Bool(false) => out.put(b"false"),
            NodeData::Zero => out.byte(b'0'),
            NodeData::Number(t) | NodeData::Decimal(t) => out.put(t.as_ref()),
            NodeData::String(t) => {
                out.byte(b'"');
                out.payload(t.as_ref());
                out.byte(b'"');
            }
            NodeData::Object(o) => {
                out.byte(b'{');
                let mut e = o.head;
                while let Some(ei) = e {
                    let entry = &self.obj_entries[ei.idx()];
                    out.byte(b'"');
                    out.put(entry.key.as_ref());
                    out.put(b"\":");
                    self.write(entry.value, out);
                    if entry.next.is_some() {
                        out.byte(b',');
                    }
                    e = entry.next;
                }
                out.byte(b'}');
            }
            NodeData::Array(a) => {
                out.byte(b'[');
                let mut e = a.head;
                while let Some(ei) = e {
                    let entry = &self.arr_entries[ei.idx()];
                    self.write(entry.value, out);
                    if entry.next.is_some() {
                        out.byte(b',');
                    }
                    e = entry.next;
                }
                out.byte(b']');
            }
        }
    }

    fn write_pretty<S: Sink>(&self, j: NodeId, depth: usize, step: usize, out: &mut S) {
        match &self.nodes[j.idx()].data {
            NodeData::Object(o) => {
                if o.count == 0 {
                    out.put(b"{}");
                    return;
                }
                out.byte(b'{');
                let mut e = o.head;
                while let Some(ei) = e {
                    let entry = &self.obj_entries[ei.idx()];
                    out.byte(b'\n');
                    indent(out, (depth + 1) * step);
                    out.byte(b'"');
                    out.put(entry.key.as_ref());
                    out.put(b"\": ");
                    self.write_pretty(entry.value, depth + 1, step, out);
                    if entry.next.is_some() {
                        out.byte(b',');
                    }
                    e = entry.next;
                }
                out.byte(b'\n');
                indent(out, depth * step);
                out.byte(b'}');
            }
            NodeData::Array(a) => {
                if a.count == 0 {
                    out.put(b"[]");
                    return;
                }
                out.byte(b'[');
                let mut e = a.head;
                while let Some(ei) = e {
                    let entry = &self.arr_entries[ei.idx()];
                    out.byte(b'\n');
                    indent(out, (depth + 1) * step);
                    self.write_pretty(entry.value, depth + 1, step, out);
                    if entry.next.is_some() {
                        out.byte(b',');
                    }
                    e = entry.next;
                }
                out.byte(b'\n');
                indent(out, depth * step);
                out.byte(b']');
            }
            _ => self.write(j, out),
        }
    }

    /// Compact size upper bound, including one byte for a terminator.
    /// Exact (written + 1) when every string payload is valid UTF-8.
    pub fn compact_estimate(&self, j: NodeId) -> usize {
        let mut c = Counter(0);
        self.write(j, &mut c);
        c.0 + 1
    }

    /// Pretty size upper bound, including one byte for a terminator;
    /// `step <= 0` means two spaces.
    pub fn pretty_estimate(&self, j: NodeId, step: i32) -> usize {
        let mut c = Counter(0);
        self.write_pretty(j, 0, norm_step(step), &mut c);
        c.0 + 1
    }

    /// Compact dump into a fresh vector.
    pub fn dump_compact(&self, j: NodeId) -> Vec<u8> {
        let mut buf = ByteBuf::with_capacity(self.compact_estimate(j));
        self.write(j, &mut buf);
        buf.into_vec()
    }

    /// Pretty dump into a fresh vector.
    pub fn dump_pretty(&self, j: NodeId, step: i32) -> Vec<u8> {
        let mut buf = ByteBuf::with_capacity(self.pretty_estimate(j, step));
        self.write_pretty(j, 0, norm_step(step), &mut buf);
        buf.into_vec()
    }

    /// Compact dump into a caller-sized region; returns the written
    /// length. Size the region with [`Doc::compact_estimate`].
    pub fn dump_compact_into(&self, j: NodeId, out: &mut [u8]) -> usize {
        let mut sink = SliceSink { out, at: 0 };
        self.write(j, &mut sink);
        sink.at
    }

    /// Pretty dump into a caller-sized region; returns the written length.
    pub fn dump_pretty_into(&self, j: NodeId, step: i32, out: &mut [u8]) -> usize {
        let mut sink = SliceSink { out, at: 0 };
        self.write_pretty(j, 0, norm_step(step), &mut sink);
        sink.at
    }

    /// Compact dump appended to a growable buffer. The buffer is pre-sized
    /// by the estimate; the final length is the bytes actually written.
    pub fn dump_compact_buf(&self, j: NodeId, out: &mut ByteBuf) {
        out.ensure_capacity(self.compact_estimate(j));
        self.write(j, out);
    }

    /// Pretty dump appended to a growable buffer.
    pub fn dump_pretty_buf(&self, j: NodeId, step: i32, out: &mut ByteBuf) {
        out.ensure_capacity(self.pretty_estimate(j, step));
        self.write_pretty(j, 0, norm_step(step), out);
    }

    /// Compact dump to a byte stream.
    pub fn dump_compact_writer<W: io::Write>(&self, j: NodeId, w: &mut W) -> io::Result<()> {
        let mut sink = IoSink { w, err: None };
        self.write(j, &mut sink);
        match sink.err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Pretty dump to a byte stream.
    pub fn dump_pretty_writer<W: io::Write>(
        &self,
        j: NodeId,
        step: i32,
        w: &mut W,
    ) -> io::Result<()> {
        let mut sink = IoSink { w, err: None };
        self.write_pretty(j, 0, norm_step(step), &mut sink);
        match sink.err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
