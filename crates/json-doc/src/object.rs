//! Insertion-ordered object engine with two lazy lookup indexes.
//!
//! Entries form a doubly linked list in insertion order. Lookups come in
//! three flavors: `scan`/`scan_rev` walk the list; `get` binary-searches a
//! sorted snapshot of entry ids built on first use; `find` searches a
//! balanced tree hooked intrusively into the entries. The two indexes are
//! mutually exclusive: activating one discards the other, so a stale
//! sibling can never shadow the active index.

mod avl;

use std::borrow::Cow;

use crate::node::{NodeData, NodeId, ObjEntryId, Text};
use crate::Doc;

/// Active lookup index of an object. At most one of the snapshot and the
/// tree exists at any time.
pub(crate) enum ObjIndex {
    None,
    /// Entry ids sorted by key bytes; built by `get`, dropped by `set`
    /// (on append) and `remove`. Appends are not reflected until rebuild.
    Snapshot(Vec<ObjEntryId>),
    /// Root of the intrusive AVL tree; built by `find`, kept current by
    /// `insert` and `remove`. Plain appends leave it stale.
    Tree(Option<ObjEntryId>),
}

pub(crate) struct ObjNode {
    pub(crate) head: Option<ObjEntryId>,
    pub(crate) tail: Option<ObjEntryId>,
    pub(crate) count: usize,
    pub(crate) index: ObjIndex,
}

impl ObjNode {
    pub(crate) fn new() -> Self {
        Self {
            head: None,
            tail: None,
            count: 0,
            index: ObjIndex::None,
        }
    }
}

pub(crate) struct ObjEntry<'a> {
    pub(crate) key: Text<'a>,
    pub(crate) value: NodeId,
    pub(crate) prev: Option<ObjEntryId>,
    pub(crate) next: Option<ObjEntryId>,
    // Tree hooks, live only while this entry is in the tree index.
    pub(crate) up: Option<ObjEntryId>,
    pub(crate) left: Option<ObjEntryId>,
    pub(crate) right: Option<ObjEntryId>,
    pub(crate) bf: i32,
}

impl<'a> ObjEntry<'a> {
    fn new(key: Text<'a>, value: NodeId) -> Self {
        Self {
            key,
            value,
            prev: None,
            next: None,
            up: None,
            left: None,
            right: None,
            bf: 0,
        }
    }

    fn clear_hooks(&mut self) {
        self.up = None;
        self.left = None;
        self.right = None;
        self.bf = 0;
    }
}

impl<'a> Doc<'a> {
    fn obj(&self, j: NodeId) -> Option<&ObjNode> {
        match &self.nodes[j.idx()].data {
            NodeData::Object(o) => Some(o),
            _ => None,
        }
    }

    fn obj_mut(&mut self, j: NodeId) -> Option<&mut ObjNode> {
        match &mut self.nodes[j.idx()].data {
            NodeData::Object(o) => Some(o),
            _ => None,
        }
    }

    /// `Some(root)` when the tree index is active.
    fn obj_tree_root(&self, j: NodeId) -> Option<Option<ObjEntryId>> {
        match &self.obj(j)?.index {
            ObjIndex::Tree(root) => Some(*root),
            _ => None,
        }
    }

    fn obj_has_snapshot(&self, j: NodeId) -> bool {
        matches!(
            self.obj(j).map(|o| &o.index),
            Some(ObjIndex::Snapshot(_))
        )
    }

    /// Appends `(key, value)` at the tail without consulting or updating
    /// any lookup index. Returns the new entry, or `None` when `obj` is
    /// not an object.
    pub fn obj_append(&mut self, obj: NodeId, key: &[u8], value: NodeId) -> Option<ObjEntryId> {
        self.obj_append_key(obj, Cow::Owned(key.to_vec()), value)
    }

    /// [`Doc::obj_append`] aliasing a caller-owned key.
    pub fn obj_append_ref(
        &mut self,
        obj: NodeId,
        key: &'a [u8],
        value: NodeId,
    ) -> Option<ObjEntryId> {
        self.obj_append_key(obj, Cow::Borrowed(key), value)
    }

    pub(crate) fn obj_append_key(
        &mut self,
        obj: NodeId,
        key: Text<'a>,
        value: NodeId,
    ) -> Option<ObjEntryId> {
        let tail = self.obj(obj)?.tail;
        let e = ObjEntryId(self.obj_entries.len() as u32);
        let mut entry = ObjEntry::new(key, value);
        entry.prev = tail;
        self.obj_entries.push(entry);
        if let Some(t) = tail {
            self.obj_entries[t.idx()].next = Some(e);
        }
        let o = self.obj_mut(obj).expect("object checked above");
        if o.head.is_none() {
            o.head = Some(e);
        }
        o.tail = Some(e);
        o.count += 1;
        self.nodes[value.idx()].parent = Some(obj);
        Some(e)
    }

    /// Linear lookup from the head; first entry with a byte-equal key.
    pub fn obj_scan(&self, obj: NodeId, key: &[u8]) -> Option<NodeId> {
        self.obj_scan_entry(obj, key)
            .map(|e| self.obj_entries[e.idx()].value)
    }

    /// Linear lookup from the tail; last entry with a byte-equal key.
    pub fn obj_scan_rev(&self, obj: NodeId, key: &[u8]) -> Option<NodeId> {
        let mut e = self.obj(obj)?.tail;
        while let Some(ei) = e {
            let entry = &self.obj_entries[ei.idx()];
            if entry.key.as_ref() == key {
                return Some(entry.value);
            }
            e = entry.prev;
        }
        None
    }

    pub(crate) fn obj_scan_entry(&self, obj: NodeId, key: &[u8]) -> Option<ObjEntryId> {
        let mut e = self.obj(obj)?.head;
        while let Some(ei) = e {
            let entry = &self.obj_entries[ei.idx()];
            if entry.key.as_ref() == key {
                return Some(ei);
            }
            e = entry.next;
        }
        None
    }

    /// Snapshot lookup. Builds the sorted snapshot from the live entry
    /// list on first use (discarding the tree index if it was active) and
    /// binary-searches it afterwards. Entries appended while the snapshot
    /// is active are invisible until `set` or `remove` drops it.
    pub fn obj_get(&mut self, obj: NodeId, key: &[u8]) -> Option<NodeId> {
        self.obj_get_entry(obj, key)
            .map(|e| self.obj_entries[e.idx()].value)
    }

    pub fn obj_get_entry(&mut self, obj: NodeId, key: &[u8]) -> Option<ObjEntryId> {
        if !self.obj_has_snapshot(obj) {
            self.obj(obj)?;
            let mut ids = Vec::with_capacity(self.obj(obj)?.count);
            let mut e = self.obj(obj)?.head;
            while let Some(ei) = e {
                ids.push(ei);
                e = self.obj_entries[ei.idx()].next;
            }
            // Stable sort: the first of several equal keys stays first.
            let entries = &self.obj_entries;
            ids.sort_by(|a, b| entries[a.idx()].key.cmp(&entries[b.idx()].key));
            self.obj_mut(obj)?.index = ObjIndex::Snapshot(ids);
        }
        let ObjIndex::Snapshot(snap) = &self.obj(obj)?.index else {
            return None;
        };
        let entries = &self.obj_entries;
        let i = snap.partition_point(|e| entries[e.idx()].key.as_ref() < key);
        let e = *snap.get(i)?;
        (entries[e.idx()].key.as_ref() == key).then_some(e)
    }

    /// Tree lookup. Builds the tree from the live entry list on first use
    /// (discarding the snapshot if it was active). `insert` keeps the tree
    /// current; plain `append` leaves it stale.
    pub fn obj_find(&mut self, obj: NodeId, key: &[u8]) -> Option<NodeId> {
        self.obj_find_entry(obj, key)
            .map(|e| self.obj_entries[e.idx()].value)
    }

    pub fn obj_find_entry(&mut self, obj: NodeId, key: &[u8]) -> Option<ObjEntryId> {
        self.obj_ensure_tree(obj)?;
        let root = self.obj_tree_root(obj)?;
        avl::find(&self.obj_entries, root, key)
    }

    fn obj_ensure_tree(&mut self, obj: NodeId) -> Option<()> {
        if self.obj_tree_root(obj).is_some() {
            return Some(());
        }
        self.obj(obj)?;
        let mut root = None;
        let mut e = self.obj(obj)?.head;
        while let Some(ei) = e {
            self.obj_entries[ei.idx()].clear_hooks();
            root = avl::insert(&mut self.obj_entries, root, ei);
            e = self.obj_entries[ei.idx()].next;
        }
        self.obj_mut(obj)?.index = ObjIndex::Tree(root);
        Some(())
    }

    /// Replaces the first entry with `key` in place (insertion position
    /// preserved), or appends. On append the active index is maintained:
    /// a snapshot is dropped, a tree receives the new entry.
    pub fn obj_set(&mut self, obj: NodeId, key: &[u8], value: NodeId) {
        if let Some(e) = self.obj_scan_entry(obj, key) {
            self.obj_entries[e.idx()].value = value;
            self.nodes[value.idx()].parent = Some(obj);
            return;
        }
        let Some(e) = self.obj_append_key(obj, Cow::Owned(key.to_vec()), value) else {
            return;
        };
        if self.obj_has_snapshot(obj) {
            self.obj_mut(obj).expect("object").index = ObjIndex::None;
        } else if let Some(root) = self.obj_tree_root(obj) {
            let new_root = avl::insert(&mut self.obj_entries, root, e);
            self.obj_mut(obj).expect("object").index = ObjIndex::Tree(new_root);
        }
    }

    /// Tree-based upsert: replaces the value of an existing entry, or
    /// appends and inserts the new entry into the tree. Activates the tree
    /// index (discarding any snapshot).
    pub fn obj_insert(&mut self, obj: NodeId, key: &[u8], value: NodeId) -> Option<ObjEntryId> {
        self.obj_ensure_tree(obj)?;
        let root = self.obj_tree_root(obj)?;
        if let Some(e) = avl::find(&self.obj_entries, root, key) {
            self.obj_entries[e.idx()].value = value;
            self.nodes[value.idx()].parent = Some(obj);
            return Some(e);
        }
        let e = self.obj_append_key(obj, Cow::Owned(key.to_vec()), value)?;
        let new_root = avl::insert(&mut self.obj_entries, root, e);
        self.obj_mut(obj)?.index = ObjIndex::Tree(new_root);
        Some(e)
    }

    /// Unlinks the first entry with `key`. Drops the snapshot index, or
    /// erases the entry from the tree index. Returns whether an entry was
    /// removed.
    pub fn obj_remove(&mut self, obj: NodeId, key: &[u8]) -> bool {
        let Some(e) = self.obj_scan_entry(obj, key) else {
            return false;
        };
        let (prev, next, value) = {
            let entry = &self.obj_entries[e.idx()];
            (entry.prev, entry.next, entry.value)
        };
        match prev {
            Some(p) => self.obj_entries[p.idx()].next = next,
            None => self.obj_mut(obj).expect("object").head = next,
        }
        match next {
            Some(n) => self.obj_entries[n.idx()].prev = prev,
            None => self.obj_mut(obj).expect("object").tail = prev,
        }
        self.obj_mut(obj).expect("object").count -= 1;
        if self.obj_has_snapshot(obj) {
            self.obj_mut(obj).expect("object").index = ObjIndex::None;
        } else if let Some(root) = self.obj_tree_root(obj) {
            // An entry appended after the tree was built is not in it.
            let in_tree = self.obj_entries[e.idx()].up.is_some() || root == Some(e);
            if in_tree {
                let new_root = avl::remove(&mut self.obj_entries, root, e);
                self.obj_mut(obj).expect("object").index = ObjIndex::Tree(new_root);
            }
        }
        let entry = &mut self.obj_entries[e.idx()];
        entry.prev = None;
        entry.next = None;
        entry.clear_hooks();
        if self.nodes[value.idx()].parent == Some(obj) {
            self.nodes[value.idx()].parent = None;
        }
        true
    }

    /// Entry count; 0 when `obj` is not an object.
    pub fn obj_count(&self, obj: NodeId) -> usize {
        self.obj(obj).map_or(0, |o| o.count)
    }

    pub fn obj_first(&self, obj: NodeId) -> Option<ObjEntryId> {
        self.obj(obj)?.head
    }

    pub fn obj_last(&self, obj: NodeId) -> Option<ObjEntryId> {
        self.obj(obj)?.tail
    }

    pub fn obj_next(&self, e: ObjEntryId) -> Option<ObjEntryId> {
        self.obj_entries[e.idx()].next
    }

    pub fn obj_prev(&self, e: ObjEntryId) -> Option<ObjEntryId> {
        self.obj_entries[e.idx()].prev
    }
}
