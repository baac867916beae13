//! Array engine: linked entry list with a lazy direct-access table.

use crate::node::{ArrEntryId, NodeData, NodeId};
use crate::Doc;

pub(crate) struct ArrNode {
    pub(crate) head: Option<ArrEntryId>,
    pub(crate) tail: Option<ArrEntryId>,
    pub(crate) count: usize,
    /// Entry ids in list order, built on first indexed access and dropped
    /// by any structural mutation.
    pub(crate) table: Option<Vec<ArrEntryId>>,
}

impl ArrNode {
    pub(crate) fn new() -> Self {
        Self {
            head: None,
            tail: None,
            count: 0,
            table: None,
        }
    }
}

pub(crate) struct ArrEntry {
    pub(crate) value: NodeId,
    pub(crate) prev: Option<ArrEntryId>,
    pub(crate) next: Option<ArrEntryId>,
}

impl<'a> Doc<'a> {
    fn arr(&self, j: NodeId) -> Option<&ArrNode> {
        match &self.nodes[j.idx()].data {
            NodeData::Array(a) => Some(a),
            _ => None,
        }
    }

    fn arr_mut(&mut self, j: NodeId) -> Option<&mut ArrNode> {
        match &mut self.nodes[j.idx()].data {
            NodeData::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Pushes `item` at the tail and invalidates the direct-access table.
    pub fn arr_append(&mut self, arr: NodeId, item: NodeId) -> Option<ArrEntryId> {
        let tail = self.arr(arr)?.tail;
        let e = ArrEntryId(self.arr_entries.len() as u32);
        self.arr_entries.push(ArrEntry {
            value: item,
            prev: tail,
            next: None,
        });
        if let Some(t) = tail {
            self.arr_entries[t.idx()].next = Some(e);
        }
        let a = self.arr_mut(arr).expect("array checked above");
        if a.head.is_none() {
            a.head = Some(e);
        }
        a.tail = Some(e);
        a.count += 1;
        a.table = None;
        self.nodes[item.idx()].parent = Some(arr);
        Some(e)
    }

    /// Indexed access through the direct-access table; the first call walks
    /// the list once to build it. Negative or out-of-range indices return
    /// `None`.
    pub fn arr_nth(&mut self, arr: NodeId, nth: isize) -> Option<NodeId> {
        self.arr_nth_node(arr, nth)
            .map(|e| self.arr_entries[e.idx()].value)
    }

    pub fn arr_nth_node(&mut self, arr: NodeId, nth: isize) -> Option<ArrEntryId> {
        let a = self.arr(arr)?;
        if nth < 0 || nth as usize >= a.count {
            return None;
        }
        if a.table.is_none() {
            let mut table = Vec::with_capacity(a.count);
            let mut e = a.head;
            while let Some(ei) = e {
                table.push(ei);
                e = self.arr_entries[ei.idx()].next;
            }
            self.arr_mut(arr)?.table = Some(table);
        }
        self.arr(arr)?.table.as_ref()?.get(nth as usize).copied()
    }

    /// Indexed access without a table: walks from the tail when the index
    /// is past the midpoint, from the head otherwise.
    pub fn arr_scan_index(&self, arr: NodeId, nth: isize) -> Option<NodeId> {
        let a = self.arr(arr)?;
        if nth < 0 || nth as usize >= a.count {
            return None;
        }
        let nth = nth as usize;
        let e = if nth * 2 > a.count {
            let mut steps = a.count - nth - 1;
            let mut e = a.tail;
            while steps > 0 {
                e = self.arr_entries[e?.idx()].prev;
                steps -= 1;
            }
            e
        } else {
            let mut steps = nth;
            let mut e = a.head;
            while steps > 0 {
                e = self.arr_entries[e?.idx()].next;
                steps -= 1;
            }
            e
        };
        e.map(|e| self.arr_entries[e.idx()].value)
    }

    /// Unlinks one entry, invalidates the table, orphans the entry's links,
    /// and clears its value's parent.
    pub fn arr_erase(&mut self, e: ArrEntryId) {
        let value = self.arr_entries[e.idx()].value;
        let Some(arr) = self.nodes[value.idx()].parent else {
            return;
        };
        if self.arr(arr).is_none() {
            return;
        }
        let (prev, next) = {
            let entry = &self.arr_entries[e.idx()];
            (entry.prev, entry.next)
        };
        match prev {
            Some(p) => self.arr_entries[p.idx()].next = next,
            None => self.arr_mut(arr).expect("array").head = next,
        }
        match next {
            Some(n) => self.arr_entries[n.idx()].prev = prev,
            None => self.arr_mut(arr).expect("array").tail = prev,
        }
        let a = self.arr_mut(arr).expect("array");
        a.count -= 1;
        a.table = None;
        let entry = &mut self.arr_entries[e.idx()];
        entry.prev = None;
        entry.next = None;
        self.nodes[value.idx()].parent = None;
    }

    /// Orphans every entry and resets the array to empty.
    pub fn arr_clear(&mut self, arr: NodeId) {
        let Some(a) = self.arr(arr) else {
            return;
        };
        let mut e = a.head;
        while let Some(ei) = e {
            let (next, value) = {
                let entry = &self.arr_entries[ei.idx()];
                (entry.next, entry.value)
            };
            let entry = &mut self.arr_entries[ei.idx()];
            entry.prev = None;
            entry.next = None;
            if self.nodes[value.idx()].parent == Some(arr) {
                self.nodes[value.idx()].parent = None;
            }
            e = next;
        }
        let a = self.arr_mut(arr).expect("array");
        a.head = None;
        a.tail = None;
        a.count = 0;
        a.table = None;
    }

    /// Entry count; 0 when `arr` is not an array.
    pub fn arr_count(&self, arr: NodeId) -> usize {
        self.arr(arr).map_or(0, |a| a.count)
    }

    pub fn arr_first(&self, arr: NodeId) -> Option<ArrEntryId> {
        self.arr(arr)?.head
    }

    pub fn arr_last(&self, arr: NodeId) -> Option<ArrEntryId> {
        self.arr(arr)?.tail
    }

    pub fn arr_next(&self, e: ArrEntryId) -> Option<ArrEntryId> {
        self.arr_entries[e.idx()].next
    }

    pub fn arr_prev(&self, e: ArrEntryId) -> Option<ArrEntryId> {
        self.arr_entries[e.idx()].prev
    }
}
