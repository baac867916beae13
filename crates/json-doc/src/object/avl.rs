//! Intrusive AVL tree over object entries, keyed by key bytes.
//!
//! The tree links (`up`/`left`/`right`/`bf`) live inside [`ObjEntry`]
//! itself; all functions address entries by arena index and return the new
//! root. Entries with equal keys are admitted (placed to the right), so
//! duplicate object keys resolve to some matching entry.

use std::cmp::Ordering;

use super::ObjEntry;
use crate::node::ObjEntryId;

#[inline]
fn bf(entries: &[ObjEntry<'_>], i: ObjEntryId) -> i32 {
    entries[i.idx()].bf
}

#[inline]
fn set_bf(entries: &mut [ObjEntry<'_>], i: ObjEntryId, v: i32) {
    entries[i.idx()].bf = v;
}

#[inline]
fn up(entries: &[ObjEntry<'_>], i: ObjEntryId) -> Option<ObjEntryId> {
    entries[i.idx()].up
}

#[inline]
fn left(entries: &[ObjEntry<'_>], i: ObjEntryId) -> Option<ObjEntryId> {
    entries[i.idx()].left
}

#[inline]
fn right(entries: &[ObjEntry<'_>], i: ObjEntryId) -> Option<ObjEntryId> {
    entries[i.idx()].right
}

#[inline]
fn set_up(entries: &mut [ObjEntry<'_>], i: ObjEntryId, v: Option<ObjEntryId>) {
    entries[i.idx()].up = v;
}

#[inline]
fn set_left(entries: &mut [ObjEntry<'_>], i: ObjEntryId, v: Option<ObjEntryId>) {
    entries[i.idx()].left = v;
}

#[inline]
fn set_right(entries: &mut [ObjEntry<'_>], i: ObjEntryId, v: Option<ObjEntryId>) {
    entries[i.idx()].right = v;
}

pub(crate) fn find(
    entries: &[ObjEntry<'_>],
    root: Option<ObjEntryId>,
    key: &[u8],
) -> Option<ObjEntryId> {
    let mut curr = root;
    while let Some(i) = curr {
        curr = match key.cmp(entries[i.idx()].key.as_ref()) {
            Ordering::Equal => return Some(i),
            Ordering::Less => left(entries, i),
            Ordering::Greater => right(entries, i),
        };
    }
    None
}

/// Inserts a detached entry (hooks cleared) and returns the new root.
pub(crate) fn insert(
    entries: &mut [ObjEntry<'_>],
    root: Option<ObjEntryId>,
    n: ObjEntryId,
) -> Option<ObjEntryId> {
    let Some(mut curr) = root else {
        return Some(n);
    };
    loop {
        let go_left = entries[n.idx()].key < entries[curr.idx()].key;
        let next = if go_left {
            left(entries, curr)
        } else {
            right(entries, curr)
        };
        match next {
            Some(next) => curr = next,
            None => {
                return if go_left {
                    insert_left(entries, root, n, curr)
                } else {
                    insert_right(entries, root, n, curr)
                };
            }
        }
    }
}

fn insert_right(
    entries: &mut [ObjEntry<'_>],
    root: Option<ObjEntryId>,
    n: ObjEntryId,
    p: ObjEntryId,
) -> Option<ObjEntryId> {
    let root = root.expect("root exists");
    set_right(entries, p, Some(n));
    set_up(entries, n, Some(p));
    let pbf = bf(entries, p) - 1;
    set_bf(entries, p, pbf);
    if left(entries, p).is_some() {
        Some(root)
    } else {
        Some(rebalance_after_insert(entries, root, p, n))
    }
}

fn insert_left(
    entries: &mut [ObjEntry<'_>],
    root: Option<ObjEntryId>,
    n: ObjEntryId,
    p: ObjEntryId,
) -> Option<ObjEntryId> {
    let root = root.expect("root exists");
    set_left(entries, p, Some(n));
    set_up(entries, n, Some(p));
    let pbf = bf(entries, p) + 1;
    set_bf(entries, p, pbf);
    if right(entries, p).is_some() {
        Some(root)
    } else {
        Some(rebalance_after_insert(entries, root, p, n))
    }
}

fn rebalance_after_insert(
    entries: &mut [ObjEntry<'_>],
    root: ObjEntryId,
    node: ObjEntryId,
    child: ObjEntryId,
) -> ObjEntryId {
    let Some(p) = up(entries, node) else {
        return root;
    };

    let is_left = left(entries, p) == Some(node);
    let mut pbf = bf(entries, p);
    if is_left {
        pbf += 1;
    } else {
        pbf -= 1;
    }
    set_bf(entries, p, pbf);

    match pbf {
        0 => root,
        1 | -1 => rebalance_after_insert(entries, root, p, node),
        _ => {
            let is_child_left = left(entries, node) == Some(child);
            if is_left {
                if is_child_left {
                    ll_rotate(entries, p, node);
                    if up(entries, node).is_some() {
                        root
                    } else {
                        node
                    }
                } else {
                    lr_rotate(entries, p, node, child);
                    if up(entries, child).is_some() {
                        root
                    } else {
                        child
                    }
                }
            } else if is_child_left {
                rl_rotate(entries, p, node, child);
                if up(entries, child).is_some() {
                    root
                } else {
                    child
                }
            } else {
                rr_rotate(entries, p, node);
                if up(entries, node).is_some() {
                    root
                } else {
                    node
                }
            }
        }
    }
}

fn ll_rotate(entries: &mut [ObjEntry<'_>], n: ObjEntryId, nl: ObjEntryId) {
    let p = up(entries, n);
    let nlr = right(entries, nl);

    set_up(entries, nl, p);
    set_right(entries, nl, Some(n));
    set_up(entries, n, Some(nl));
    set_left(entries, n, nlr);
    if let Some(nlr) = nlr {
        set_up(entries, nlr, Some(n));
    }
    if let Some(p) = p {
        if left(entries, p) == Some(n) {
            set_left(entries, p, Some(nl));
        } else {
            set_right(entries, p, Some(nl));
        }
    }

    let mut nbf = bf(entries, n);
    let mut nlbf = bf(entries, nl);
    nbf += -1 - if nlbf > 0 { nlbf } else { 0 };
    nlbf += -1 + if nbf < 0 { nbf } else { 0 };
    set_bf(entries, n, nbf);
    set_bf(entries, nl, nlbf);
}

fn rr_rotate(entries: &mut [ObjEntry<'_>], n: ObjEntryId, nr: ObjEntryId) {
    let p = up(entries, n);
    let nrl = left(entries, nr);

    set_up(entries, nr, p);
    set_left(entries, nr, Some(n));
    set_up(entries, n, Some(nr));
    set_right(entries, n, nrl);
    if let Some(nrl) = nrl {
        set_up(entries, nrl, Some(n));
    }
    if let Some(p) = p {
        if left(entries, p) == Some(n) {
            set_left(entries, p, Some(nr));
        } else {
            set_right(entries, p, Some(nr));
        }
    }

    let mut nbf = bf(entries, n);
    let mut nrbf = bf(entries, nr);
    nbf += 1 - if nrbf < 0 { nrbf } else { 0 };
    nrbf += 1 + if nbf > 0 { nbf } else { 0 };
    set_bf(entries, n, nbf);
    set_bf(entries, nr, nrbf);
}

fn lr_rotate(entries: &mut [ObjEntry<'_>], n: ObjEntryId, nl: ObjEntryId, nlr: ObjEntryId) {
    rr_rotate(entries, nl, nlr);
    ll_rotate(entries, n, nlr);
}

fn rl_rotate(entries: &mut [ObjEntry<'_>], n: ObjEntryId, nr: ObjEntryId, nrl: ObjEntryId) {
    ll_rotate(entries, nr, nrl);
    rr_rotate(entries, n, nrl);
}

/// Detaches `n` from the tree and returns the new root.
pub(crate) fn remove(
    entries: &mut [ObjEntry<'_>],
    root: Option<ObjEntryId>,
    n: ObjEntryId,
) -> Option<ObjEntryId> {
    let Some(root) = root else {
        return None;
    };

    let p = up(entries, n);
    let l = left(entries, n);
    let r = right(entries, n);
    set_up(entries, n, None);
    set_left(entries, n, None);
    set_right(entries, n, None);

    if let (Some(l), Some(r)) = (l, r) {
        let lr = right(entries, l);
        if lr.is_none() {
            // Left child has no right subtree: splice it into n's place.
            if let Some(p) = p {
                if left(entries, p) == Some(n) {
                    set_left(entries, p, Some(l));
                } else {
                    set_right(entries, p, Some(l));
                }
            }
            set_up(entries, l, p);
            set_right(entries, l, Some(r));
            set_up(entries, r, Some(l));
            let nbf = bf(entries, n);
            if p.is_some() {
                set_bf(entries, l, nbf);
                return l_rebalance(entries, Some(root), l, 1);
            }

            let lbf = nbf - 1;
            set_bf(entries, l, lbf);
            if lbf >= -1 {
                return Some(l);
            }
            let rl = left(entries, r);
            if bf(entries, r) > 0 {
                let rl = rl.expect("rl exists");
                rl_rotate(entries, l, r, rl);
                return Some(rl);
            }
            rr_rotate(entries, l, r);
            return Some(r);
        }

        // In-order predecessor path.
        let mut v = l;
        while let Some(tmp) = right(entries, v) {
            v = tmp;
        }
        let vl = left(entries, v);
        let vp = up(entries, v).expect("in-order predecessor has parent");
        let vc = vl;

        if let Some(p) = p {
            if left(entries, p) == Some(n) {
                set_left(entries, p, Some(v));
            } else {
                set_right(entries, p, Some(v));
            }
        }

        set_up(entries, v, p);
        set_right(entries, v, Some(r));
        let nbf = bf(entries, n);
        set_bf(entries, v, nbf);
        if l != v {
            set_left(entries, v, Some(l));
            set_up(entries, l, Some(v));
        }
        set_up(entries, r, Some(v));

        if left(entries, vp) == Some(v) {
            set_left(entries, vp, vc);
        } else {
            set_right(entries, vp, vc);
        }
        if let Some(vc) = vc {
            set_up(entries, vc, Some(vp));
        }

        let new_root = if p.is_some() { Some(root) } else { Some(v) };
        return r_rebalance(entries, new_root, vp, 1);
    }

    let c = l.or(r);
    if let Some(c) = c {
        set_up(entries, c, p);
    }
    let Some(p) = p else {
        return c;
    };

    if left(entries, p) == Some(n) {
        set_left(entries, p, c);
        l_rebalance(entries, Some(root), p, 1)
    } else {
        set_right(entries, p, c);
        r_rebalance(entries, Some(root), p, 1)
    }
}

fn l_rebalance(
    entries: &mut [ObjEntry<'_>],
    root: Option<ObjEntryId>,
    mut n: ObjEntryId,
    d: i32,
) -> Option<ObjEntryId> {
    let nbf = bf(entries, n) - d;
    set_bf(entries, n, nbf);
    let mut next_d = d;

    if nbf == -1 {
        return root;
    }

    if nbf < -1 {
        let u = right(entries, n).expect("right child exists");
        if bf(entries, u) <= 0 {
            if left(entries, u).is_some() && bf(entries, u) == 0 {
                next_d = 0;
            }
            rr_rotate(entries, n, u);
            n = u;
        } else {
            let ul = left(entries, u).expect("left child exists");
            rl_rotate(entries, n, u, ul);
            n = ul;
        }
    }

    let Some(p) = up(entries, n) else {
        return Some(n);
    };

    if left(entries, p) == Some(n) {
        l_rebalance(entries, root, p, next_d)
    } else {
        r_rebalance(entries, root, p, next_d)
    }
}

fn r_rebalance(
    entries: &mut [ObjEntry<'_>],
    root: Option<ObjEntryId>,
    mut n: ObjEntryId,
    d: i32,
) -> Option<ObjEntryId> {
    let nbf = bf(entries, n) + d;
    set_bf(entries, n, nbf);
    let mut next_d = d;

    if nbf == 1 {
        return root;
    }

    if nbf > 1 {
        let u = left(entries, n).expect("left child exists");
        if bf(entries, u) >= 0 {
            if right(entries, u).is_some() && bf(entries, u) == 0 {
                next_d = 0;
            }
            ll_rotate(entries, n, u);
            n = u;
        } else {
            let ur = right(entries, u).expect("right child exists");
            lr_rotate(entries, n, u, ur);
            n = ur;
        }
    }

    let Some(p) = up(entries, n) else {
        return Some(n);
    };

    if left(entries, p) == Some(n) {
        l_rebalance(entries, root, p, next_d)
    } else {
        r_rebalance(entries, root, p, next_d)
    }
}
