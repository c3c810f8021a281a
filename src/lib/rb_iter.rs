use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::ptr;

use log::trace;

use crate::compare::Compare;
use crate::error::Rejected;
use crate::ownership::Ownership;
use crate::rb_node::{NodeId, Nodes, END, NIL};
use crate::{Duplicates, RbTree};

/// In-order iterator over the payloads of an [`RbTree`].
pub struct Iter<'a, T> {
    nodes: &'a Nodes<T>,
    front: NodeId,
    // Exclusive: the next call to `next_back` yields its predecessor.
    back: NodeId,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(nodes: &'a Nodes<T>, len: usize) -> Self {
        Iter {
            nodes,
            front: nodes.first(),
            back: END,
            remaining: len,
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front;
        self.front = self.nodes.successor(id);
        self.remaining -= 1;
        self.nodes.payload(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.back = self.nodes.predecessor(self.back);
        self.remaining -= 1;
        self.nodes.payload(self.back)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Consuming in-order iterator, produced by `RbTree::into_iter`.
pub struct IntoIter<T> {
    nodes: Nodes<T>,
    front: NodeId,
    back: NodeId,
    remaining: usize,
}

impl<T> IntoIter<T> {
    pub(super) fn new(nodes: Nodes<T>, len: usize) -> Self {
        let front = nodes.first();
        IntoIter {
            nodes,
            front,
            back: END,
            remaining: len,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        // Links stay intact; only the payload leaves the slot.
        let id = self.front;
        self.front = self.nodes.successor(id);
        self.remaining -= 1;
        self.nodes.take_payload(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        self.back = self.nodes.predecessor(self.back);
        self.remaining -= 1;
        self.nodes.take_payload(self.back)
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

/// A detached position in a tree.
///
/// Unlike a cursor, a handle does not borrow the tree, so it can be kept
/// across mutations. It keeps denoting the same payload until that payload
/// is removed; after that it resolves to `None`. Handles must only be used
/// with the tree that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: NodeId,
    generation: u32,
    epoch: u32,
}

impl Handle {
    pub(super) fn of<T>(nodes: &Nodes<T>, index: NodeId) -> Self {
        Handle {
            index,
            generation: nodes.generation(index),
            epoch: nodes.epoch(),
        }
    }

    /// The node this handle denotes, if it is still in the tree.
    pub(super) fn locate<T>(&self, nodes: &Nodes<T>) -> Option<NodeId> {
        // The end sentinel outlives every reset of the arena.
        if self.index == END {
            return Some(END);
        }
        let current = self.epoch == nodes.epoch() && nodes.is_live(self.index);
        if current && nodes.generation(self.index) == self.generation {
            Some(self.index)
        } else {
            None
        }
    }

    /// True if this handle denotes the end position.
    pub fn is_end(&self) -> bool {
        self.index == END
    }
}

/// A read-only position in an [`RbTree`].
///
/// A cursor always denotes either an element or the end position, which
/// sits one past the last element. Stepping past either boundary is a
/// logic error: it trips a debug assertion and leaves the cursor in place
/// in release builds.
pub struct Cursor<'a, T, C, P> {
    tree: &'a RbTree<T, C, P>,
    node: NodeId,
}

impl<'a, T, C, P> Cursor<'a, T, C, P> {
    pub(super) fn new(tree: &'a RbTree<T, C, P>, node: NodeId) -> Self {
        Cursor { tree, node }
    }

    /// The payload under the cursor, or `None` at the end position.
    pub fn get(&self) -> Option<&'a T> {
        self.tree.nodes.payload(self.node)
    }

    /// True at the end position.
    pub fn is_end(&self) -> bool {
        self.node == END
    }

    /// Steps to the in-order successor.
    pub fn move_next(&mut self) {
        let next = self.tree.nodes.successor(self.node);
        debug_assert_ne!(next, NIL, "cursor stepped past the end");
        if next != NIL {
            self.node = next;
        }
    }

    /// Steps to the in-order predecessor.
    pub fn move_prev(&mut self) {
        let prev = self.tree.nodes.predecessor(self.node);
        debug_assert_ne!(prev, NIL, "cursor stepped before the first element");
        if prev != NIL {
            self.node = prev;
        }
    }

    /// The payload after the cursor, without moving.
    pub fn peek_next(&self) -> Option<&'a T> {
        self.tree.nodes.payload(self.tree.nodes.successor(self.node))
    }

    /// The payload before the cursor, without moving.
    pub fn peek_prev(&self) -> Option<&'a T> {
        self.tree.nodes.payload(self.tree.nodes.predecessor(self.node))
    }

    /// A detached handle to the current position.
    pub fn handle(&self) -> Handle {
        Handle::of(&self.tree.nodes, self.node)
    }
}

impl<T, C, P> Clone for Cursor<'_, T, C, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, C, P> Copy for Cursor<'_, T, C, P> {}

impl<T, C, P> PartialEq for Cursor<'_, T, C, P> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.node == other.node
    }
}

impl<T, C, P> Eq for Cursor<'_, T, C, P> {}

impl<T: fmt::Debug, C, P> fmt::Debug for Cursor<'_, T, C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

/// What [`CursorMut::set`] did.
#[derive(Debug, PartialEq, Eq)]
pub enum SetOutcome<T, R> {
    /// A new element was added; the cursor still denotes the end position.
    Inserted,
    /// The tree rejects duplicates and already held an equal key.
    Duplicate(T),
    /// The element under the cursor was removed; the cursor moved to its successor.
    Removed(R),
    /// The payload under the cursor was swapped in place.
    Replaced(R),
    /// Nothing to do: removal was requested at the end position.
    Unchanged,
}

/// A position in an [`RbTree`] through which the tree can be mutated.
pub struct CursorMut<'a, T, C, P> {
    tree: &'a mut RbTree<T, C, P>,
    node: NodeId,
}

impl<'a, T, C, P> CursorMut<'a, T, C, P> {
    pub(super) fn new(tree: &'a mut RbTree<T, C, P>, node: NodeId) -> Self {
        CursorMut { tree, node }
    }

    /// The payload under the cursor, or `None` at the end position.
    pub fn get(&self) -> Option<&T> {
        self.tree.nodes.payload(self.node)
    }

    /// True at the end position.
    pub fn is_end(&self) -> bool {
        self.node == END
    }

    /// Steps to the in-order successor.
    pub fn move_next(&mut self) {
        let next = self.tree.nodes.successor(self.node);
        debug_assert_ne!(next, NIL, "cursor stepped past the end");
        if next != NIL {
            self.node = next;
        }
    }

    /// Steps to the in-order predecessor.
    pub fn move_prev(&mut self) {
        let prev = self.tree.nodes.predecessor(self.node);
        debug_assert_ne!(prev, NIL, "cursor stepped before the first element");
        if prev != NIL {
            self.node = prev;
        }
    }

    /// A detached handle to the current position.
    pub fn handle(&self) -> Handle {
        Handle::of(&self.tree.nodes, self.node)
    }

    /// Reborrows as a read-only cursor at the same position.
    pub fn as_cursor(&self) -> Cursor<'_, T, C, P> {
        Cursor::new(self.tree, self.node)
    }
}

impl<'a, T, C, P> CursorMut<'a, T, C, P>
where
    C: Compare<T>,
    P: Ownership,
{
    /// Writes through the cursor.
    ///
    /// - At the end position, `Some(value)` adds `value` to the tree. The
    ///   cursor keeps denoting the end position.
    /// - On an element, `None` removes it. The cursor first moves to the
    ///   successor, so it stays valid.
    /// - On an element, `Some(value)` swaps the payload in place. The new
    ///   payload must order the same way as the old one relative to its
    ///   neighbours, and must not equal either of them unless the tree
    ///   allows duplicates.
    pub fn set(&mut self, value: Option<T>) -> SetOutcome<T, P::Released<T>> {
        match value {
            Some(value) if self.node == END => match self.tree.add(value) {
                Ok(()) => SetOutcome::Inserted,
                Err(Rejected(value)) => SetOutcome::Duplicate(value),
            },
            None if self.node == END => SetOutcome::Unchanged,
            None => {
                let old = self.node;
                self.node = self.tree.nodes.successor(old);
                trace!("removing element through cursor");
                match self.tree.unlink(old) {
                    Some(payload) => SetOutcome::Removed(P::release(payload)),
                    None => SetOutcome::Unchanged,
                }
            }
            Some(value) => {
                if cfg!(debug_assertions) {
                    self.debug_check_neighbours(&value);
                }
                match self.tree.nodes.replace_payload(self.node, value) {
                    Some(old) => SetOutcome::Replaced(P::release(old)),
                    None => SetOutcome::Unchanged,
                }
            }
        }
    }

    fn debug_check_neighbours(&self, value: &T) {
        let nodes = &self.tree.nodes;
        let cmp = &self.tree.comparator;
        let unique = self.tree.duplicates == Duplicates::Reject;
        if let Some(prev) = nodes.payload(nodes.predecessor(self.node)) {
            let order = cmp.compare(prev, value);
            debug_assert_ne!(order, Ordering::Greater, "replacement orders before its predecessor");
            debug_assert!(
                !(unique && order == Ordering::Equal),
                "replacement equals its predecessor"
            );
        }
        if let Some(next) = nodes.payload(nodes.successor(self.node)) {
            let order = cmp.compare(value, next);
            debug_assert_ne!(order, Ordering::Greater, "replacement orders after its successor");
            debug_assert!(
                !(unique && order == Ordering::Equal),
                "replacement equals its successor"
            );
        }
    }
}

impl<T: fmt::Debug, C, P> fmt::Debug for CursorMut<'_, T, C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.get()).finish()
    }
}
