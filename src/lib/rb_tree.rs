//! An ordered collection backed by a red/black tree.
//!
//! Nodes live in an arena and refer to each other by index. Two sentinel
//! nodes are created with every tree and live as long as it does: a shared
//! leaf that stands in for every missing child, and an end node that is
//! always the right-most node and denotes the one-past-the-last position.
//! Traversal and mutation mid-traversal go through [`Cursor`] and
//! [`CursorMut`].
#![warn(missing_docs)]

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::mem;

use log::{debug, trace};

pub mod collection;
pub mod compare;
mod error;
pub mod ownership;
mod rb_iter;
mod rb_node;

pub use collection::{Collection, Position};
pub use compare::{Compare, Natural, Reverse};
pub use error::{AuditError, Rejected};
pub use ownership::{Borrowing, Ownership, Owning};
pub use rb_iter::{Cursor, CursorMut, Handle, IntoIter, Iter, SetOutcome};

use rb_node::{NodeId, Nodes, END, NIL};

/// Whether a tree accepts more than one element with an equal key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Duplicates {
    /// A second equal key is refused.
    #[default]
    Reject,
    /// Equal keys are kept side by side (multiset).
    Allow,
}

/// Construction-time settings of an [`RbTree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeConfig {
    /// Duplicate-key policy.
    pub duplicates: Duplicates,
    /// Number of elements to reserve arena space for.
    pub capacity: usize,
}

impl TreeConfig {
    /// Settings for a multiset.
    pub fn multiset() -> Self {
        TreeConfig {
            duplicates: Duplicates::Allow,
            ..TreeConfig::default()
        }
    }

    /// Reserves arena space for `capacity` elements up front.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

/// An ordered collection of `T`, ordered by the comparator `C`, with the
/// payload ownership policy `P`.
pub struct RbTree<T, C = Natural, P = Owning> {
    nodes: Nodes<T>,
    comparator: C,
    duplicates: Duplicates,
    length: usize,
    ownership: PhantomData<fn() -> P>,
}

impl<T> RbTree<T> {
    /// Creates an empty tree that rejects duplicate keys.
    pub fn new() -> Self {
        Self::with_config(Natural, TreeConfig::default())
    }

    /// Creates an empty tree that keeps duplicate keys.
    pub fn multiset() -> Self {
        Self::with_config(Natural, TreeConfig::multiset())
    }
}

impl<T> RbTree<T, Natural, Borrowing> {
    /// Creates an empty tree that hands payloads back on removal instead of
    /// dropping them.
    pub fn borrowing(config: TreeConfig) -> Self {
        Self::with_config(Natural, config)
    }
}

impl<T, C> RbTree<T, C> {
    /// Creates an empty tree ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_config(comparator, TreeConfig::default())
    }
}

impl<T> Default for RbTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C, P> RbTree<T, C, P> {
    /// Creates an empty tree from its parts.
    pub fn with_config(comparator: C, config: TreeConfig) -> Self {
        RbTree {
            nodes: Nodes::with_capacity(config.capacity),
            comparator,
            duplicates: config.duplicates,
            length: 0,
            ownership: PhantomData,
        }
    }

    /// Returns the number of elements in the tree.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true if the tree contains no elements.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The duplicate-key policy fixed at construction.
    pub fn duplicates(&self) -> Duplicates {
        self.duplicates
    }

    /// The ordering policy.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// The smallest element.
    pub fn first(&self) -> Option<&T> {
        self.nodes.payload(self.nodes.first())
    }

    /// The largest element.
    pub fn last(&self) -> Option<&T> {
        self.nodes.payload(self.nodes.predecessor(END))
    }

    /// Returns an in-order iterator over the elements.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.length)
    }

    /// A cursor at the first element, or at the end position if empty.
    pub fn begin(&self) -> Cursor<'_, T, C, P> {
        Cursor::new(self, self.nodes.first())
    }

    /// A cursor at the end position.
    pub fn end(&self) -> Cursor<'_, T, C, P> {
        Cursor::new(self, END)
    }

    /// A mutating cursor at the first element, or at the end position if empty.
    pub fn begin_mut(&mut self) -> CursorMut<'_, T, C, P> {
        let first = self.nodes.first();
        CursorMut::new(self, first)
    }

    /// A mutating cursor at the end position.
    pub fn end_mut(&mut self) -> CursorMut<'_, T, C, P> {
        CursorMut::new(self, END)
    }

    /// The element a handle denotes, if it is still in the tree.
    pub fn resolve(&self, handle: Handle) -> Option<&T> {
        handle
            .locate(&self.nodes)
            .and_then(|id| self.nodes.payload(id))
    }

    /// A cursor at the position a handle denotes, if it is still in the tree.
    pub fn cursor_at(&self, handle: Handle) -> Option<Cursor<'_, T, C, P>> {
        let id = handle.locate(&self.nodes)?;
        Some(Cursor::new(self, id))
    }

    /// A mutating cursor at the position a handle denotes.
    pub fn cursor_mut_at(&mut self, handle: Handle) -> Option<CursorMut<'_, T, C, P>> {
        let id = handle.locate(&self.nodes)?;
        Some(CursorMut::new(self, id))
    }

    /// Black nodes on every path from the root down to a leaf, excluding
    /// the root itself.
    pub fn black_height(&self) -> usize {
        self.nodes.black_height()
    }

    /// Nodes on the longest root-to-leaf path, counting the end position.
    pub fn height(&self) -> usize {
        self.nodes.height()
    }

    /// Arena slots in use, the two sentinels included. Equals 2 for an
    /// empty tree.
    pub fn arena_slots(&self) -> usize {
        self.nodes.capacity_used()
    }

    /// Arena slots vacated by removals and waiting for reuse. Zero whenever
    /// the tree is empty.
    pub fn vacant_slots(&self) -> usize {
        self.nodes.vacant()
    }

    /// Removes every element. Payloads are dropped and the arena is cut back
    /// to the two sentinels, keeping its allocation.
    pub fn clear(&mut self) {
        let released = self.nodes.clear();
        debug!("cleared {} nodes", released);
        self.length = 0;
    }

    /// Unlinks a live node and returns its payload.
    fn unlink(&mut self, id: NodeId) -> Option<T> {
        self.nodes.detach(id);
        let payload = self.nodes.release(id)?;
        self.length -= 1;
        self.after_mutation();
        Some(payload)
    }

    #[inline]
    fn after_mutation(&self) {
        debug_assert!(self.nodes.is_black(self.nodes.root));
        debug_assert_eq!(self.nodes.parent(self.nodes.root), NIL);
        debug_assert_eq!(self.nodes.live(), self.length);
        #[cfg(feature = "audit")]
        if let Err(e) = self.nodes.audit() {
            panic!("red/black audit failed: {}", e);
        }
    }
}

impl<T, C, P> RbTree<T, C, P>
where
    C: Compare<T>,
    P: Ownership,
{
    /// Adds an element.
    ///
    /// Fails, handing `value` back, if duplicates are rejected and an equal
    /// key is present. Equal keys in a multiset are placed after the
    /// existing ones.
    pub fn add(&mut self, value: T) -> Result<(), Rejected<T>> {
        let mut parent = NIL;
        let mut x = self.nodes.root;
        let mut as_left = true;
        while x != NIL {
            parent = x;
            as_left = match self.nodes.payload(x) {
                // Only the end sentinel carries no payload; it orders after everything.
                None => true,
                Some(existing) => match self.comparator.compare(&value, existing) {
                    Ordering::Less => true,
                    Ordering::Greater => false,
                    Ordering::Equal => {
                        if self.duplicates == Duplicates::Reject {
                            trace!("rejected duplicate key");
                            return Err(Rejected(value));
                        }
                        false
                    }
                },
            };
            x = if as_left {
                self.nodes.left(x)
            } else {
                self.nodes.right(x)
            };
        }
        let z = self.nodes.alloc(value);
        self.nodes.attach(z, parent, as_left);
        self.length += 1;
        self.after_mutation();
        Ok(())
    }

    /// Checks every structural invariant and the element order. Returns the
    /// black-height on success.
    pub fn audit(&self) -> Result<usize, AuditError> {
        let height = self.nodes.audit()?;
        if self.nodes.live() != self.length {
            return Err(AuditError::LengthMismatch {
                counted: self.nodes.live(),
                expected: self.length,
            });
        }
        let mut prev: Option<&T> = None;
        for (position, value) in self.iter().enumerate() {
            if let Some(prev) = prev {
                let order = self.comparator.compare(prev, value);
                let broken = match self.duplicates {
                    Duplicates::Reject => order != Ordering::Less,
                    Duplicates::Allow => order == Ordering::Greater,
                };
                if broken {
                    return Err(AuditError::Unordered { position });
                }
            }
            prev = Some(value);
        }
        Ok(height)
    }
}

impl<T, C, P> RbTree<T, C, P>
where
    P: Ownership,
{
    fn find_node<Q>(&self, key: &Q) -> NodeId
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let mut x = self.nodes.root;
        while x != NIL {
            x = match self.nodes.payload(x) {
                None => self.nodes.left(x),
                Some(existing) => match self.comparator.compare(key, existing.borrow()) {
                    Ordering::Less => self.nodes.left(x),
                    Ordering::Greater => self.nodes.right(x),
                    Ordering::Equal => return x,
                },
            };
        }
        NIL
    }

    // First node for which `goes_left` holds, scanning in order; END if none.
    fn bound_node(&self, goes_left: impl Fn(&T) -> bool) -> NodeId {
        let mut best = END;
        let mut x = self.nodes.root;
        while x != NIL {
            match self.nodes.payload(x) {
                Some(existing) if !goes_left(existing) => x = self.nodes.right(x),
                _ => {
                    best = x;
                    x = self.nodes.left(x);
                }
            }
        }
        best
    }

    /// Returns an element equal to `key`. In a multiset, any one of the
    /// equal elements.
    pub fn find<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.nodes.payload(self.find_node(key))
    }

    /// Returns true if an element equal to `key` is present.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.find_node(key) != NIL
    }

    /// A cursor at an element equal to `key`.
    pub fn find_cursor<Q>(&self, key: &Q) -> Option<Cursor<'_, T, C, P>>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        match self.find_node(key) {
            NIL => None,
            id => Some(Cursor::new(self, id)),
        }
    }

    /// A mutating cursor at an element equal to `key`.
    pub fn find_cursor_mut<Q>(&mut self, key: &Q) -> Option<CursorMut<'_, T, C, P>>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        match self.find_node(key) {
            NIL => None,
            id => Some(CursorMut::new(self, id)),
        }
    }

    /// A cursor at the first element not less than `key`, or at the end.
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<'_, T, C, P>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let id = self.bound_node(|e| self.comparator.compare(e.borrow(), key) != Ordering::Less);
        Cursor::new(self, id)
    }

    /// A cursor at the first element greater than `key`, or at the end.
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<'_, T, C, P>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let id =
            self.bound_node(|e| self.comparator.compare(e.borrow(), key) == Ordering::Greater);
        Cursor::new(self, id)
    }

    /// Removes one element equal to `key`, releasing its payload according
    /// to the ownership policy. `None` if no such element exists.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<P::Released<T>>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.take(key).map(P::release)
    }

    /// Removes one element equal to `key` and hands its payload back,
    /// whatever the ownership policy.
    pub fn take<Q>(&mut self, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let id = self.find_node(key);
        if id == NIL {
            trace!("remove missed: key not present");
            return None;
        }
        self.unlink(id)
    }
}

impl<T: Clone, C: Clone, P> Clone for RbTree<T, C, P> {
    fn clone(&self) -> Self {
        RbTree {
            nodes: self.nodes.clone(),
            comparator: self.comparator.clone(),
            duplicates: self.duplicates,
            length: self.length,
            ownership: PhantomData,
        }
    }
}

impl<T: fmt::Debug, C, P> fmt::Debug for RbTree<T, C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> FromIterator<T> for RbTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = RbTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T, C: Compare<T>, P: Ownership> Extend<T> for RbTree<T, C, P> {
    /// Adds every value; values refused as duplicates are dropped.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            let _ = self.add(value);
        }
    }
}

impl<'a, T, C, P> IntoIterator for &'a RbTree<T, C, P> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C, P> IntoIterator for RbTree<T, C, P> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(mut self) -> Self::IntoIter {
        let nodes = mem::replace(&mut self.nodes, Nodes::with_capacity(0));
        IntoIter::new(nodes, self.length)
    }
}
