//! The contract every ordered or unordered collection of the library meets,
//! so that callers can swap one implementation for another.

use crate::compare::Compare;
use crate::error::Rejected;
use crate::ownership::Ownership;
use crate::rb_iter::Cursor;
use crate::RbTree;

/// A position in a collection: one element, or one past the last.
pub trait Position {
    /// The element type.
    type Item;
    /// The element at this position, `None` at the end.
    fn get(&self) -> Option<&Self::Item>;
    /// Steps forward.
    fn move_next(&mut self);
    /// Steps backward.
    fn move_prev(&mut self);
    /// True at the end position.
    fn is_end(&self) -> bool;
}

/// Operations shared by all collections.
pub trait Collection<T> {
    /// What a successful removal yields.
    type Released;

    /// The position type returned by [`Collection::begin`] and [`Collection::end`].
    type Cursor<'a>: Position<Item = T> + PartialEq
    where
        Self: 'a;

    /// Adds `value`, or hands it back if the collection refuses it.
    fn add(&mut self, value: T) -> Result<(), Rejected<T>>;

    /// Removes one element equal to `key`.
    fn remove(&mut self, key: &T) -> Option<Self::Released>;

    /// Looks up an element equal to `key`.
    fn find(&self, key: &T) -> Option<&T>;

    /// Removes every element.
    fn clear(&mut self);

    /// Number of elements.
    fn size(&self) -> usize;

    /// Position of the first element.
    fn begin(&self) -> Self::Cursor<'_>;

    /// The end position.
    fn end(&self) -> Self::Cursor<'_>;
}

impl<T, C, P> Position for Cursor<'_, T, C, P> {
    type Item = T;

    fn get(&self) -> Option<&T> {
        Cursor::get(self)
    }

    fn move_next(&mut self) {
        Cursor::move_next(self)
    }

    fn move_prev(&mut self) {
        Cursor::move_prev(self)
    }

    fn is_end(&self) -> bool {
        Cursor::is_end(self)
    }
}

impl<T, C, P> Collection<T> for RbTree<T, C, P>
where
    C: Compare<T>,
    P: Ownership,
{
    type Released = P::Released<T>;

    type Cursor<'a> = Cursor<'a, T, C, P>
    where
        Self: 'a;

    fn add(&mut self, value: T) -> Result<(), Rejected<T>> {
        RbTree::add(self, value)
    }

    fn remove(&mut self, key: &T) -> Option<Self::Released> {
        RbTree::remove(self, key)
    }

    fn find(&self, key: &T) -> Option<&T> {
        RbTree::find(self, key)
    }

    fn clear(&mut self) {
        RbTree::clear(self)
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn begin(&self) -> Self::Cursor<'_> {
        RbTree::begin(self)
    }

    fn end(&self) -> Self::Cursor<'_> {
        RbTree::end(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_through_contract<T: Clone, K: Collection<T>>(collection: &K) -> Vec<T> {
        let mut out = Vec::new();
        let mut cursor = collection.begin();
        while cursor != collection.end() {
            if let Some(v) = cursor.get() {
                out.push(v.clone());
            }
            cursor.move_next();
        }
        out
    }

    #[test]
    fn test_tree_through_contract() {
        let mut tree: RbTree<u32> = RbTree::new();
        assert!(Collection::add(&mut tree, 3).is_ok());
        assert!(Collection::add(&mut tree, 1).is_ok());
        assert!(Collection::add(&mut tree, 3).is_err());
        assert_eq!(Collection::size(&tree), 2);
        assert_eq!(drain_through_contract(&tree), vec![1, 3]);
        assert_eq!(Collection::remove(&mut tree, &1), Some(()));
        assert_eq!(Collection::find(&tree, &3), Some(&3));
        Collection::clear(&mut tree);
        assert_eq!(Collection::size(&tree), 0);
        assert!(Collection::begin(&tree).is_end());
    }
}
