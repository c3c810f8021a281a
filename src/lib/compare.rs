//! Ordering policies.
//!
//! Every key comparison made by the tree goes through a [`Compare`]
//! implementation. The default, [`Natural`], defers to [`Ord`]; any
//! `Fn(&Q, &Q) -> Ordering` closure works as well.

use std::cmp::Ordering;

/// A three-way comparator over keys of type `Q`. Must be a total order.
pub trait Compare<Q: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &Q, b: &Q) -> Ordering;
}

/// The key's own [`Ord`] implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<Q: Ord + ?Sized> Compare<Q> for Natural {
    #[inline]
    fn compare(&self, a: &Q, b: &Q) -> Ordering {
        a.cmp(b)
    }
}

/// Flips another comparator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reverse<C>(pub C);

impl<Q: ?Sized, C: Compare<Q>> Compare<Q> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &Q, b: &Q) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<Q: ?Sized, F> Compare<Q> for F
where
    F: Fn(&Q, &Q) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &Q, b: &Q) -> Ordering {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
        assert_eq!(Natural.compare(&7u8, &7u8), Ordering::Equal);
    }

    #[test]
    fn test_reverse() {
        let cmp = Reverse(Natural);
        assert_eq!(cmp.compare(&1, &2), Ordering::Greater);
        assert_eq!(Reverse(cmp).compare(&1, &2), Ordering::Less);
    }

    #[test]
    fn test_closure() {
        let by_len = |a: &String, b: &String| a.len().cmp(&b.len());
        assert_eq!(
            by_len.compare(&"abc".to_string(), &"z".to_string()),
            Ordering::Greater
        );
    }
}
