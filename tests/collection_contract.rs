//! The tree must be interchangeable with any other collection meeting the
//! shared contract. A sorted vector stands in for the sibling collections.

use rb_tree::{Collection, Position, RbTree, Rejected};

// =============================================================================
// A minimal sibling collection
// =============================================================================

struct SortedVec<T> {
    items: Vec<T>,
}

#[derive(PartialEq)]
struct VecCursor<'a, T> {
    items: &'a [T],
    index: usize,
}

impl<T> Position for VecCursor<'_, T> {
    type Item = T;

    fn get(&self) -> Option<&T> {
        self.items.get(self.index)
    }

    fn move_next(&mut self) {
        if self.index < self.items.len() {
            self.index += 1;
        }
    }

    fn move_prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    fn is_end(&self) -> bool {
        self.index == self.items.len()
    }
}

impl<T: Ord> Collection<T> for SortedVec<T> {
    type Released = ();

    type Cursor<'a> = VecCursor<'a, T>
    where
        Self: 'a;

    fn add(&mut self, value: T) -> Result<(), Rejected<T>> {
        match self.items.binary_search(&value) {
            Ok(_) => Err(Rejected(value)),
            Err(at) => {
                self.items.insert(at, value);
                Ok(())
            }
        }
    }

    fn remove(&mut self, key: &T) -> Option<()> {
        let at = self.items.binary_search(key).ok()?;
        self.items.remove(at);
        Some(())
    }

    fn find(&self, key: &T) -> Option<&T> {
        let at = self.items.binary_search(key).ok()?;
        self.items.get(at)
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn size(&self) -> usize {
        self.items.len()
    }

    fn begin(&self) -> VecCursor<'_, T> {
        VecCursor {
            items: &self.items,
            index: 0,
        }
    }

    fn end(&self) -> VecCursor<'_, T> {
        VecCursor {
            items: &self.items,
            index: self.items.len(),
        }
    }
}

// =============================================================================
// Generic drivers
// =============================================================================

fn contents<T: Clone, K: Collection<T>>(collection: &K) -> Vec<T> {
    let mut out = Vec::new();
    let mut cursor = collection.begin();
    let end = collection.end();
    while cursor != end {
        if let Some(v) = cursor.get() {
            out.push(v.clone());
        }
        cursor.move_next();
    }
    out
}

fn contents_backwards<T: Clone, K: Collection<T>>(collection: &K) -> Vec<T> {
    let mut out = Vec::new();
    if collection.size() == 0 {
        return out;
    }
    let mut cursor = collection.end();
    loop {
        cursor.move_prev();
        if let Some(v) = cursor.get() {
            out.push(v.clone());
        }
        if cursor == collection.begin() {
            break;
        }
    }
    out
}

/// Runs one scripted workload and returns what the collection looked like at
/// each checkpoint.
fn run_script<K: Collection<u32>>(collection: &mut K) -> Vec<(usize, Vec<u32>)> {
    let mut checkpoints = Vec::new();
    for k in [50u32, 20, 80, 10, 30, 70, 90, 60, 40] {
        assert!(collection.add(k).is_ok());
    }
    assert_eq!(collection.add(30).err().map(Rejected::into_inner), Some(30));
    checkpoints.push((collection.size(), contents(collection)));

    assert!(collection.remove(&50).is_some());
    assert!(collection.remove(&50).is_none());
    assert!(collection.find(&50).is_none());
    assert_eq!(collection.find(&60), Some(&60));
    checkpoints.push((collection.size(), contents_backwards(collection)));

    collection.clear();
    assert!(collection.begin().is_end());
    assert!(collection.begin() == collection.end());
    checkpoints.push((collection.size(), contents(collection)));
    checkpoints
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn tree_matches_sorted_vec() {
    let mut tree: RbTree<u32> = RbTree::new();
    let mut vec = SortedVec { items: Vec::new() };
    let ours = run_script(&mut tree);
    let theirs = run_script(&mut vec);
    assert_eq!(ours, theirs);
    assert_eq!(ours[0], (9, vec![10, 20, 30, 40, 50, 60, 70, 80, 90]));
    assert_eq!(ours[1], (8, vec![90, 80, 70, 60, 40, 30, 20, 10]));
    assert_eq!(ours[2], (0, vec![]));
}

#[test]
fn tree_is_reusable_after_clear() {
    let mut tree: RbTree<u32> = RbTree::new();
    run_script(&mut tree);
    let again = run_script(&mut tree);
    assert_eq!(again[0].0, 9);
    assert!(tree.audit().is_ok());
}
