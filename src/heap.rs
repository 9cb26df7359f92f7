//! `MinHeap` — a binary min-heap over separate key/value slots with a
//! pluggable comparator (spec §3/§4.3, C3).
//!
//! Grounded on the teacher's `BrandedBinaryHeap` (`collections/other/binary_heap.rs`):
//! same sift-up/sift-down shape over a flat `Vec`-backed arena. Per spec §9's
//! Design Notes, the comparator is a capability the caller supplies rather
//! than requiring `K: Ord` — this lets a single `MinHeap<K, V>` instantiation
//! serve as a max-heap, or order by a projection of `K`, without a wrapper
//! newtype at every call site.

use crate::cell::GhostCell;
use crate::error::{GraphResult, OperationFailed};
use crate::token::GhostToken;
use core::cmp::Ordering;

/// A capability that orders two keys. `less(a, b)` returning `true` means
/// `a` should end up closer to the root than `b`.
pub trait Comparator<K> {
    /// Returns `true` if `a` belongs strictly above `b` in the heap.
    fn less(&self, a: &K, b: &K) -> bool;
}

/// Natural `Ord` ordering, giving a conventional min-heap.
pub struct NaturalOrder;

impl<K: Ord> Comparator<K> for NaturalOrder {
    fn less(&self, a: &K, b: &K) -> bool {
        a.cmp(b) == Ordering::Less
    }
}

impl<K, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    fn less(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

/// A binary min-heap storing `(key, value)` pairs, ordered by `C`.
pub struct MinHeap<'brand, K, V, C> {
    keys: GhostCell<'brand, Vec<K>>,
    values: GhostCell<'brand, Vec<V>>,
    capacity: usize,
    comparator: C,
}

impl<'brand, K, V, C: Comparator<K>> MinHeap<'brand, K, V, C> {
    /// The number of slots a heap of this capacity will occupy; a pure
    /// function of `capacity`, mirroring the source's `computeBufferSize`.
    #[inline]
    pub const fn capacity_for(capacity: usize) -> usize {
        capacity
    }

    /// Creates an empty heap bounded at `capacity` elements, ordered by `comparator`.
    pub fn new(capacity: usize, comparator: C) -> Self {
        Self {
            keys: GhostCell::new(Vec::with_capacity(capacity)),
            values: GhostCell::new(Vec::with_capacity(capacity)),
            capacity,
            comparator,
        }
    }

    /// The capacity this heap was constructed with.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of elements currently in the heap.
    #[inline]
    pub fn len(&self, token: &GhostToken<'brand>) -> usize {
        self.keys.borrow(token).len()
    }

    /// `true` if the heap holds no elements.
    #[inline]
    pub fn is_empty(&self, token: &GhostToken<'brand>) -> bool {
        self.len(token) == 0
    }

    /// Inserts `(key, value)`, restoring heap order via sift-up.
    ///
    /// Fails with [`OperationFailed::Exhausted`] once `capacity` elements
    /// are already present.
    pub fn insert(&self, token: &mut GhostToken<'brand>, key: K, value: V) -> GraphResult<()> {
        if self.len(token) >= self.capacity {
            return Err(OperationFailed::Exhausted.into());
        }
        self.keys.borrow_mut(token).push(key);
        self.values.borrow_mut(token).push(value);
        let last = self.len(token) - 1;
        self.sift_up(token, last);
        Ok(())
    }

    /// Borrows the root `(key, value)` pair without removing it.
    ///
    /// Fails with [`OperationFailed::Empty`] if the heap is empty.
    pub fn peek<'a>(&'a self, token: &'a GhostToken<'brand>) -> GraphResult<(&'a K, &'a V)> {
        if self.is_empty(token) {
            return Err(OperationFailed::Empty.into());
        }
        Ok((&self.keys.borrow(token)[0], &self.values.borrow(token)[0]))
    }

    /// Removes and returns the root `(key, value)` pair, restoring heap
    /// order via sift-down.
    ///
    /// Fails with [`OperationFailed::Empty`] if the heap is empty.
    pub fn pop(&self, token: &mut GhostToken<'brand>) -> GraphResult<(K, V)> {
        if self.is_empty(token) {
            return Err(OperationFailed::Empty.into());
        }
        let last = self.len(token) - 1;
        self.keys.borrow_mut(token).swap(0, last);
        self.values.borrow_mut(token).swap(0, last);
        let key = self.keys.borrow_mut(token).pop().expect("checked non-empty above");
        let value = self.values.borrow_mut(token).pop().expect("checked non-empty above");
        if !self.is_empty(token) {
            self.sift_down(token, 0);
        }
        Ok((key, value))
    }

    /// Checks the heap-order invariant across every parent/child pair.
    ///
    /// Returns [`crate::error::InvalidArgument::InvariantViolated`] on the
    /// first violation found.
    pub fn validate(&self, token: &GhostToken<'brand>) -> GraphResult<()> {
        let keys = self.keys.borrow(token);
        for child in 1..keys.len() {
            let parent = (child - 1) / 2;
            if self.comparator.less(&keys[child], &keys[parent]) {
                return Err(crate::error::InvalidArgument::InvariantViolated.into());
            }
        }
        Ok(())
    }

    fn sift_up(&self, token: &mut GhostToken<'brand>, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            let should_swap = {
                let keys = self.keys.borrow(token);
                self.comparator.less(&keys[index], &keys[parent])
            };
            if !should_swap {
                break;
            }
            self.keys.borrow_mut(token).swap(index, parent);
            self.values.borrow_mut(token).swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&self, token: &mut GhostToken<'brand>, mut index: usize) {
        let len = self.len(token);
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            {
                let keys = self.keys.borrow(token);
                if left < len && self.comparator.less(&keys[left], &keys[smallest]) {
                    smallest = left;
                }
                if right < len && self.comparator.less(&keys[right], &keys[smallest]) {
                    smallest = right;
                }
            }

            if smallest == index {
                break;
            }
            self.keys.borrow_mut(token).swap(index, smallest);
            self.values.borrow_mut(token).swap(index, smallest);
            index = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_ascending_key_order() {
        GhostToken::new(|mut token| {
            let heap: MinHeap<i32, &str, NaturalOrder> = MinHeap::new(5, NaturalOrder);
            heap.insert(&mut token, 5, "five").unwrap();
            heap.insert(&mut token, 1, "one").unwrap();
            heap.insert(&mut token, 3, "three").unwrap();
            heap.insert(&mut token, 2, "two").unwrap();
            heap.insert(&mut token, 4, "four").unwrap();

            heap.validate(&token).unwrap();

            let mut popped = Vec::new();
            while !heap.is_empty(&token) {
                popped.push(heap.pop(&mut token).unwrap());
            }
            assert_eq!(
                popped,
                vec![(1, "one"), (2, "two"), (3, "three"), (4, "four"), (5, "five")]
            );
        });
    }

    #[test]
    fn peek_does_not_remove() {
        GhostToken::new(|mut token| {
            let heap: MinHeap<i32, i32, NaturalOrder> = MinHeap::new(3, NaturalOrder);
            heap.insert(&mut token, 10, 100).unwrap();
            heap.insert(&mut token, 2, 20).unwrap();
            assert_eq!(heap.peek(&token).unwrap(), (&2, &20));
            assert_eq!(heap.len(&token), 2);
        });
    }

    #[test]
    fn exhausted_and_empty_errors() {
        GhostToken::new(|mut token| {
            let heap: MinHeap<i32, i32, NaturalOrder> = MinHeap::new(1, NaturalOrder);
            assert!(heap.pop(&mut token).is_err());
            heap.insert(&mut token, 1, 1).unwrap();
            assert!(heap.insert(&mut token, 2, 2).is_err());
        });
    }

    #[test]
    fn custom_comparator_gives_max_heap() {
        GhostToken::new(|mut token| {
            let max_order = |a: &i32, b: &i32| a > b;
            let heap: MinHeap<i32, (), _> = MinHeap::new(3, max_order);
            heap.insert(&mut token, 1, ()).unwrap();
            heap.insert(&mut token, 9, ()).unwrap();
            heap.insert(&mut token, 5, ()).unwrap();
            assert_eq!(heap.pop(&mut token).unwrap().0, 9);
            assert_eq!(heap.pop(&mut token).unwrap().0, 5);
            assert_eq!(heap.pop(&mut token).unwrap().0, 1);
        });
    }
}
