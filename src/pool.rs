//! `PoolAllocator` — a fixed-capacity, token-gated pool with an embedded
//! free list (spec §3/§4.2, C2).
//!
//! Grounded on the teacher's `BrandedPool` (`alloc/pool.rs`): slots form a
//! `Vec`-backed arena, and free slots carry the index of the next free slot.
//! Per spec §9's Design Notes, the free-list pointer is not overloaded into
//! a live value's bytes — it lives in a `PoolSlot::Free` variant, which
//! makes "never read the payload of a free slot" a type-level fact instead
//! of a documented one.
//!
//! The pool never grows past the capacity given to [`PoolAllocator::new`];
//! this is the "bring-your-own-buffer" discipline from spec §1 re-expressed
//! per spec §9 as an owning arena sized once at construction (see
//! `SPEC_FULL.md` §1 for the full rationale). `capacity_for` mirrors the
//! source's `computeBufferSize` — a pure function of the capacity the
//! caller intends to request.

use crate::cell::GhostCell;
use crate::error::{GraphResult, OperationFailed};
use crate::token::GhostToken;

#[derive(Clone)]
enum PoolSlot<T> {
    Occupied(T),
    Free(Option<u32>),
}

/// A fixed-capacity pool allocator with O(1) expected alloc/free.
///
/// `element_size ≥ 4` (spec §3) is moot here: slots are typed `T` values,
/// not raw bytes, so there is no minimum-size requirement to embed a free
/// pointer in the payload.
pub struct PoolAllocator<'brand, T> {
    slots: GhostCell<'brand, Vec<PoolSlot<T>>>,
    free_head: GhostCell<'brand, Option<u32>>,
    len: GhostCell<'brand, usize>,
    capacity: usize,
}

impl<'brand, T> PoolAllocator<'brand, T> {
    /// The number of slots a pool of this capacity will occupy; a pure
    /// function of `capacity`, mirroring the source's `computeBufferSize`.
    #[inline]
    pub const fn capacity_for(capacity: usize) -> usize {
        capacity
    }

    /// Creates an empty pool that can hold up to `capacity` live elements.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: GhostCell::new(Vec::with_capacity(capacity)),
            free_head: GhostCell::new(None),
            len: GhostCell::new(0),
            capacity,
        }
    }

    /// The capacity this pool was constructed with.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of currently-allocated (occupied) slots.
    #[inline]
    pub fn len(&self, token: &GhostToken<'brand>) -> usize {
        *self.len.borrow(token)
    }

    /// `true` if no slots are allocated.
    #[inline]
    pub fn is_empty(&self, token: &GhostToken<'brand>) -> bool {
        self.len(token) == 0
    }

    /// Allocates a slot for `value`, returning its index.
    ///
    /// O(1): reuses the most recently freed slot (LIFO) if one exists,
    /// otherwise appends. Fails with [`OperationFailed::Exhausted`] once
    /// `capacity` live elements are outstanding.
    pub fn alloc(&self, token: &mut GhostToken<'brand>, value: T) -> GraphResult<u32> {
        if *self.len.borrow(token) >= self.capacity {
            return Err(OperationFailed::Exhausted.into());
        }

        let free_head = *self.free_head.borrow(token);

        let idx = if let Some(idx) = free_head {
            let next = match &self.slots.borrow(token)[idx as usize] {
                PoolSlot::Free(next) => *next,
                PoolSlot::Occupied(_) => {
                    debug_assert!(false, "free_head pointed to an occupied slot");
                    None
                }
            };
            *self.free_head.borrow_mut(token) = next;
            self.slots.borrow_mut(token)[idx as usize] = PoolSlot::Occupied(value);
            idx
        } else {
            let slots = self.slots.borrow_mut(token);
            let idx = slots.len() as u32;
            slots.push(PoolSlot::Occupied(value));
            idx
        };

        *self.len.borrow_mut(token) += 1;
        Ok(idx)
    }

    /// Frees the slot at `index`, discarding its value.
    ///
    /// # Safety
    /// `index` must currently be occupied. Freeing an already-free or
    /// out-of-range index corrupts the free list silently — this crate does
    /// not detect double-free, exactly as spec §9 documents as an accepted
    /// open question; the `unsafe` marker here carries that caveat into the
    /// type signature instead of leaving it as prose alone.
    pub unsafe fn free(&self, token: &mut GhostToken<'brand>, index: u32) {
        let next = *self.free_head.borrow(token);
        let slots = self.slots.borrow_mut(token);
        slots[index as usize] = PoolSlot::Free(next);
        *self.free_head.borrow_mut(token) = Some(index);
        *self.len.borrow_mut(token) -= 1;
    }

    /// Frees the slot at `index` and returns its value.
    ///
    /// # Safety
    /// Same contract as [`PoolAllocator::free`].
    pub unsafe fn take(&self, token: &mut GhostToken<'brand>, index: u32) -> T {
        let next = *self.free_head.borrow(token);
        let slots = self.slots.borrow_mut(token);
        let old = core::mem::replace(&mut slots[index as usize], PoolSlot::Free(next));
        *self.free_head.borrow_mut(token) = Some(index);
        *self.len.borrow_mut(token) -= 1;
        match old {
            PoolSlot::Occupied(value) => value,
            PoolSlot::Free(_) => unreachable!("double free in take()"),
        }
    }

    /// Shared access to the value at `index`, or `None` if the slot is free
    /// or out of range.
    pub fn get<'a>(&'a self, token: &'a GhostToken<'brand>, index: u32) -> Option<&'a T> {
        match self.slots.borrow(token).get(index as usize)? {
            PoolSlot::Occupied(value) => Some(value),
            PoolSlot::Free(_) => None,
        }
    }

    /// Mutable access to the value at `index`, or `None` if the slot is free
    /// or out of range.
    pub fn get_mut<'a>(&'a self, token: &'a mut GhostToken<'brand>, index: u32) -> Option<&'a mut T> {
        match self.slots.borrow_mut(token).get_mut(index as usize)? {
            PoolSlot::Occupied(value) => Some(value),
            PoolSlot::Free(_) => None,
        }
    }
}
