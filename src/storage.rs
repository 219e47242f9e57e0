//! Storage trait for slab-like containers with stable indices.
//!
//! A chain never owns its nodes directly; they live in storage that hands out
//! stable indices. This is what lets several chains share one pre-allocated
//! pool and lets a node be addressed in O(1) long after its neighbors have
//! come and gone.
//!
//! # Storage Invariant
//!
//! A chain must always be used with the same storage instance it was
//! populated through. This is the caller's responsibility (same discipline
//! as the `slab` crate).

use crate::Index;

use std::mem;

/// Slab-like storage with stable indices.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable indices**: an index stays valid until explicitly removed
/// - **O(1)** insert, remove, get
/// - **Slot reuse**: removed slots can be reused by later inserts
///
/// # Implementations
///
/// - [`BoxedStorage`] — fixed capacity chosen at runtime (in this crate)
/// - `slab::Slab<T>` — growable, insertion never fails (feature `slab`)
pub trait Storage<T> {
    /// Index type handed out by this storage.
    type Index: Index;

    /// Inserts a value, returning its stable index.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` when no free slot exists. Growable
    /// backends never fail.
    fn try_insert(&mut self, value: T) -> Result<Self::Index, Full<T>>;

    /// Removes and returns the value at `index`, if present.
    fn remove(&mut self, index: Self::Index) -> Option<T>;

    /// Returns a reference to the value at `index`, if present.
    fn get(&self, index: Self::Index) -> Option<&T>;

    /// Returns a mutable reference to the value at `index`, if present.
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T>;
}

/// Error returned when fixed-capacity storage has no free slot.
///
/// Carries the value that could not be inserted, so the caller keeps
/// ownership of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: std::fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// BoxedStorage - fixed capacity, slot array with intrusive free list
// =============================================================================

enum Slot<T, Idx> {
    Vacant { next_free: Idx },
    Occupied(T),
}

/// Fixed-capacity storage with runtime-determined size.
///
/// One boxed slot array, with vacant slots threaded into a free list.
/// Inserts pop the free list, removals push it, so the most recently
/// freed slot is reused first.
///
/// # Example
///
/// ```
/// use chainlist::{BoxedStorage, Storage};
///
/// let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(1000);
///
/// let idx = storage.try_insert(42).unwrap();
/// assert_eq!(storage.get(idx), Some(&42));
/// ```
pub struct BoxedStorage<T, Idx: Index = u32> {
    slots: Box<[Slot<T, Idx>]>,
    free_head: Idx,
    len: usize,
}

impl<T, Idx: Index> BoxedStorage<T, Idx> {
    /// Creates storage with exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or would collide with the index type's
    /// sentinel.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        assert!(
            capacity <= Idx::NONE.as_usize(),
            "capacity exceeds index type maximum"
        );

        let slots = (0..capacity)
            .map(|i| Slot::Vacant {
                next_free: if i + 1 < capacity {
                    Idx::from_usize(i + 1)
                } else {
                    Idx::NONE
                },
            })
            .collect();

        Self {
            slots,
            free_head: Idx::from_usize(0),
            len: 0,
        }
    }

    /// Returns the capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if all slots are occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.free_head.is_none()
    }

    /// Drops all stored values and makes every slot available again.
    ///
    /// # Warning
    ///
    /// Any chain still holding indices into this storage is left dangling;
    /// clear those chains first. Owned wrappers handle this automatically.
    pub fn clear(&mut self) {
        let capacity = self.slots.len();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            *slot = Slot::Vacant {
                next_free: if i + 1 < capacity {
                    Idx::from_usize(i + 1)
                } else {
                    Idx::NONE
                },
            };
        }
        self.free_head = Idx::from_usize(0);
        self.len = 0;
    }
}

impl<T, Idx: Index> Storage<T> for BoxedStorage<T, Idx> {
    type Index = Idx;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<Idx, Full<T>> {
        if self.free_head.is_none() {
            return Err(Full(value));
        }

        let idx = self.free_head;
        let slot = &mut self.slots[idx.as_usize()];
        match *slot {
            Slot::Vacant { next_free } => self.free_head = next_free,
            Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
        }
        *slot = Slot::Occupied(value);
        self.len += 1;

        Ok(idx)
    }

    #[inline]
    fn remove(&mut self, index: Idx) -> Option<T> {
        let i = index.as_usize();
        match self.slots.get(i) {
            Some(Slot::Occupied(_)) => {}
            _ => return None,
        }

        let slot = mem::replace(
            &mut self.slots[i],
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        self.free_head = index;
        self.len -= 1;

        match slot {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => unreachable!(),
        }
    }

    #[inline]
    fn get(&self, index: Idx) -> Option<&T> {
        match self.slots.get(index.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, index: Idx) -> Option<&mut T> {
        match self.slots.get_mut(index.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Index = usize;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<usize, Full<T>> {
        Ok(self.insert(value))
    }

    #[inline]
    fn remove(&mut self, index: usize) -> Option<T> {
        self.try_remove(index)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }
}
