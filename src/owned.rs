//! Owned chain bundling storage and structure in one value.
//!
//! The split between [`Chain`] and its storage is what enables sharing one
//! pool between containers, but most callers want a single self-contained
//! value. [`OwnedChain`] packages a [`BoxedChainStorage`] with the chain
//! that uses it, so no method takes a storage argument and the two can
//! never be mismatched.

use crate::{
    BoxedChain, BoxedChainStorage, Chain, Descriptor, Discipline, Full, Holder, Index,
    InsertError, Iter, IterMut,
};

/// A chain that owns its storage.
///
/// # Example
///
/// ```
/// use chainlist::{ByObject, Discipline, OwnedChain};
///
/// let mut stack: OwnedChain<u64, ByObject<u64>> =
///     OwnedChain::with_capacity(Discipline::Stack, ByObject::new(), 64);
///
/// stack.try_insert(1).unwrap();
/// stack.try_insert(2).unwrap();
///
/// assert_eq!(stack.detach(None), Some(2));
/// assert_eq!(stack.detach(None), Some(1));
/// ```
pub struct OwnedChain<T, D, Idx = u32>
where
    Idx: Index,
    D: Descriptor<Object = T>,
{
    storage: BoxedChainStorage<T, Idx>,
    chain: BoxedChain<T, D, Idx>,
}

impl<T, D, Idx> OwnedChain<T, D, Idx>
where
    Idx: Index,
    D: Descriptor<Object = T>,
{
    /// Creates an empty chain with `capacity` slots and counting enabled.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or would collide with the index type's
    /// sentinel.
    pub fn with_capacity(discipline: Discipline, descriptor: D, capacity: usize) -> Self {
        Self {
            storage: BoxedChainStorage::with_capacity(capacity),
            chain: Chain::new(discipline, descriptor),
        }
    }

    /// Returns the number of entries.
    ///
    /// Owned chains always track their count.
    #[inline]
    pub fn len(&self) -> usize {
        self.chain.len().unwrap_or(0)
    }

    /// Returns `true` if the chain holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Returns the storage capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns the discipline fixed at construction.
    #[inline]
    pub fn discipline(&self) -> Discipline {
        self.chain.discipline()
    }

    /// Returns `true` if the most recent search-resolving operation
    /// matched a node.
    #[inline]
    pub fn found(&self) -> bool {
        self.chain.found()
    }

    /// Returns the cursor, or `None` when absent.
    #[inline]
    pub fn cursor(&self) -> Option<Idx> {
        self.chain.cursor()
    }

    /// Returns a reference to the descriptor.
    #[inline]
    pub fn descriptor(&self) -> &D {
        self.chain.descriptor()
    }

    /// Returns a reference to the object at the given index.
    #[inline]
    pub fn get(&self, idx: Idx) -> Option<&T> {
        self.chain.get(&self.storage, idx)
    }

    /// Returns a mutable reference to the object at the given index.
    #[inline]
    pub fn get_mut(&mut self, idx: Idx) -> Option<&mut T> {
        self.chain.get_mut(&mut self.storage, idx)
    }

    /// Returns a reference to the head object without moving the cursor.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.chain.front(&self.storage)
    }

    /// Returns a reference to the tail object without moving the cursor.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.chain.back(&self.storage)
    }

    /// Inserts an object at the discipline's default position.
    ///
    /// See [`Chain::try_insert`].
    #[inline]
    pub fn try_insert(&mut self, object: T) -> Result<Idx, InsertError> {
        self.chain.try_insert(&mut self.storage, object)
    }

    /// Inserts an object at the discipline's end position.
    ///
    /// See [`Chain::try_append`].
    #[inline]
    pub fn try_append(&mut self, object: T) -> Result<Idx, InsertError> {
        self.chain.try_append(&mut self.storage, object)
    }

    /// Inserts an object without invoking the make hook.
    ///
    /// See [`Chain::try_attach`].
    #[inline]
    pub fn try_attach(&mut self, object: T) -> Result<Idx, Full<T>> {
        self.chain.try_attach(&mut self.storage, object)
    }

    /// Searches for the first entry matching `key`.
    ///
    /// See [`Chain::find`].
    #[inline]
    pub fn find(&mut self, key: &D::Key) -> Option<&T> {
        self.chain.find(&self.storage, key)
    }

    /// Like [`find`](OwnedChain::find), returning a mutable reference.
    #[inline]
    pub fn find_mut(&mut self, key: &D::Key) -> Option<&mut T> {
        self.chain.find_mut(&mut self.storage, key)
    }

    /// Removes an entry and releases its object through the free hook.
    ///
    /// See [`Chain::delete`].
    #[inline]
    pub fn delete(&mut self, key: Option<&D::Key>) -> bool {
        self.chain.delete(&mut self.storage, key)
    }

    /// Removes an entry and returns its object without invoking the free
    /// hook.
    ///
    /// See [`Chain::detach`].
    #[inline]
    pub fn detach(&mut self, key: Option<&D::Key>) -> Option<T> {
        self.chain.detach(&mut self.storage, key)
    }

    /// Moves the cursor to the head and returns its object.
    #[inline]
    pub fn first(&mut self) -> Option<&T> {
        self.chain.first(&self.storage)
    }

    /// Moves the cursor to the tail and returns its object.
    #[inline]
    pub fn last(&mut self) -> Option<&T> {
        self.chain.last(&self.storage)
    }

    /// Steps the cursor forward and returns the next object.
    #[inline]
    pub fn next(&mut self) -> Option<&T> {
        self.chain.next(&self.storage)
    }

    /// Steps the cursor backward and returns the previous object.
    #[inline]
    pub fn prev(&mut self) -> Option<&T> {
        self.chain.prev(&self.storage)
    }

    /// Removes every entry, passing each object through the free hook.
    ///
    /// See [`Chain::clear`].
    #[inline]
    pub fn clear(&mut self) {
        self.chain.clear(&mut self.storage);
    }

    /// Returns an iterator over references to objects, head to tail.
    #[inline]
    pub fn iter(&self) -> Iter<'_, Holder<T, Idx>, BoxedChainStorage<T, Idx>, Idx> {
        self.chain.iter(&self.storage)
    }

    /// Returns an iterator over mutable references to objects, head to
    /// tail.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, Holder<T, Idx>, BoxedChainStorage<T, Idx>, Idx> {
        self.chain.iter_mut(&mut self.storage)
    }
}

impl<T, D, Idx> Drop for OwnedChain<T, D, Idx>
where
    Idx: Index,
    D: Descriptor<Object = T>,
{
    /// Clears the chain so every remaining object passes through the free
    /// hook before storage is released.
    fn drop(&mut self) {
        self.chain.clear(&mut self.storage);
    }
}
