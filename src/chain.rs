//! The discipline-parameterized chain container.
//!
//! One container, four access policies. A [`Chain`] is a doubly-linked
//! sequence over external storage that behaves as an ordered list, a deque,
//! a stack, or a FIFO queue depending on the [`Discipline`] it was
//! constructed with. All four share one node representation, one linear
//! search, and one cursor model.
//!
//! # The cursor
//!
//! The chain remembers the most recently inserted, found, or stepped node.
//! The cursor is what makes O(1) relative insertion possible for the
//! `List` discipline, and it is the implicit target of `first`/`last`/
//! `next`/`prev` walks. It is conservatively cleared whenever a removal
//! could leave it ambiguous; callers observing an absent cursor must
//! re-search.
//!
//! # Example
//!
//! ```
//! use chainlist::{BoxedChain, BoxedChainStorage, ByObject, Chain, Discipline};
//!
//! let mut storage: BoxedChainStorage<u64> = BoxedChainStorage::with_capacity(16);
//! let mut queue: BoxedChain<u64, ByObject<u64>> =
//!     Chain::new(Discipline::Queue, ByObject::new());
//!
//! queue.try_insert(&mut storage, 1).unwrap();
//! queue.try_insert(&mut storage, 2).unwrap();
//! queue.try_insert(&mut storage, 3).unwrap();
//!
//! assert_eq!(queue.first(&storage), Some(&1)); // FIFO
//! assert!(queue.delete(&mut storage, None));   // pop the head
//! assert_eq!(queue.first(&storage), Some(&2));
//! assert_eq!(queue.len(), Some(2));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use crate::{BoxedStorage, Descriptor, Discipline, Full, Holder, Index, Node, Storage};

/// Type alias for storage holding boxed-strategy chain nodes.
pub type BoxedChainStorage<T, Idx = u32> = BoxedStorage<Holder<T, Idx>, Idx>;

/// Type alias for a chain of boxed nodes over [`BoxedChainStorage`].
pub type BoxedChain<T, D, Idx = u32> = Chain<Holder<T, Idx>, BoxedChainStorage<T, Idx>, D, Idx>;

/// Error returned by the insert family after lifecycle hooks have run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// The descriptor's make hook declined the object; nothing was
    /// inserted and the container is unchanged.
    Rejected,
    /// Storage had no free slot. The already-constructed object was
    /// released through the descriptor's free hook, so it does not leak;
    /// the container is otherwise unchanged.
    Full,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::Rejected => write!(f, "make hook rejected the object"),
            InsertError::Full => write!(f, "storage is full"),
        }
    }
}

impl std::error::Error for InsertError {}

/// A discipline-parameterized linked container over external storage.
///
/// # Type Parameters
///
/// - `N`: node type — [`Holder<T>`](crate::Holder) for the boxed strategy,
///   or a user type with embedded links implementing [`Node`]
/// - `S`: storage type (e.g. [`BoxedChainStorage<T>`])
/// - `D`: descriptor supplying key extraction, comparison, and hooks
/// - `Idx`: index type (default `u32`)
///
/// The chain itself stores only head, tail, cursor, and bookkeeping; nodes
/// live in caller-provided storage, which may be shared with other chains.
pub struct Chain<N, S, D, Idx = u32>
where
    Idx: Index,
    N: Node<Idx>,
    S: Storage<N, Index = Idx>,
    D: Descriptor<Object = N::Object>,
{
    head: Idx,
    tail: Idx,
    here: Idx,
    found: bool,
    len: Option<usize>,
    discipline: Discipline,
    descriptor: D,
    _marker: PhantomData<(N, S)>,
}

impl<N, S, D, Idx> Chain<N, S, D, Idx>
where
    Idx: Index,
    N: Node<Idx>,
    S: Storage<N, Index = Idx>,
    D: Descriptor<Object = N::Object>,
{
    /// Creates an empty chain with entry counting enabled.
    pub const fn new(discipline: Discipline, descriptor: D) -> Self {
        Self {
            head: Idx::NONE,
            tail: Idx::NONE,
            here: Idx::NONE,
            found: false,
            len: Some(0),
            discipline,
            descriptor,
            _marker: PhantomData,
        }
    }

    /// Creates an empty chain that does not track its entry count.
    ///
    /// An opt-out for very large collections where maintaining the counter
    /// is wasted work; [`len`](Chain::len) reports `None` forever.
    pub const fn untracked(discipline: Discipline, descriptor: D) -> Self {
        Self {
            head: Idx::NONE,
            tail: Idx::NONE,
            here: Idx::NONE,
            found: false,
            len: None,
            discipline,
            descriptor,
            _marker: PhantomData,
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the number of entries, or `None` when tracking is disabled.
    #[inline]
    pub const fn len(&self) -> Option<usize> {
        self.len
    }

    /// Returns `true` if the chain holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the discipline fixed at construction.
    #[inline]
    pub const fn discipline(&self) -> Discipline {
        self.discipline
    }

    /// Returns `true` if the most recent search-resolving operation
    /// (`find`, keyed `delete`/`detach`) matched a node.
    ///
    /// Cleared at the start of every operation.
    #[inline]
    pub const fn found(&self) -> bool {
        self.found
    }

    /// Returns the cursor: the index of the most recently touched node,
    /// or `None` when absent.
    #[inline]
    pub fn cursor(&self) -> Option<Idx> {
        if self.here.is_none() {
            None
        } else {
            Some(self.here)
        }
    }

    /// Returns a reference to the descriptor.
    #[inline]
    pub const fn descriptor(&self) -> &D {
        &self.descriptor
    }

    /// Returns a mutable reference to the descriptor.
    #[inline]
    pub fn descriptor_mut(&mut self) -> &mut D {
        &mut self.descriptor
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns a reference to the object at the given index.
    #[inline]
    pub fn get<'a>(&self, storage: &'a S, idx: Idx) -> Option<&'a N::Object>
    where
        N: 'a,
    {
        storage.get(idx).map(N::object)
    }

    /// Returns a mutable reference to the object at the given index.
    #[inline]
    pub fn get_mut<'a>(&self, storage: &'a mut S, idx: Idx) -> Option<&'a mut N::Object>
    where
        N: 'a,
    {
        storage.get_mut(idx).map(N::object_mut)
    }

    /// Returns a reference to the head object without moving the cursor.
    #[inline]
    pub fn front<'a>(&self, storage: &'a S) -> Option<&'a N::Object>
    where
        N: 'a,
    {
        if self.head.is_none() {
            None
        } else {
            Some(self.node(storage, self.head).object())
        }
    }

    /// Returns a reference to the tail object without moving the cursor.
    #[inline]
    pub fn back<'a>(&self, storage: &'a S) -> Option<&'a N::Object>
    where
        N: 'a,
    {
        if self.tail.is_none() {
            None
        } else {
            Some(self.node(storage, self.tail).object())
        }
    }

    // ========================================================================
    // Insert family
    // ========================================================================

    /// Inserts an object at the discipline's default position.
    ///
    /// Runs the make hook first; what it returns is what gets stored.
    /// Placement: new head for `Stack`, new tail for `Queue`, head for
    /// `Deque`, and before the cursor (falling back to the head) for
    /// `List`. The cursor is left on the new node and its stable index is
    /// returned.
    ///
    /// # Errors
    ///
    /// [`InsertError::Rejected`] when the make hook returns `None`;
    /// [`InsertError::Full`] when storage has no free slot, in which case
    /// the constructed object has been released through the free hook.
    pub fn try_insert(&mut self, storage: &mut S, object: N::Object) -> Result<Idx, InsertError> {
        self.found = false;
        let object = match self.descriptor.make(object) {
            Some(object) => object,
            None => return Err(InsertError::Rejected),
        };
        match self.attach_node(storage, object, false) {
            Ok(idx) => Ok(idx),
            Err(full) => {
                self.descriptor.free(full.into_inner());
                Err(InsertError::Full)
            }
        }
    }

    /// Inserts an object at the discipline's end position.
    ///
    /// Same contract as [`try_insert`](Chain::try_insert), with the back
    /// placement rules: tail for `Queue` and `Deque`, still the head for
    /// `Stack`, and after the cursor (falling back to the tail) for
    /// `List`.
    pub fn try_append(&mut self, storage: &mut S, object: N::Object) -> Result<Idx, InsertError> {
        self.found = false;
        let object = match self.descriptor.make(object) {
            Some(object) => object,
            None => return Err(InsertError::Rejected),
        };
        match self.attach_node(storage, object, true) {
            Ok(idx) => Ok(idx),
            Err(full) => {
                self.descriptor.free(full.into_inner());
                Err(InsertError::Full)
            }
        }
    }

    /// Inserts an object without invoking the make hook.
    ///
    /// The counterpart of [`detach`](Chain::detach): an object reclaimed
    /// from one chain can be attached to another with neither hook firing.
    /// Placement follows the discipline's default position.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(object))` when storage has no free slot, handing
    /// the object back to the caller.
    pub fn try_attach(&mut self, storage: &mut S, object: N::Object) -> Result<Idx, Full<N::Object>> {
        self.found = false;
        self.attach_node(storage, object, false)
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Searches for the first entry whose key compares equal to `key`.
    ///
    /// If the cursor's key already matches, it is reused in O(1);
    /// otherwise a linear scan runs head to tail. On a hit the cursor
    /// moves to the match and [`found`](Chain::found) is set; on a miss
    /// the cursor stays where it was.
    pub fn find<'a>(&mut self, storage: &'a S, key: &D::Key) -> Option<&'a N::Object>
    where
        N: 'a,
    {
        self.found = false;
        let idx = self.locate(storage, key);
        if idx.is_none() {
            return None;
        }
        self.found = true;
        self.here = idx;
        Some(self.node(storage, idx).object())
    }

    /// Like [`find`](Chain::find), returning a mutable reference.
    pub fn find_mut<'a>(&mut self, storage: &'a mut S, key: &D::Key) -> Option<&'a mut N::Object>
    where
        N: 'a,
    {
        self.found = false;
        let idx = self.locate(storage, key);
        if idx.is_none() {
            return None;
        }
        self.found = true;
        self.here = idx;
        storage.get_mut(idx).map(N::object_mut)
    }

    // ========================================================================
    // Delete family
    // ========================================================================

    /// Removes an entry and releases its object through the free hook.
    ///
    /// With `Some(key)`, the target is resolved exactly like
    /// [`find`](Chain::find) (setting [`found`](Chain::found) on a hit).
    /// With `None`, the head is removed for `Stack` and `Queue` — the pop
    /// operation — while `List` and `Deque` report `false`.
    ///
    /// If the removed node was the cursor, the cursor advances to its
    /// former right neighbor; any other removal clears the cursor, so a
    /// stale position can never be observed.
    ///
    /// Returns `true` if an entry was removed.
    pub fn delete(&mut self, storage: &mut S, key: Option<&D::Key>) -> bool {
        match self.take(storage, key) {
            Some(object) => {
                self.descriptor.free(object);
                true
            }
            None => false,
        }
    }

    /// Removes an entry and returns its object without invoking the free
    /// hook.
    ///
    /// Target resolution and cursor behavior are identical to
    /// [`delete`](Chain::delete). For callers that want the object back,
    /// e.g. to attach it to another chain.
    pub fn detach(&mut self, storage: &mut S, key: Option<&D::Key>) -> Option<N::Object> {
        self.take(storage, key)
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Moves the cursor to the head and returns its object.
    ///
    /// On an empty chain returns `None` and leaves the cursor untouched.
    pub fn first<'a>(&mut self, storage: &'a S) -> Option<&'a N::Object>
    where
        N: 'a,
    {
        self.found = false;
        if self.head.is_none() {
            return None;
        }
        self.here = self.head;
        Some(self.node(storage, self.head).object())
    }

    /// Moves the cursor to the tail and returns its object.
    ///
    /// On an empty chain returns `None` and leaves the cursor untouched.
    pub fn last<'a>(&mut self, storage: &'a S) -> Option<&'a N::Object>
    where
        N: 'a,
    {
        self.found = false;
        if self.tail.is_none() {
            return None;
        }
        self.here = self.tail;
        Some(self.node(storage, self.tail).object())
    }

    /// Steps the cursor to the next node and returns its object.
    ///
    /// Returns `None` when no cursor is set; stepping past the tail also
    /// returns `None` and clears the cursor.
    pub fn next<'a>(&mut self, storage: &'a S) -> Option<&'a N::Object>
    where
        N: 'a,
    {
        self.found = false;
        if self.here.is_none() {
            return None;
        }
        let next = self.node(storage, self.here).next();
        self.here = next;
        if next.is_none() {
            None
        } else {
            Some(self.node(storage, next).object())
        }
    }

    /// Steps the cursor to the previous node and returns its object.
    ///
    /// Returns `None` when no cursor is set; stepping back from the head
    /// also returns `None` and clears the cursor.
    pub fn prev<'a>(&mut self, storage: &'a S) -> Option<&'a N::Object>
    where
        N: 'a,
    {
        self.found = false;
        if self.here.is_none() {
            return None;
        }
        if self.here == self.head {
            self.here = Idx::NONE;
            return None;
        }
        let prev = self.node(storage, self.here).prev();
        self.here = prev;
        Some(self.node(storage, prev).object())
    }

    /// Removes every entry, passing each object through the free hook and
    /// freeing its storage slot.
    ///
    /// The one place the whole chain is traversed and released as a unit.
    /// A no-op on an empty chain. Head, tail, and cursor become absent; a
    /// tracked length resets to zero.
    pub fn clear(&mut self, storage: &mut S) {
        self.found = false;
        let mut idx = self.head;
        while idx.is_some() {
            let node = storage.remove(idx).expect("chain node missing from storage");
            idx = node.next();
            self.descriptor.free(node.into_object());
        }
        self.head = Idx::NONE;
        self.tail = Idx::NONE;
        self.here = Idx::NONE;
        if let Some(len) = self.len.as_mut() {
            *len = 0;
        }
    }

    /// Returns an iterator over references to objects, head to tail.
    ///
    /// Does not move the cursor.
    #[inline]
    pub fn iter<'a>(&self, storage: &'a S) -> Iter<'a, N, S, Idx> {
        Iter {
            storage,
            front: self.head,
            back: self.tail,
            _marker: PhantomData,
        }
    }

    /// Returns an iterator over mutable references to objects, head to
    /// tail.
    ///
    /// Does not move the cursor.
    #[inline]
    pub fn iter_mut<'a>(&self, storage: &'a mut S) -> IterMut<'a, N, S, Idx> {
        IterMut {
            storage,
            front: self.head,
            back: self.tail,
            _marker: PhantomData,
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    #[inline]
    fn node<'a>(&self, storage: &'a S, idx: Idx) -> &'a N {
        storage.get(idx).expect("chain node missing from storage")
    }

    #[inline]
    fn node_mut<'a>(&self, storage: &'a mut S, idx: Idx) -> &'a mut N {
        storage.get_mut(idx).expect("chain node missing from storage")
    }

    /// Stores the object as a fresh node and links it per the discipline.
    fn attach_node(
        &mut self,
        storage: &mut S,
        object: N::Object,
        at_end: bool,
    ) -> Result<Idx, Full<N::Object>> {
        let idx = match storage.try_insert(N::from_object(object)) {
            Ok(idx) => idx,
            Err(full) => return Err(Full(full.into_inner().into_object())),
        };
        self.place(storage, idx, at_end);
        Ok(idx)
    }

    /// Discipline dispatch for insert placement.
    fn place(&mut self, storage: &mut S, idx: Idx, at_end: bool) {
        match self.discipline {
            Discipline::Stack => self.link_front(storage, idx),
            Discipline::Queue => self.link_back(storage, idx),
            Discipline::Deque => {
                if at_end {
                    self.link_back(storage, idx);
                } else {
                    self.link_front(storage, idx);
                }
            }
            Discipline::List => {
                let here = self.here;
                if at_end {
                    if here.is_some() && self.node(storage, here).next().is_some() {
                        self.link_after(storage, here, idx);
                    } else {
                        self.link_back(storage, idx);
                    }
                } else if here.is_some() && here != self.head {
                    self.link_before(storage, here, idx);
                } else {
                    self.link_front(storage, idx);
                }
            }
        }
        if let Some(len) = self.len.as_mut() {
            *len += 1;
        }
        self.here = idx;
    }

    fn link_front(&mut self, storage: &mut S, idx: Idx) {
        let head = self.head;
        {
            let node = self.node_mut(storage, idx);
            node.set_next(head);
            node.set_prev(Idx::NONE);
        }
        if head.is_some() {
            self.node_mut(storage, head).set_prev(idx);
        } else {
            self.tail = idx;
        }
        self.head = idx;
    }

    fn link_back(&mut self, storage: &mut S, idx: Idx) {
        let tail = self.tail;
        {
            let node = self.node_mut(storage, idx);
            node.set_prev(tail);
            node.set_next(Idx::NONE);
        }
        if tail.is_some() {
            self.node_mut(storage, tail).set_next(idx);
        } else {
            self.head = idx;
        }
        self.tail = idx;
    }

    fn link_after(&mut self, storage: &mut S, after: Idx, idx: Idx) {
        let next = self.node(storage, after).next();
        {
            let node = self.node_mut(storage, idx);
            node.set_prev(after);
            node.set_next(next);
        }
        self.node_mut(storage, after).set_next(idx);
        if next.is_some() {
            self.node_mut(storage, next).set_prev(idx);
        } else {
            self.tail = idx;
        }
    }

    fn link_before(&mut self, storage: &mut S, before: Idx, idx: Idx) {
        let prev = self.node(storage, before).prev();
        {
            let node = self.node_mut(storage, idx);
            node.set_next(before);
            node.set_prev(prev);
        }
        self.node_mut(storage, before).set_prev(idx);
        if prev.is_some() {
            self.node_mut(storage, prev).set_next(idx);
        } else {
            self.head = idx;
        }
    }

    /// Unlinks a node from both directions, repairing head/tail, and
    /// clears its links.
    fn unlink(&mut self, storage: &mut S, idx: Idx) {
        let node = self.node(storage, idx);
        let prev = node.prev();
        let next = node.next();

        if prev.is_some() {
            self.node_mut(storage, prev).set_next(next);
        } else {
            self.head = next;
        }
        if next.is_some() {
            self.node_mut(storage, next).set_prev(prev);
        } else {
            self.tail = prev;
        }

        let node = self.node_mut(storage, idx);
        node.set_prev(Idx::NONE);
        node.set_next(Idx::NONE);
    }

    /// Key search with the cursor fast path.
    fn locate(&self, storage: &S, key: &D::Key) -> Idx {
        if self.here.is_some() {
            let cursor_key = self.descriptor.key(self.node(storage, self.here).object());
            if self.descriptor.compare(key, cursor_key) == Ordering::Equal {
                return self.here;
            }
        }

        let mut idx = self.head;
        while idx.is_some() {
            let node = self.node(storage, idx);
            if self.descriptor.compare(key, self.descriptor.key(node.object())) == Ordering::Equal {
                return idx;
            }
            idx = node.next();
        }
        Idx::NONE
    }

    /// Shared removal path for `delete` and `detach`.
    fn take(&mut self, storage: &mut S, key: Option<&D::Key>) -> Option<N::Object> {
        self.found = false;
        let target = match key {
            Some(key) => {
                let idx = self.locate(storage, key);
                if idx.is_none() {
                    return None;
                }
                self.found = true;
                idx
            }
            None => {
                // Headless removal is the pop operation; positional
                // disciplines have no implicit target.
                if self.discipline.is_positional() || self.head.is_none() {
                    return None;
                }
                self.head
            }
        };

        let next = self.node(storage, target).next();
        self.unlink(storage, target);
        self.here = if self.here == target { next } else { Idx::NONE };
        if let Some(len) = self.len.as_mut() {
            *len -= 1;
        }

        let node = storage.remove(target).expect("chain node missing from storage");
        Some(node.into_object())
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over references to chain objects, head to tail.
pub struct Iter<'a, N, S, Idx: Index> {
    storage: &'a S,
    front: Idx,
    back: Idx,
    _marker: PhantomData<N>,
}

impl<'a, N, S, Idx> Iterator for Iter<'a, N, S, Idx>
where
    Idx: Index,
    N: Node<Idx> + 'a,
    N::Object: 'a,
    S: Storage<N, Index = Idx>,
{
    type Item = &'a N::Object;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front.is_none() {
            return None;
        }

        let node = self
            .storage
            .get(self.front)
            .expect("chain node missing from storage");

        // Ends met in the middle
        if self.front == self.back {
            self.front = Idx::NONE;
            self.back = Idx::NONE;
        } else {
            self.front = node.next();
        }

        Some(node.object())
    }
}

impl<'a, N, S, Idx> DoubleEndedIterator for Iter<'a, N, S, Idx>
where
    Idx: Index,
    N: Node<Idx> + 'a,
    N::Object: 'a,
    S: Storage<N, Index = Idx>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back.is_none() {
            return None;
        }

        let node = self
            .storage
            .get(self.back)
            .expect("chain node missing from storage");

        if self.front == self.back {
            self.front = Idx::NONE;
            self.back = Idx::NONE;
        } else {
            self.back = node.prev();
        }

        Some(node.object())
    }
}

/// Iterator over mutable references to chain objects, head to tail.
pub struct IterMut<'a, N, S, Idx: Index> {
    storage: &'a mut S,
    front: Idx,
    back: Idx,
    _marker: PhantomData<N>,
}

impl<'a, N, S, Idx> Iterator for IterMut<'a, N, S, Idx>
where
    Idx: Index,
    N: Node<Idx> + 'a,
    N::Object: 'a,
    S: Storage<N, Index = Idx>,
{
    type Item = &'a mut N::Object;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front.is_none() {
            return None;
        }

        let node = self
            .storage
            .get_mut(self.front)
            .expect("chain node missing from storage");

        if self.front == self.back {
            self.front = Idx::NONE;
            self.back = Idx::NONE;
        } else {
            self.front = node.next();
        }

        // Each node is visited exactly once, so the handed-out borrows
        // are disjoint.
        Some(unsafe { &mut *(node.object_mut() as *mut N::Object) })
    }
}

impl<'a, N, S, Idx> DoubleEndedIterator for IterMut<'a, N, S, Idx>
where
    Idx: Index,
    N: Node<Idx> + 'a,
    N::Object: 'a,
    S: Storage<N, Index = Idx>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back.is_none() {
            return None;
        }

        let node = self
            .storage
            .get_mut(self.back)
            .expect("chain node missing from storage");

        if self.front == self.back {
            self.front = Idx::NONE;
            self.back = Idx::NONE;
        } else {
            self.back = node.prev();
        }

        // Each node is visited exactly once, so the handed-out borrows
        // are disjoint.
        Some(unsafe { &mut *(node.object_mut() as *mut N::Object) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ByObject;
    use std::cell::Cell;
    use std::rc::Rc;

    type Storage16 = BoxedChainStorage<u64>;
    type U64Chain = BoxedChain<u64, ByObject<u64>>;

    fn chain(discipline: Discipline) -> (Storage16, U64Chain) {
        (
            BoxedChainStorage::with_capacity(16),
            Chain::new(discipline, ByObject::new()),
        )
    }

    fn contents(chain: &U64Chain, storage: &Storage16) -> Vec<u64> {
        chain.iter(storage).copied().collect()
    }

    #[test]
    fn new_chain_is_empty() {
        let (storage, mut chain) = chain(Discipline::Queue);
        assert!(chain.is_empty());
        assert_eq!(chain.len(), Some(0));
        assert!(!chain.found());
        assert!(chain.cursor().is_none());
        assert!(chain.first(&storage).is_none());
        assert!(chain.last(&storage).is_none());
    }

    #[test]
    fn stack_pops_in_reverse_order() {
        let (mut storage, mut chain) = chain(Discipline::Stack);

        for v in [1, 2, 3, 4] {
            chain.try_insert(&mut storage, v).unwrap();
        }

        assert_eq!(chain.first(&storage), Some(&4));
        let mut popped = Vec::new();
        while let Some(v) = chain.detach(&mut storage, None) {
            popped.push(v);
        }
        assert_eq!(popped, vec![4, 3, 2, 1]);
        assert!(chain.is_empty());
    }

    #[test]
    fn queue_pops_in_insertion_order() {
        let (mut storage, mut chain) = chain(Discipline::Queue);

        for v in [1, 2, 3, 4] {
            chain.try_insert(&mut storage, v).unwrap();
        }

        assert_eq!(chain.first(&storage), Some(&1));
        let mut popped = Vec::new();
        while let Some(v) = chain.detach(&mut storage, None) {
            popped.push(v);
        }
        assert_eq!(popped, vec![1, 2, 3, 4]);
    }

    #[test]
    fn stack_ignores_append() {
        let (mut storage, mut chain) = chain(Discipline::Stack);

        chain.try_append(&mut storage, 1).unwrap();
        chain.try_append(&mut storage, 2).unwrap();

        assert_eq!(contents(&chain, &storage), vec![2, 1]);
    }

    #[test]
    fn deque_inserts_at_both_ends() {
        let (mut storage, mut chain) = chain(Discipline::Deque);

        chain.try_insert(&mut storage, 2).unwrap();
        chain.try_append(&mut storage, 3).unwrap();
        chain.try_insert(&mut storage, 1).unwrap();

        assert_eq!(contents(&chain, &storage), vec![1, 2, 3]);
    }

    #[test]
    fn list_inserts_relative_to_cursor() {
        let (mut storage, mut chain) = chain(Discipline::List);

        chain.try_append(&mut storage, 10).unwrap();
        chain.try_append(&mut storage, 30).unwrap();
        // Cursor on 30 (tail): append falls back to the tail
        chain.try_append(&mut storage, 40).unwrap();
        assert_eq!(contents(&chain, &storage), vec![10, 30, 40]);

        // Put the cursor on 30, then append lands right after it
        chain.find(&storage, &30).unwrap();
        chain.try_append(&mut storage, 35).unwrap();
        assert_eq!(contents(&chain, &storage), vec![10, 30, 35, 40]);

        // Cursor on 30 again, prepend lands right before it
        chain.find(&storage, &30).unwrap();
        chain.try_insert(&mut storage, 20).unwrap();
        assert_eq!(contents(&chain, &storage), vec![10, 20, 30, 35, 40]);

        // Cursor at the head: prepend falls back to the head
        chain.first(&storage).unwrap();
        chain.try_insert(&mut storage, 5).unwrap();
        assert_eq!(contents(&chain, &storage), vec![5, 10, 20, 30, 35, 40]);
    }

    #[test]
    fn insert_sets_cursor_to_new_node() {
        let (mut storage, mut chain) = chain(Discipline::Queue);

        let idx = chain.try_insert(&mut storage, 7).unwrap();
        assert_eq!(chain.cursor(), Some(idx));
    }

    #[test]
    fn find_round_trip_sets_found() {
        let (mut storage, mut chain) = chain(Discipline::Queue);

        chain.try_insert(&mut storage, 7).unwrap();
        assert_eq!(chain.find(&storage, &7), Some(&7));
        assert!(chain.found());

        assert!(chain.find(&storage, &9).is_none());
        assert!(!chain.found());
    }

    #[test]
    fn find_miss_keeps_cursor() {
        let (mut storage, mut chain) = chain(Discipline::List);

        chain.try_append(&mut storage, 1).unwrap();
        chain.try_append(&mut storage, 2).unwrap();
        let cursor = chain.cursor();

        assert!(chain.find(&storage, &99).is_none());
        assert_eq!(chain.cursor(), cursor);
    }

    #[test]
    fn find_reuses_cursor_for_matching_key() {
        let (mut storage, mut chain) = chain(Discipline::Queue);

        for v in [1, 2, 3] {
            chain.try_insert(&mut storage, v).unwrap();
        }
        let idx = chain.find(&storage, &2).map(|_| chain.cursor().unwrap());

        // Same key again resolves through the cursor
        assert_eq!(chain.find(&storage, &2), Some(&2));
        assert_eq!(chain.cursor(), idx);
    }

    #[test]
    fn find_mut_allows_in_place_edit() {
        let (mut storage, mut chain) = chain(Discipline::Queue);

        chain.try_insert(&mut storage, 5).unwrap();
        *chain.find_mut(&mut storage, &5).unwrap() = 6;
        assert_eq!(contents(&chain, &storage), vec![6]);
    }

    #[test]
    fn delete_shrinks_and_hides() {
        let (mut storage, mut chain) = chain(Discipline::Queue);

        for v in [1, 2, 3] {
            chain.try_insert(&mut storage, v).unwrap();
        }

        assert!(chain.delete(&mut storage, Some(&2)));
        assert!(chain.found());
        assert_eq!(chain.len(), Some(2));
        assert!(chain.find(&storage, &2).is_none());
        assert_eq!(contents(&chain, &storage), vec![1, 3]);
    }

    #[test]
    fn delete_miss_reports_false() {
        let (mut storage, mut chain) = chain(Discipline::Queue);

        chain.try_insert(&mut storage, 1).unwrap();
        assert!(!chain.delete(&mut storage, Some(&9)));
        assert!(!chain.found());
        assert_eq!(chain.len(), Some(1));
    }

    #[test]
    fn headless_delete_pops_stack_and_queue_only() {
        let (mut storage, mut chain) = chain(Discipline::Queue);
        chain.try_insert(&mut storage, 1).unwrap();
        assert!(chain.delete(&mut storage, None));
        assert!(!chain.found());

        let (mut storage, mut chain) = chain2(Discipline::List);
        chain.try_insert(&mut storage, 1).unwrap();
        assert!(!chain.delete(&mut storage, None));
        assert_eq!(chain.len(), Some(1));

        let (mut storage, mut chain) = chain2(Discipline::Deque);
        chain.try_insert(&mut storage, 1).unwrap();
        assert!(!chain.delete(&mut storage, None));
    }

    // Second helper name to dodge shadowing in the test above.
    fn chain2(discipline: Discipline) -> (Storage16, U64Chain) {
        chain(discipline)
    }

    #[test]
    fn delete_of_cursor_advances_it() {
        let (mut storage, mut chain) = chain(Discipline::Queue);

        for v in [1, 2, 3] {
            chain.try_insert(&mut storage, v).unwrap();
        }

        chain.find(&storage, &2).unwrap();
        assert!(chain.delete(&mut storage, Some(&2)));
        // Cursor moved to 2's former right neighbor
        let here = chain.cursor().unwrap();
        assert_eq!(chain.get(&storage, here), Some(&3));
    }

    #[test]
    fn delete_elsewhere_clears_cursor() {
        let (mut storage, mut chain) = chain(Discipline::Queue);

        for v in [1, 2, 3] {
            chain.try_insert(&mut storage, v).unwrap();
        }

        chain.find(&storage, &3).unwrap();
        assert!(chain.delete(&mut storage, Some(&1)));
        assert!(chain.cursor().is_none());
    }

    #[test]
    fn delete_of_tail_cursor_clears_it() {
        let (mut storage, mut chain) = chain(Discipline::Queue);

        chain.try_insert(&mut storage, 1).unwrap();
        chain.try_insert(&mut storage, 2).unwrap();

        chain.find(&storage, &2).unwrap();
        assert!(chain.delete(&mut storage, Some(&2)));
        assert!(chain.cursor().is_none());
    }

    #[test]
    fn first_last_next_prev_walk() {
        let (mut storage, mut chain) = chain(Discipline::List);

        for v in [1, 2, 3] {
            chain.try_append(&mut storage, v).unwrap();
        }

        assert_eq!(chain.first(&storage), Some(&1));
        assert_eq!(chain.next(&storage), Some(&2));
        assert_eq!(chain.next(&storage), Some(&3));
        assert!(chain.next(&storage).is_none());
        assert!(chain.cursor().is_none());

        assert_eq!(chain.last(&storage), Some(&3));
        assert_eq!(chain.prev(&storage), Some(&2));
        assert_eq!(chain.prev(&storage), Some(&1));
        assert!(chain.prev(&storage).is_none());
        assert!(chain.cursor().is_none());
        // Walking again requires repositioning
        assert!(chain.next(&storage).is_none());
    }

    #[test]
    fn clear_empties_everything() {
        let (mut storage, mut chain) = chain(Discipline::Stack);

        for v in [1, 2, 3] {
            chain.try_insert(&mut storage, v).unwrap();
        }
        chain.clear(&mut storage);

        assert!(chain.is_empty());
        assert_eq!(chain.len(), Some(0));
        assert!(chain.cursor().is_none());
        assert!(chain.first(&storage).is_none());
        assert_eq!(storage.len(), 0);

        // Clearing an empty chain is a no-op
        chain.clear(&mut storage);
        assert!(chain.is_empty());
    }

    #[test]
    fn untracked_len_stays_none() {
        let mut storage: Storage16 = BoxedChainStorage::with_capacity(16);
        let mut chain: U64Chain = Chain::untracked(Discipline::Queue, ByObject::new());

        assert_eq!(chain.len(), None);
        chain.try_insert(&mut storage, 1).unwrap();
        chain.try_insert(&mut storage, 2).unwrap();
        assert_eq!(chain.len(), None);
        chain.delete(&mut storage, None);
        assert_eq!(chain.len(), None);
        chain.clear(&mut storage);
        assert_eq!(chain.len(), None);
        assert!(chain.is_empty());
    }

    #[test]
    fn reachable_count_matches_len() {
        let (mut storage, mut chain) = chain(Discipline::List);

        for v in 0..10 {
            if v % 2 == 0 {
                chain.try_append(&mut storage, v).unwrap();
            } else {
                chain.try_insert(&mut storage, v).unwrap();
            }
        }
        chain.delete(&mut storage, Some(&4));
        chain.delete(&mut storage, Some(&7));

        let reachable = chain.iter(&storage).count();
        assert_eq!(Some(reachable), chain.len());

        // Backward walk sees the same nodes
        let backward = chain.iter(&storage).rev().count();
        assert_eq!(backward, reachable);
    }

    #[test]
    fn iter_is_double_ended() {
        let (mut storage, mut chain) = chain(Discipline::Queue);

        for v in [1, 2, 3, 4] {
            chain.try_insert(&mut storage, v).unwrap();
        }

        let forward: Vec<_> = chain.iter(&storage).copied().collect();
        assert_eq!(forward, vec![1, 2, 3, 4]);

        let backward: Vec<_> = chain.iter(&storage).rev().copied().collect();
        assert_eq!(backward, vec![4, 3, 2, 1]);

        let mut meet = chain.iter(&storage);
        assert_eq!(meet.next(), Some(&1));
        assert_eq!(meet.next_back(), Some(&4));
        assert_eq!(meet.next(), Some(&2));
        assert_eq!(meet.next_back(), Some(&3));
        assert!(meet.next().is_none());
        assert!(meet.next_back().is_none());
    }

    #[test]
    fn iter_mut_edits_every_object() {
        let (mut storage, mut chain) = chain(Discipline::Queue);

        for v in [1, 2, 3] {
            chain.try_insert(&mut storage, v).unwrap();
        }
        for object in chain.iter_mut(&mut storage) {
            *object *= 10;
        }
        assert_eq!(contents(&chain, &storage), vec![10, 20, 30]);
    }

    #[test]
    fn insert_into_full_storage_fails_cleanly() {
        let mut storage: Storage16 = BoxedChainStorage::with_capacity(2);
        let mut chain: U64Chain = Chain::new(Discipline::Queue, ByObject::new());

        chain.try_insert(&mut storage, 1).unwrap();
        chain.try_insert(&mut storage, 2).unwrap();

        assert_eq!(chain.try_insert(&mut storage, 3), Err(InsertError::Full));
        assert_eq!(chain.len(), Some(2));
        assert_eq!(contents(&chain, &storage), vec![1, 2]);
    }

    #[test]
    fn attach_full_returns_object() {
        let mut storage: Storage16 = BoxedChainStorage::with_capacity(1);
        let mut chain: U64Chain = Chain::new(Discipline::Stack, ByObject::new());

        chain.try_attach(&mut storage, 1).unwrap();
        let err = chain.try_attach(&mut storage, 2).unwrap_err();
        assert_eq!(err.into_inner(), 2);
    }

    // Descriptor with observable hooks, shared with the lifecycle tests.
    struct Hooked {
        made: Rc<Cell<usize>>,
        freed: Rc<Cell<usize>>,
        reject: bool,
    }

    impl Hooked {
        fn new() -> (Self, Rc<Cell<usize>>, Rc<Cell<usize>>) {
            let made = Rc::new(Cell::new(0));
            let freed = Rc::new(Cell::new(0));
            (
                Self {
                    made: made.clone(),
                    freed: freed.clone(),
                    reject: false,
                },
                made,
                freed,
            )
        }
    }

    impl Descriptor for Hooked {
        type Object = u64;
        type Key = u64;

        fn key<'a>(&self, object: &'a u64) -> &'a u64 {
            object
        }

        fn compare(&self, a: &u64, b: &u64) -> Ordering {
            a.cmp(b)
        }

        fn make(&mut self, object: u64) -> Option<u64> {
            if self.reject {
                return None;
            }
            self.made.set(self.made.get() + 1);
            Some(object + 100)
        }

        fn free(&mut self, object: u64) {
            self.freed.set(self.freed.get() + 1);
            drop(object);
        }
    }

    #[test]
    fn make_hook_transforms_stored_object() {
        let mut storage: Storage16 = BoxedChainStorage::with_capacity(8);
        let (desc, made, _freed) = Hooked::new();
        let mut chain: BoxedChain<u64, Hooked> = Chain::new(Discipline::Queue, desc);

        chain.try_insert(&mut storage, 1).unwrap();
        assert_eq!(made.get(), 1);
        assert_eq!(chain.find(&storage, &101), Some(&101));
    }

    #[test]
    fn make_hook_rejection_leaves_chain_untouched() {
        let mut storage: Storage16 = BoxedChainStorage::with_capacity(8);
        let (mut desc, _made, freed) = Hooked::new();
        desc.reject = true;
        let mut chain: BoxedChain<u64, Hooked> = Chain::new(Discipline::Queue, desc);

        assert_eq!(chain.try_insert(&mut storage, 1), Err(InsertError::Rejected));
        assert!(chain.is_empty());
        assert_eq!(freed.get(), 0);
    }

    #[test]
    fn full_storage_frees_constructed_object() {
        let mut storage: Storage16 = BoxedChainStorage::with_capacity(1);
        let (desc, made, freed) = Hooked::new();
        let mut chain: BoxedChain<u64, Hooked> = Chain::new(Discipline::Queue, desc);

        chain.try_insert(&mut storage, 1).unwrap();
        assert_eq!(chain.try_insert(&mut storage, 2), Err(InsertError::Full));
        assert_eq!(made.get(), 2);
        assert_eq!(freed.get(), 1);
        assert_eq!(chain.len(), Some(1));
    }

    #[test]
    fn delete_frees_detach_does_not() {
        let mut storage: Storage16 = BoxedChainStorage::with_capacity(8);
        let (desc, _made, freed) = Hooked::new();
        let mut chain: BoxedChain<u64, Hooked> = Chain::new(Discipline::Queue, desc);

        chain.try_insert(&mut storage, 1).unwrap();
        chain.try_insert(&mut storage, 2).unwrap();

        assert!(chain.delete(&mut storage, Some(&101)));
        assert_eq!(freed.get(), 1);

        assert_eq!(chain.detach(&mut storage, Some(&102)), Some(102));
        assert_eq!(freed.get(), 1);
    }

    #[test]
    fn attach_skips_make_hook() {
        let mut storage: Storage16 = BoxedChainStorage::with_capacity(8);
        let (desc, made, _freed) = Hooked::new();
        let mut chain: BoxedChain<u64, Hooked> = Chain::new(Discipline::Queue, desc);

        chain.try_attach(&mut storage, 1).unwrap();
        assert_eq!(made.get(), 0);
        assert_eq!(chain.find(&storage, &1), Some(&1));
    }

    #[test]
    fn clear_frees_each_object_once() {
        let mut storage: Storage16 = BoxedChainStorage::with_capacity(8);
        let (desc, _made, freed) = Hooked::new();
        let mut chain: BoxedChain<u64, Hooked> = Chain::new(Discipline::Stack, desc);

        for v in [1, 2, 3] {
            chain.try_insert(&mut storage, v).unwrap();
        }
        chain.clear(&mut storage);
        assert_eq!(freed.get(), 3);
        assert!(chain.is_empty());
    }

    #[test]
    fn insert_error_displays() {
        assert_eq!(InsertError::Full.to_string(), "storage is full");
        assert_eq!(
            InsertError::Rejected.to_string(),
            "make hook rejected the object"
        );
    }
}
