//! Link-field access and the two node ownership strategies.
//!
//! A chain node is two things at once: a pair of prev/next links threading
//! it into the chain, and the user-visible object it carries. [`Linked`]
//! covers the links, [`Node`] adds the object mapping, and the two
//! strategies for where the links live are two implementations of [`Node`]:
//!
//! - **Boxed**: [`Holder`] wraps the object together with its links. The
//!   chain's storage owns the holder; the object type needs nothing special.
//! - **Embedded**: the object type carries its own link fields and
//!   implements [`Node`] with `Object = Self`. No per-entry wrapper.
//!
//! The strategy is picked by the node type parameter at construction, so a
//! given chain only ever runs one of the two code paths.

use crate::Index;

/// Trait for types carrying prev/next link fields.
///
/// # Example
///
/// ```
/// use chainlist::{Index, Linked};
///
/// struct Order {
///     id: u64,
///     qty: u64,
///     next: u32,
///     prev: u32,
/// }
///
/// impl Linked<u32> for Order {
///     fn next(&self) -> u32 { self.next }
///     fn prev(&self) -> u32 { self.prev }
///     fn set_next(&mut self, idx: u32) { self.next = idx; }
///     fn set_prev(&mut self, idx: u32) { self.prev = idx; }
/// }
/// ```
pub trait Linked<Idx: Index> {
    /// Returns the next node's index, or `Idx::NONE` at the tail.
    fn next(&self) -> Idx;

    /// Returns the previous node's index, or `Idx::NONE` at the head.
    fn prev(&self) -> Idx;

    /// Sets the next node's index.
    fn set_next(&mut self, idx: Idx);

    /// Sets the previous node's index.
    fn set_prev(&mut self, idx: Idx);
}

/// A chain node: link fields plus the object they carry.
///
/// For the boxed strategy this is [`Holder`]. For the embedded strategy the
/// user type implements this with `Object = Self` and identity conversions:
///
/// ```
/// use chainlist::{Index, Linked, Node};
///
/// struct Task {
///     id: u64,
///     next: u32,
///     prev: u32,
/// }
///
/// impl Linked<u32> for Task {
///     fn next(&self) -> u32 { self.next }
///     fn prev(&self) -> u32 { self.prev }
///     fn set_next(&mut self, idx: u32) { self.next = idx; }
///     fn set_prev(&mut self, idx: u32) { self.prev = idx; }
/// }
///
/// impl Node<u32> for Task {
///     type Object = Task;
///     fn from_object(object: Task) -> Task { object }
///     fn object(&self) -> &Task { self }
///     fn object_mut(&mut self) -> &mut Task { self }
///     fn into_object(self) -> Task { self }
/// }
/// ```
pub trait Node<Idx: Index>: Linked<Idx> + Sized {
    /// The user-visible object carried by this node.
    type Object;

    /// Wraps an object into an unlinked node.
    fn from_object(object: Self::Object) -> Self;

    /// Returns a reference to the carried object.
    fn object(&self) -> &Self::Object;

    /// Returns a mutable reference to the carried object.
    fn object_mut(&mut self) -> &mut Self::Object;

    /// Unwraps the node, yielding the carried object.
    fn into_object(self) -> Self::Object;
}

/// Boxed-strategy node: the object plus its links, allocated as one
/// storage slot.
///
/// The chain's storage owns the holder exclusively; it is freed whenever
/// the entry leaves the chain. The carried object passes through untouched.
#[derive(Debug)]
pub struct Holder<T, Idx: Index = u32> {
    object: T,
    prev: Idx,
    next: Idx,
}

impl<T, Idx: Index> Linked<Idx> for Holder<T, Idx> {
    #[inline]
    fn next(&self) -> Idx {
        self.next
    }

    #[inline]
    fn prev(&self) -> Idx {
        self.prev
    }

    #[inline]
    fn set_next(&mut self, idx: Idx) {
        self.next = idx;
    }

    #[inline]
    fn set_prev(&mut self, idx: Idx) {
        self.prev = idx;
    }
}

impl<T, Idx: Index> Node<Idx> for Holder<T, Idx> {
    type Object = T;

    #[inline]
    fn from_object(object: T) -> Self {
        Self {
            object,
            prev: Idx::NONE,
            next: Idx::NONE,
        }
    }

    #[inline]
    fn object(&self) -> &T {
        &self.object
    }

    #[inline]
    fn object_mut(&mut self) -> &mut T {
        &mut self.object
    }

    #[inline]
    fn into_object(self) -> T {
        self.object
    }
}
