//! Descriptors: key extraction, comparison, and lifecycle hooks.
//!
//! A descriptor is the per-container configuration supplied at
//! construction. It tells the chain how to pull a comparison key out of an
//! object, how to compare two keys, and what to do when objects enter
//! (`make`) or leave (`free`) the container. The hooks default to
//! pass-through and drop, so most descriptors only define the key mapping.

use std::cmp::Ordering;
use std::marker::PhantomData;

/// Per-container configuration: key extraction, comparator, and lifecycle
/// hooks.
///
/// # Example
///
/// A descriptor keying orders by id, with a free hook that records
/// releases:
///
/// ```
/// use chainlist::Descriptor;
/// use std::cmp::Ordering;
///
/// struct Order { id: u64, qty: u64 }
///
/// #[derive(Default)]
/// struct ById { released: usize }
///
/// impl Descriptor for ById {
///     type Object = Order;
///     type Key = u64;
///
///     fn key<'a>(&self, object: &'a Order) -> &'a u64 { &object.id }
///     fn compare(&self, a: &u64, b: &u64) -> Ordering { a.cmp(b) }
///     fn free(&mut self, object: Order) {
///         self.released += 1;
///         drop(object);
///     }
/// }
/// ```
pub trait Descriptor {
    /// The object type stored in the container.
    type Object;

    /// The key type searches compare against.
    type Key: ?Sized;

    /// Extracts the comparison key from an object.
    fn key<'a>(&self, object: &'a Self::Object) -> &'a Self::Key;

    /// Compares two keys.
    ///
    /// Linear search only consults equality, but the full ordering keeps
    /// descriptors reusable by key-ordered containers.
    fn compare(&self, a: &Self::Key, b: &Self::Key) -> Ordering;

    /// Construct hook, invoked on `try_insert`/`try_append` before the
    /// object is stored. The returned object is what gets stored;
    /// returning `None` fails the insert without mutating the container.
    ///
    /// Defaults to passing the object through.
    fn make(&mut self, object: Self::Object) -> Option<Self::Object> {
        Some(object)
    }

    /// Destroy hook, invoked on `delete`/`clear` (and on insert cleanup
    /// after a failed allocation) with the object leaving the container.
    ///
    /// Defaults to dropping the object.
    fn free(&mut self, object: Self::Object) {
        drop(object);
    }
}

/// Descriptor treating the whole object as its own key, compared by [`Ord`].
///
/// The default choice when objects are their own identity, e.g. chains of
/// plain integers or strings.
///
/// # Example
///
/// ```
/// use chainlist::{ByObject, Descriptor};
/// use std::cmp::Ordering;
///
/// let desc: ByObject<u64> = ByObject::new();
/// assert_eq!(desc.key(&7), &7);
/// assert_eq!(desc.compare(&1, &2), Ordering::Less);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ByObject<T>(PhantomData<T>);

impl<T> ByObject<T> {
    /// Creates the descriptor.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: Ord> Descriptor for ByObject<T> {
    type Object = T;
    type Key = T;

    #[inline]
    fn key<'a>(&self, object: &'a T) -> &'a T {
        object
    }

    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}
