//! Sentinel-based index trait for links between chain nodes.
//!
//! Links are plain index values into storage. A reserved sentinel (`NONE`)
//! stands in for "no neighbor", which keeps a node at two words instead of
//! the larger `Option<Idx>` representation.

/// A copyable index type with a reserved sentinel meaning "no index".
///
/// Implemented for the unsigned integer types, with `MAX` as the sentinel.
/// Custom index types (e.g. strongly-typed handles) can implement it too.
///
/// # Example
///
/// ```
/// use chainlist::Index;
///
/// let idx: u32 = 7;
/// assert!(idx.is_some());
/// assert!(u32::NONE.is_none());
/// ```
pub trait Index: Copy + Eq {
    /// Sentinel value representing "no index".
    ///
    /// Never a valid storage slot; used for empty links and the absent
    /// cursor.
    const NONE: Self;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns `true` if this is not the sentinel value.
    #[inline]
    fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Returns the index as a `usize`, for slot addressing.
    fn as_usize(self) -> usize;

    /// Creates an index from a `usize` slot number.
    fn from_usize(val: usize) -> Self;
}

macro_rules! sentinel_index {
    ($($ty:ty),*) => {
        $(
            impl Index for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn as_usize(self) -> usize {
                    self as usize
                }

                #[inline]
                fn from_usize(val: usize) -> Self {
                    val as Self
                }
            }
        )*
    };
}

sentinel_index!(u8, u16, u32, u64, usize);
