//! Access disciplines: the placement policy fixed at construction.

/// The access policy of a chain, fixed at construction.
///
/// All four disciplines share one node representation, one search, and one
/// cursor model; the discipline only decides where inserts land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discipline {
    /// Positional list: inserts land relative to the cursor when it is
    /// set, falling back to the head (front inserts) or tail (back
    /// inserts) at the boundaries.
    List,
    /// Double-ended queue: the caller picks head or tail per insert.
    Deque,
    /// LIFO stack: every insert becomes the new head.
    Stack,
    /// FIFO queue: every insert becomes the new tail.
    Queue,
}

impl Discipline {
    /// Returns `true` for the disciplines with caller-controlled placement
    /// (`List`, `Deque`).
    ///
    /// These have no implicit pop target, so `delete`/`detach` without a
    /// key is a no-op for them.
    #[inline]
    pub const fn is_positional(self) -> bool {
        matches!(self, Discipline::List | Discipline::Deque)
    }
}
