//! Discipline-parameterized linked containers over slab-style storage.
//!
//! One container type, [`Chain`], serves as an ordered list, a deque, a
//! LIFO stack, or a FIFO queue: the [`Discipline`] chosen at construction
//! decides where inserts land, while search, removal, traversal, and the
//! cursor behave identically across all four. A [`Descriptor`] supplies key
//! extraction, comparison, and optional make/free lifecycle hooks.
//!
//! # Philosophy
//!
//! - **External storage**: a chain holds indices, not allocations. Nodes
//!   live in a [`Storage`] backend with stable indices, so pools can be
//!   pre-allocated, shared, and backed by a fixed-size array or a growable
//!   slab.
//! - **Index-based links**: prev/next are plain integers with a sentinel
//!   for "none". Compact nodes, no pointer aliasing, `u16` indices when a
//!   million entries is overkill.
//! - **One model, four disciplines**: stack and queue are not separate
//!   types but placement policies of the same structure, so they share the
//!   search, the cursor, and the hooks for free.
//!
//! # Quick Start
//!
//! ```
//! use chainlist::{ByObject, Discipline, OwnedChain};
//!
//! let mut queue: OwnedChain<u64, ByObject<u64>> =
//!     OwnedChain::with_capacity(Discipline::Queue, ByObject::new(), 128);
//!
//! queue.try_insert(1).unwrap();
//! queue.try_insert(2).unwrap();
//! queue.try_insert(3).unwrap();
//!
//! // FIFO: the head is the oldest insert
//! assert_eq!(queue.front(), Some(&1));
//! assert_eq!(queue.detach(None), Some(1));
//!
//! // The one linear search all disciplines share
//! assert_eq!(queue.find(&3), Some(&3));
//! assert!(queue.found());
//! ```
//!
//! # Disciplines
//!
//! | Discipline | `try_insert` | `try_append` | pop (`delete(None)`) |
//! |------------|--------------|--------------|----------------------|
//! | `Stack`    | new head     | new head     | head                 |
//! | `Queue`    | new tail     | new tail     | head                 |
//! | `Deque`    | new head     | new tail     | —                    |
//! | `List`     | before cursor| after cursor | —                    |
//!
//! `List` falls back to the head/tail when the cursor is absent or already
//! at the relevant boundary.
//!
//! # Boxed vs. Embedded Nodes
//!
//! Two ownership strategies, picked by the node type parameter:
//!
//! - **Boxed** ([`Holder`]): the storage slot wraps your object together
//!   with its links. Zero requirements on the object type; this is what
//!   [`BoxedChain`] and [`OwnedChain`] use.
//! - **Embedded**: your type carries its own link fields and implements
//!   [`Node`] with `Object = Self`. One slot per entry with no wrapper,
//!   for nodes that are threaded through hot paths.
//!
//! # Feature Flags
//!
//! - `slab`: implements [`Storage`] for `slab::Slab`, giving chains a
//!   growable backend whose inserts never fail.

#![warn(missing_docs)]

mod chain;
mod descriptor;
mod discipline;
mod index;
mod linked;
mod owned;
mod storage;

pub use chain::{BoxedChain, BoxedChainStorage, Chain, InsertError, Iter, IterMut};
pub use descriptor::{ByObject, Descriptor};
pub use discipline::Discipline;
pub use index::Index;
pub use linked::{Holder, Linked, Node};
pub use owned::OwnedChain;
pub use storage::{BoxedStorage, Full, Storage};
