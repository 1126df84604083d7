//! An ordered map built on a red-black tree.
//!
//! This crate provides [`RbTreeMap`], a sorted key-value container whose order is defined by
//! a [`Comparator`] chosen at construction. Insertion, lookup and removal are O(log n); the
//! tree's height never exceeds 2·log<sub>2</sub>(n + 1). Entries can be visited in ascending
//! key order through iterators, a callback walk that can stop early
//! ([`RbTreeMap::for_each_until`]), or a step-by-step [`Cursor`].
//!
//! # Example
//!
//! ```
//! use core::ops::ControlFlow;
//! use wlf_map::RbTreeMap;
//!
//! let mut scores = RbTreeMap::new();
//! scores.insert("Carol", 92);
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//!
//! // Inserting an existing key overwrites its value.
//! assert_eq!(scores.insert("Bob", 88), Some(85));
//! assert_eq!(scores.len(), 3);
//!
//! // Entries come out sorted by key.
//! let names: Vec<_> = scores.keys().copied().collect();
//! assert_eq!(names, ["Alice", "Bob", "Carol"]);
//!
//! // Stop walking as soon as a score below 90 turns up.
//! let low = scores.for_each_until(|name, &score| {
//!     if score < 90 { ControlFlow::Break(*name) } else { ControlFlow::Continue(()) }
//! });
//! assert_eq!(low, ControlFlow::Break("Bob"));
//!
//! // A cursor reads the current entry separately from advancing.
//! let mut cursor = scores.cursor();
//! assert_eq!(cursor.entry(), Some((&"Alice", &100)));
//! cursor.move_next();
//! assert_eq!(cursor.key(), Some(&"Bob"));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Custom ordering** - Any `Fn(&K, &K) -> Ordering` closure works as a comparator
//! - **Fallible insertion** - [`RbTreeMap::try_insert`] reports allocation failure and hands
//!   the entry back instead of aborting
//! - **No unsafe code** - Nodes live in an index-addressed arena
//!
//! # Implementation
//!
//! Nodes carry parent links and a color, and sit in an arena addressed by 32-bit handles.
//! Values are kept in a second arena so they can be borrowed mutably while the node arena is
//! walked. Removal relinks the in-order successor into place rather than moving entries, so
//! every other entry keeps its slot.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod comparator;
mod error;
mod raw;

pub mod rb_tree_map;

pub use comparator::{Comparator, Natural, Reversed};
pub use error::{Error, InsertError};
pub use rb_tree_map::{Cursor, RbTreeMap};
