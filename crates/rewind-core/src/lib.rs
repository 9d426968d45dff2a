//! # rewind-core
//!
//! Data layer for the Rewind undo/redo engine.
//!
//! This crate provides:
//! - [`Snapshot`]: an opaque, comparable serialized copy of a state value
//! - [`SnapshotCodec`]: the pluggable encode/decode contract, with a JSON
//!   implementation in [`JsonCodec`]
//! - [`HistoryStore`]: the past/future snapshot stacks
//!
//! Nothing here observes containers or performs I/O; see `rewind-engine`
//! for the part that binds a store to live state.
//!
//! ## Example
//!
//! ```rust
//! use rewind_core::{HistoryStore, JsonCodec, SnapshotCodec};
//!
//! let codec = JsonCodec::new();
//! let mut history = HistoryStore::seed(codec.encode(&vec![1]).unwrap());
//!
//! history.record_organic(codec.encode(&vec![1, 2]).unwrap());
//!
//! let previous = history.step_back().unwrap();
//! let restored: Vec<i32> = codec.decode(previous).unwrap();
//! assert_eq!(restored, vec![1]);
//! ```

pub mod codec;
pub mod error;
pub mod history;

pub use codec::{JsonCodec, Snapshot, SnapshotCodec};
pub use error::{CodecError, Result};
pub use history::HistoryStore;
