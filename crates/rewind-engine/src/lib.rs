//! # rewind-engine
//!
//! Undo/redo history for observable state containers.
//!
//! This crate provides:
//! - [`Container`]: the get/set/subscribe contract a state holder implements
//! - [`Store`]: a ready-made thread-safe container
//! - [`attach`]: binds snapshot history to a container and returns a
//!   [`HistoryHandle`] exposing `undo`/`redo`
//!
//! The engine records every organic change to the container as a full
//! snapshot. Changes the engine causes itself while replaying history are
//! recognised and never recorded.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rewind_engine::{attach_json, Container, HistoryConfig, Store};
//!
//! let store = Arc::new(Store::new("cart", vec!["X".to_string()]));
//! let history = attach_json(store.clone(), HistoryConfig::default()).unwrap();
//!
//! store.patch(|items| items.push("Y".to_string())).unwrap();
//! assert_eq!(history.past_len(), 2);
//!
//! history.undo().unwrap();
//! assert_eq!(store.get_state(), vec!["X".to_string()]);
//! assert_eq!(history.past_len(), 1);
//! ```
//!
//! ## Architecture
//!
//! - [`container`] - Container adapter contract
//! - [`store`] - Reference container implementation
//! - [`engine`] - History engine and handles
//! - [`latch`] - Scoped re-entrancy latch
//! - [`config`] - Attach configuration
//! - [`error`] - Error types

pub mod config;
pub mod container;
pub mod engine;
pub mod error;
pub mod latch;
pub mod store;

pub use config::{HistoryConfig, HistoryConfigBuilder};
pub use container::{Container, Listener, SubscriptionId};
pub use engine::{attach, attach_json, HistoryEvent, HistoryHandle};
pub use error::{ContainerError, HistoryError, ListenerError, Result};
pub use latch::ReplayLatch;
pub use store::Store;

// Re-export the data layer for convenience
pub use rewind_core::{CodecError, HistoryStore, JsonCodec, Snapshot, SnapshotCodec};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::HistoryConfig;
    pub use crate::container::Container;
    pub use crate::engine::{attach, attach_json, HistoryHandle};
    pub use crate::error::HistoryError;
    pub use crate::store::Store;
    pub use rewind_core::{JsonCodec, SnapshotCodec};
}
