//! History engine - binds a [`HistoryStore`] to one container.
//!
//! The engine subscribes to the container's change notifications and sorts
//! them into two kinds:
//! - **organic** mutations, made by application code, which are encoded and
//!   recorded as new history;
//! - **replays**, caused by the engine writing a historical snapshot back
//!   through `set_state`, which are ignored while the replay latch is held.
//!
//! `undo`/`redo` peek the target snapshot, write it, and only then move it
//! between the past and future stacks. A rejected write leaves both the
//! stacks and the container as they were.
//!
//! Every engine operation runs inside [`Container::exclusive`], and the
//! stacks lock is never held across a container write, so the lock order is
//! always container region first, stacks second.

use crate::config::HistoryConfig;
use crate::container::{Container, Listener, SubscriptionId};
use crate::error::{HistoryError, ListenerError, Result};
use crate::latch::ReplayLatch;
use parking_lot::Mutex;
use rewind_core::{HistoryStore, JsonCodec, Snapshot, SnapshotCodec};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

/// Events emitted by a history handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryEvent {
    /// An organic mutation was recorded.
    Recorded { past_len: usize },
    /// A notification caused by the engine's own replay was skipped.
    Ignored,
    /// A snapshot was restored by `undo`.
    Undone { past_len: usize, future_len: usize },
    /// A snapshot was restored by `redo`.
    Redone { past_len: usize, future_len: usize },
    /// History was reseeded from the current state.
    Reset,
    /// An undo or redo failed.
    ReplayFailed { error: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Back,
    Forward,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Back => "undo",
            Direction::Forward => "redo",
        }
    }
}

/// State shared between a handle and its change listener.
struct Inner<K> {
    label: String,
    codec: K,
    /// `None` when history is disabled for the container.
    history: Option<Mutex<HistoryStore>>,
    applying: AtomicBool,
    event_tx: broadcast::Sender<HistoryEvent>,
}

impl<K> Inner<K> {
    fn emit(&self, event: HistoryEvent) {
        let _ = self.event_tx.send(event);
    }

    fn listener<T>(inner: &Arc<Self>) -> Listener<T>
    where
        K: SnapshotCodec<T> + 'static,
        T: 'static,
    {
        let weak: Weak<Self> = Arc::downgrade(inner);
        Arc::new(move |state: &T| -> std::result::Result<(), ListenerError> {
            match weak.upgrade() {
                Some(inner) => inner.observe(state).map_err(ListenerError::new),
                None => Ok(()),
            }
        })
    }

    /// Handle one change notification from the container.
    fn observe<T>(&self, state: &T) -> Result<()>
    where
        K: SnapshotCodec<T>,
    {
        if ReplayLatch::is_held(&self.applying) {
            trace!(store = %self.label, "ignoring notification caused by replay");
            self.emit(HistoryEvent::Ignored);
            return Ok(());
        }

        let Some(history) = &self.history else {
            return Ok(());
        };

        let snapshot = self.codec.encode(state).map_err(|e| {
            warn!(store = %self.label, error = %e, "could not snapshot organic mutation");
            e
        })?;

        let past_len = {
            let mut history = history.lock();
            history.record_organic(snapshot);
            history.past_len()
        };

        debug!(store = %self.label, past_len, "recorded organic mutation");
        self.emit(HistoryEvent::Recorded { past_len });
        Ok(())
    }
}

/// Undo/redo access to one attached container.
///
/// Dropping the handle unsubscribes from the container and discards the
/// recorded history.
pub struct HistoryHandle<C: Container, K> {
    container: Arc<C>,
    inner: Arc<Inner<K>>,
    subscription: Option<SubscriptionId>,
}

/// Attach history to a container.
///
/// Seeds the past stack with the container's current state and subscribes
/// to its changes. With `config.enabled == false` the returned handle
/// records nothing and its `undo`/`redo` are no-ops.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use rewind_core::JsonCodec;
/// use rewind_engine::{attach, Container, HistoryConfig, Store};
///
/// let store = Arc::new(Store::new("cart", Vec::<String>::new()));
/// let history = attach(store.clone(), JsonCodec::new(), HistoryConfig::default()).unwrap();
///
/// store.patch(|items| items.push("Pineapple Gum".to_string())).unwrap();
/// history.undo().unwrap();
/// assert!(store.get_state().is_empty());
///
/// history.redo().unwrap();
/// assert_eq!(store.get_state().len(), 1);
/// ```
pub fn attach<C, K>(
    container: Arc<C>,
    codec: K,
    config: HistoryConfig,
) -> Result<HistoryHandle<C, K>>
where
    C: Container,
    K: SnapshotCodec<C::State> + 'static,
{
    let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));

    if !config.enabled {
        debug!(store = %config.label, "history disabled");
        let inner = Arc::new(Inner {
            label: config.label,
            codec,
            history: None,
            applying: AtomicBool::new(false),
            event_tx,
        });
        return Ok(HistoryHandle {
            container,
            inner,
            subscription: None,
        });
    }

    let target = Arc::clone(&container);
    container.exclusive(move || -> Result<HistoryHandle<C, K>> {
        let initial = codec.encode(&target.get_state())?;
        let mut history = HistoryStore::seed(initial);
        history.set_max_history(config.max_history);

        let inner = Arc::new(Inner {
            label: config.label,
            codec,
            history: Some(Mutex::new(history)),
            applying: AtomicBool::new(false),
            event_tx,
        });

        let subscription = target.on_change(Inner::listener(&inner));
        debug!(store = %inner.label, codec = inner.codec.name(), "history attached");

        Ok(HistoryHandle {
            container: target,
            inner,
            subscription: Some(subscription),
        })
    })
}

/// Attach history using the default [`JsonCodec`].
pub fn attach_json<C>(
    container: Arc<C>,
    config: HistoryConfig,
) -> Result<HistoryHandle<C, JsonCodec>>
where
    C: Container,
    C::State: Serialize + DeserializeOwned,
{
    attach(container, JsonCodec::new(), config)
}

impl<C, K> HistoryHandle<C, K>
where
    C: Container,
    K: SnapshotCodec<C::State> + 'static,
{
    /// Restore the previous recorded state.
    ///
    /// Returns `Ok(false)` when there is nothing to undo, when history is
    /// disabled, or when called while a replay is already being applied.
    pub fn undo(&self) -> Result<bool> {
        self.replay(Direction::Back)
    }

    /// Re-apply the most recently undone state.
    ///
    /// Returns `Ok(false)` under the same conditions as [`undo`](Self::undo).
    pub fn redo(&self) -> Result<bool> {
        self.replay(Direction::Forward)
    }

    /// Discard all history and reseed it from the container's current state.
    pub fn reset(&self) -> Result<()> {
        let Some(history) = &self.inner.history else {
            return Ok(());
        };

        self.container.exclusive(|| -> Result<()> {
            let snapshot = self.inner.codec.encode(&self.container.get_state())?;
            history.lock().reseed(snapshot);
            debug!(store = %self.inner.label, "history reset");
            self.inner.emit(HistoryEvent::Reset);
            Ok(())
        })
    }

    fn replay(&self, direction: Direction) -> Result<bool> {
        let Some(history) = &self.inner.history else {
            return Ok(false);
        };

        self.container.exclusive(|| -> Result<bool> {
            let Some(latch) = ReplayLatch::acquire(&self.inner.applying) else {
                trace!(
                    store = %self.inner.label,
                    op = direction.as_str(),
                    "replay already in progress"
                );
                return Ok(false);
            };

            let target = {
                let history = history.lock();
                match direction {
                    Direction::Back => history.peek_back().cloned(),
                    Direction::Forward => history.peek_forward().cloned(),
                }
            };
            let Some(snapshot) = target else {
                trace!(store = %self.inner.label, op = direction.as_str(), "nothing to replay");
                return Ok(false);
            };

            let result = self
                .inner
                .codec
                .decode(&snapshot)
                .map_err(HistoryError::from)
                .and_then(|state| self.container.set_state(state).map_err(HistoryError::from));
            drop(latch);

            let replaced = match &result {
                Ok(()) => true,
                Err(e) => e.state_replaced(),
            };

            if replaced {
                let (past_len, future_len) = {
                    let mut history = history.lock();
                    match direction {
                        Direction::Back => history.step_back(),
                        Direction::Forward => history.step_forward(),
                    };
                    (history.past_len(), history.future_len())
                };

                debug!(
                    store = %self.inner.label,
                    op = direction.as_str(),
                    past_len,
                    future_len,
                    "replayed snapshot"
                );
                self.inner.emit(match direction {
                    Direction::Back => HistoryEvent::Undone { past_len, future_len },
                    Direction::Forward => HistoryEvent::Redone { past_len, future_len },
                });
            }

            if let Err(e) = &result {
                warn!(
                    store = %self.inner.label,
                    op = direction.as_str(),
                    error = %e,
                    "replay failed"
                );
                self.inner.emit(HistoryEvent::ReplayFailed {
                    error: e.to_string(),
                });
            }

            result.map(|()| true)
        })
    }
}

impl<C, K> HistoryHandle<C, K>
where
    C: Container,
{
    pub fn can_undo(&self) -> bool {
        self.inner
            .history
            .as_ref()
            .map(|h| h.lock().can_undo())
            .unwrap_or(false)
    }

    pub fn can_redo(&self) -> bool {
        self.inner
            .history
            .as_ref()
            .map(|h| h.lock().can_redo())
            .unwrap_or(false)
    }

    /// Length of the past stack (0 when history is disabled).
    pub fn past_len(&self) -> usize {
        self.inner
            .history
            .as_ref()
            .map(|h| h.lock().past_len())
            .unwrap_or(0)
    }

    /// Length of the future stack.
    pub fn future_len(&self) -> usize {
        self.inner
            .history
            .as_ref()
            .map(|h| h.lock().future_len())
            .unwrap_or(0)
    }

    /// The snapshot of the current recorded state (top of the past stack).
    pub fn current(&self) -> Option<Snapshot> {
        self.inner
            .history
            .as_ref()
            .map(|h| h.lock().current().clone())
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.history.is_some()
    }

    /// Whether a replay is currently being written to the container.
    pub fn is_applying(&self) -> bool {
        ReplayLatch::is_held(&self.inner.applying)
    }

    /// Get the label used in log output.
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Get the attached container.
    pub fn container(&self) -> &Arc<C> {
        &self.container
    }

    /// Subscribe to history events.
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEvent> {
        self.inner.event_tx.subscribe()
    }
}

impl<C: Container, K> Drop for HistoryHandle<C, K> {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.container.unsubscribe(id);
            trace!(store = %self.inner.label, "history detached");
        }
    }
}

impl<C: Container, K> fmt::Debug for HistoryHandle<C, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryHandle")
            .field("label", &self.inner.label)
            .field("enabled", &self.is_enabled())
            .field("past_len", &self.past_len())
            .field("future_len", &self.future_len())
            .finish()
    }
}
