//! Reference container: a named, observable state store.
//!
//! `Store` keeps one state value behind a lock, replaces it wholesale on
//! `set_state`, and notifies listeners synchronously. All writes run inside
//! a re-entrant write region, so a write and its notifications finish before
//! the next writer (from any thread) gets in.
//!
//! A listener may read the store but not write it: `set_state` called while
//! the store is notifying is rejected, so notification rounds never overlap
//! and every listener sees states in the order they were written.

use crate::container::{Container, Listener, SubscriptionId};
use crate::error::ContainerError;
use parking_lot::{ReentrantMutex, RwLock};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

type Validator<T> = Box<dyn Fn(&T) -> Result<(), String> + Send + Sync>;

/// Marks one notification round in progress; unmarked on drop, even if a
/// listener panics.
struct NotifyRound<'a> {
    depth: &'a AtomicUsize,
}

impl<'a> NotifyRound<'a> {
    fn enter(depth: &'a AtomicUsize) -> Self {
        depth.fetch_add(1, Ordering::AcqRel);
        Self { depth }
    }
}

impl Drop for NotifyRound<'_> {
    fn drop(&mut self) {
        self.depth.fetch_sub(1, Ordering::AcqRel);
    }
}

/// An observable state store.
///
/// # Example
///
/// ```rust
/// use rewind_engine::{Container, Store};
///
/// let store = Store::new("counter", 0u32);
/// store.patch(|n| *n += 1).unwrap();
/// assert_eq!(store.get_state(), 1);
/// ```
pub struct Store<T> {
    name: String,
    state: RwLock<T>,
    writer: ReentrantMutex<()>,
    /// Notification rounds in progress; only touched under `writer`.
    notifying: AtomicUsize,
    listeners: RwLock<Vec<(SubscriptionId, Listener<T>)>>,
    next_id: AtomicU64,
    validator: Option<Validator<T>>,
}

impl<T> Store<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new store.
    pub fn new(name: impl Into<String>, initial: T) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(initial),
            writer: ReentrantMutex::new(()),
            notifying: AtomicUsize::new(0),
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            validator: None,
        }
    }

    /// Create a store that rejects values failing `validator`.
    pub fn with_validator(
        name: impl Into<String>,
        initial: T,
        validator: impl Fn(&T) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        let mut store = Self::new(name, initial);
        store.validator = Some(Box::new(validator));
        store
    }

    /// Get the store name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.state.read())
    }

    /// Mutate a copy of the state and write it back as one replacement.
    pub fn patch(&self, f: impl FnOnce(&mut T)) -> Result<(), ContainerError> {
        self.exclusive(|| {
            let mut next = self.state.read().clone();
            f(&mut next);
            self.set_state(next)
        })
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Whether listeners are being notified right now.
    pub fn is_notifying(&self) -> bool {
        self.notifying.load(Ordering::Acquire) > 0
    }

    fn notify(&self, state: &T) -> Result<(), ContainerError> {
        let listeners: Vec<Listener<T>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        let _round = NotifyRound::enter(&self.notifying);
        let mut first_error = None;
        for listener in listeners {
            if let Err(e) = listener(state) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(ContainerError::Listener(e)),
            None => Ok(()),
        }
    }
}

impl<T> Container for Store<T>
where
    T: Clone + Send + Sync + 'static,
{
    type State = T;

    fn get_state(&self) -> T {
        self.state.read().clone()
    }

    fn set_state(&self, state: T) -> Result<(), ContainerError> {
        let _write = self.writer.lock();

        if self.is_notifying() {
            return Err(ContainerError::Rejected(format!(
                "{}: write from a listener while notifying",
                self.name
            )));
        }

        if let Some(validator) = &self.validator {
            validator(&state).map_err(ContainerError::Rejected)?;
        }

        // Listeners get their own copy so none of them runs under the state lock.
        let notified = state.clone();
        *self.state.write() = state;

        self.notify(&notified)
    }

    fn on_change(&self, listener: Listener<T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn exclusive<R>(&self, f: impl FnOnce() -> R) -> R {
        let _write = self.writer.lock();
        f()
    }
}
