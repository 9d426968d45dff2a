//! Container adapter contract.
//!
//! A container is any state holder that can report its full current value,
//! accept a full replacement, and notify subscribers after every
//! replacement. The history engine only talks to state through this trait.

use crate::error::{ContainerError, ListenerError};
use std::sync::Arc;

/// Handle identifying one registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Callback invoked with the new state after each replacement.
pub type Listener<T> = Arc<dyn Fn(&T) -> Result<(), ListenerError> + Send + Sync>;

/// An observable state holder.
pub trait Container: Send + Sync + 'static {
    /// The full state value.
    type State: Send + Sync + 'static;

    /// Return the current full state.
    fn get_state(&self) -> Self::State;

    /// Replace the full state, then notify every listener exactly once,
    /// synchronously, before returning.
    ///
    /// Fails with [`ContainerError::Rejected`] (state untouched) when the
    /// container refuses the value, or with [`ContainerError::Listener`]
    /// (state replaced) when a listener fails. A failing listener does not
    /// stop delivery to the others.
    fn set_state(&self, state: Self::State) -> Result<(), ContainerError>;

    /// Register a listener for state replacements.
    fn on_change(&self, listener: Listener<Self::State>) -> SubscriptionId;

    /// Remove a listener. Returns false if it was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Run `f` inside the container's write region.
    ///
    /// Containers shared across threads must serialize writes and their
    /// notifications here, re-entrantly for the calling thread. The default
    /// suits single-threaded containers.
    fn exclusive<R>(&self, f: impl FnOnce() -> R) -> R
    where
        Self: Sized,
    {
        f()
    }
}
