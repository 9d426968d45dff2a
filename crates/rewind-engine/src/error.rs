//! Error types for the history engine and container adapters.

use rewind_core::CodecError;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// An error raised by a change listener.
///
/// Containers cannot know what their subscribers do, so listener failures
/// are carried type-erased. Use [`ListenerError::downcast_ref`] to recover
/// the concrete error (the history engine raises [`HistoryError`]).
#[derive(Clone)]
pub struct ListenerError(Arc<dyn StdError + Send + Sync>);

#[derive(Debug, Error)]
#[error("{0}")]
struct Message(String);

impl ListenerError {
    pub fn new(err: impl StdError + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }

    /// A listener error carrying only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(Message(message.into()))
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }
}

impl fmt::Debug for ListenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for ListenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl StdError for ListenerError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// Errors raised by a container's write path.
#[derive(Error, Debug, Clone)]
pub enum ContainerError {
    /// The container refused the value; its state is unchanged.
    #[error("State rejected: {0}")]
    Rejected(String),

    /// The state was replaced but a subscriber failed while being notified.
    #[error("Listener failed: {0}")]
    Listener(ListenerError),
}

/// Errors that can occur in history operations.
#[derive(Error, Debug, Clone)]
pub enum HistoryError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Container write failed: {0}")]
    ContainerWrite(#[from] ContainerError),
}

impl HistoryError {
    /// Whether the container state was replaced despite the error.
    pub fn state_replaced(&self) -> bool {
        matches!(self, HistoryError::ContainerWrite(ContainerError::Listener(_)))
    }
}

pub type Result<T> = std::result::Result<T, HistoryError>;
