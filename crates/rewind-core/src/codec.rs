//! Snapshot codec - converts live state to immutable, comparable snapshots.
//!
//! A [`Snapshot`] is the serialized form of a container's full state at one
//! instant. Equality is structural on the serialized bytes, so two snapshots
//! of equal plain-data states compare equal.
//!
//! Codecs are pluggable through [`SnapshotCodec`]. The built-in
//! [`JsonCodec`] stores states as JSON and refuses values that JSON cannot
//! carry faithfully.

use crate::error::{CodecError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// An immutable serialized copy of a container's full state.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Snapshot(Box<[u8]>);

impl Snapshot {
    /// Wrap already-encoded bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into().into_boxed_slice())
    }

    /// The raw serialized payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The payload as text, if the codec produced UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_vec()
    }

    /// Size of the payload in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(text) => f.debug_tuple("Snapshot").field(&text).finish(),
            None => write!(f, "Snapshot(<{} bytes>)", self.0.len()),
        }
    }
}

/// Trait for snapshot formats.
///
/// Implementations must produce snapshots that share nothing with the live
/// state, and `decode(encode(s))` must be observably equal to `s` for any
/// state made of plain data (maps, sequences, primitives). Encoding must
/// fail rather than silently drop or alter data.
pub trait SnapshotCodec<T>: Send + Sync {
    /// Serialize a state into a snapshot.
    fn encode(&self, state: &T) -> Result<Snapshot>;

    /// Rebuild a state from a snapshot.
    fn decode(&self, snapshot: &Snapshot) -> Result<T>;

    /// Human-readable format name (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// JSON snapshots backed by `serde_json`.
///
/// By default every encode is verified: the produced JSON value is decoded,
/// re-encoded and compared with the first encoding, which catches data JSON
/// would quietly rewrite (non-finite floats turn into `null`).
///
/// The check is value-level. Types whose distinct states share one JSON
/// value pass it while still losing information: `Some(None)` of an
/// `Option<Option<_>>` encodes to `null` and decodes as `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JsonCodec {
    pretty: bool,
    verify: bool,
}

impl JsonCodec {
    /// Compact, verified JSON.
    pub fn new() -> Self {
        Self {
            pretty: false,
            verify: true,
        }
    }

    /// Indented, verified JSON.
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            verify: true,
        }
    }

    /// Compact JSON without the round-trip check.
    pub fn unverified() -> Self {
        Self {
            pretty: false,
            verify: false,
        }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    pub fn is_verified(&self) -> bool {
        self.verify
    }

    fn check_round_trip<T>(&self, value: &serde_json::Value) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let restored: T = serde_json::from_value(value.clone()).map_err(|e| {
            CodecError::UnsupportedValue(format!("value does not survive a round trip: {}", e))
        })?;
        let again = serde_json::to_value(&restored)
            .map_err(|e| CodecError::UnsupportedValue(e.to_string()))?;

        if &again != value {
            return Err(CodecError::UnsupportedValue(
                "value changed during a round trip".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SnapshotCodec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, state: &T) -> Result<Snapshot> {
        let value =
            serde_json::to_value(state).map_err(|e| CodecError::UnsupportedValue(e.to_string()))?;

        if self.verify {
            self.check_round_trip::<T>(&value)?;
        }

        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&value)
        } else {
            serde_json::to_vec(&value)
        }
        .map_err(|e| CodecError::UnsupportedValue(e.to_string()))?;

        Ok(Snapshot::from_bytes(bytes))
    }

    fn decode(&self, snapshot: &Snapshot) -> Result<T> {
        serde_json::from_slice(snapshot.as_bytes())
            .map_err(|e| CodecError::Malformed(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
