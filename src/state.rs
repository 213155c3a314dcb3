//! Key/value game state with checkpoint snapshots.
//!
//! The live mapping is the only thing reads and writes touch. A checkpoint
//! is an owned copy of that mapping pushed onto an append-only history;
//! nothing done to the live mapping afterwards can reach a stored copy.
//!
//! Values are `serde_json::Value`, so callers can store numbers, strings,
//! flags, lists or nested maps under one key type.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// Live state mapping.
pub type StateMap = BTreeMap<String, Value>;

/// Errors from checkpoint restoration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The requested history slot does not exist.
    #[error("checkpoint index {index} out of range ({len} checkpoints saved)")]
    CheckpointOutOfRange { index: isize, len: usize },
}

/// In-memory game state with a checkpoint history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    data: StateMap,
    history: Vec<StateMap>,
}

// ============================================================================
// READS AND WRITES
// ============================================================================

impl GameState {
    /// Create an empty state with no checkpoints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value for `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    /// Current value for `key`, if set.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Current value for `key`, or `default` when unset.
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        match self.data.get(key) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Signed integer view of `key`. None when unset or not an integer.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.data.get(key).and_then(Value::as_i64)
    }

    /// Unsigned integer view of `key`. None when unset or not an unsigned integer.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.data.get(key).and_then(Value::as_u64)
    }

    /// Add `delta` to an integer counter, treating an unset or
    /// non-integer value as zero. Returns the new value.
    pub fn increment(&mut self, key: &str, delta: i64) -> i64 {
        let next = self.get_i64(key).unwrap_or(0).saturating_add(delta);
        self.set(key, next);
        next
    }

    /// Remove `key`, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Keys of the live mapping, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.data.keys().map(String::as_str)
    }

    /// Borrow the live mapping.
    pub fn data(&self) -> &StateMap {
        &self.data
    }

    /// Pretty JSON rendering of the live mapping, for display.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.data).unwrap_or_else(|_| "{}".to_string())
    }
}

// ============================================================================
// CHECKPOINTS
// ============================================================================

impl GameState {
    /// Append a copy of the live mapping to the history.
    ///
    /// The copy is deep: nested lists and maps are cloned, not shared.
    pub fn save_checkpoint(&mut self) {
        self.history.push(self.data.clone());
        tracing::debug!(checkpoints = self.history.len(), "checkpoint saved");
    }

    /// Restore the most recent checkpoint. No-op when none has been saved.
    pub fn restore_checkpoint(&mut self) {
        if let Some(latest) = self.history.last() {
            self.data = latest.clone();
            tracing::debug!(checkpoints = self.history.len(), "restored latest checkpoint");
        }
    }

    /// Restore the checkpoint at `index`.
    ///
    /// Negative indices count from the end (`-1` is the latest). With an
    /// empty history this is a no-op. An index outside the history is an
    /// error and leaves the live mapping untouched.
    pub fn restore_checkpoint_at(&mut self, index: isize) -> Result<(), StateError> {
        if self.history.is_empty() {
            return Ok(());
        }

        let slot = resolve_index(index, self.history.len()).ok_or(
            StateError::CheckpointOutOfRange {
                index,
                len: self.history.len(),
            },
        )?;

        self.data = self.history[slot].clone();
        tracing::debug!(slot, "restored checkpoint");
        Ok(())
    }

    /// Number of saved checkpoints.
    pub fn checkpoint_count(&self) -> usize {
        self.history.len()
    }

    /// Borrow a saved checkpoint by signed index.
    pub fn checkpoint(&self, index: isize) -> Option<&StateMap> {
        resolve_index(index, self.history.len()).map(|slot| &self.history[slot])
    }
}

/// Map a signed index onto `0..len`; negatives count back from `len`.
fn resolve_index(index: isize, len: usize) -> Option<usize> {
    let slot = if index < 0 {
        len.checked_sub(index.unsigned_abs())?
    } else {
        index as usize
    };
    (slot < len).then_some(slot)
}

// ============================================================================
// TESTS
// ============================================================================
