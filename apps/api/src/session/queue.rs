//! Vote-ranked playback queue
//!
//! The queue is an ordered sequence of entries where the index doubles as
//! priority rank: index 0 is the entry currently playing, indices 1..end
//! are kept vote-sorted descending by the local bubble rule applied after
//! each vote. Index 0 is pinned: it changes only through explicit removal
//! or advance, never through bubbling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of entries a session queue will hold
pub const MAX_QUEUE_SIZE: usize = 500;

/// One item waiting to play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    /// Canonical video identifier, unique within the queue
    pub video_id: String,

    /// Video title, fetched once at insertion and never refreshed
    pub title: String,

    /// Thumbnail URL, fetched once at insertion
    pub thumbnail: String,

    /// Vote score, mutated only by vote operations
    pub votes: i32,

    /// When this entry was added
    pub added_at: DateTime<Utc>,
}

/// Direction of a single vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDelta {
    Up,
    Down,
}

impl VoteDelta {
    /// Signed score change for this vote
    pub fn value(self) -> i32 {
        match self {
            VoteDelta::Up => 1,
            VoteDelta::Down => -1,
        }
    }

    /// Parse a raw wire value; only +1 and -1 are accepted
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(VoteDelta::Up),
            -1 => Some(VoteDelta::Down),
            _ => None,
        }
    }
}

/// Errors produced by queue operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("video already queued: {0}")]
    Duplicate(String),

    #[error("index {index} is out of bounds for queue of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("queue is at capacity ({0} entries)")]
    Full(usize),
}

/// The ordered queue sequence
#[derive(Debug)]
pub struct QueueStore {
    entries: Vec<QueueEntry>,
    max_len: usize,
}

impl Default for QueueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueStore {
    /// Create an empty queue with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(MAX_QUEUE_SIZE)
    }

    /// Create an empty queue holding at most `max_len` entries
    pub fn with_capacity(max_len: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_len,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a video id is present anywhere in the sequence
    pub fn contains(&self, video_id: &str) -> bool {
        self.entries.iter().any(|e| e.video_id == video_id)
    }

    /// Append a new entry with a zero vote score.
    ///
    /// Duplicate submissions are rejected, not re-added.
    pub fn add(
        &mut self,
        video_id: impl Into<String>,
        title: impl Into<String>,
        thumbnail: impl Into<String>,
    ) -> Result<(), QueueError> {
        let video_id = video_id.into();
        if self.contains(&video_id) {
            return Err(QueueError::Duplicate(video_id));
        }
        if self.entries.len() >= self.max_len {
            return Err(QueueError::Full(self.max_len));
        }

        self.entries.push(QueueEntry {
            video_id,
            title: title.into(),
            thumbnail: thumbnail.into(),
            votes: 0,
            added_at: Utc::now(),
        });
        Ok(())
    }

    /// Remove and return the entry at `index`.
    ///
    /// Used both for explicit removal and for advancing past a finished
    /// entry (`remove_at(0)`). Out-of-range indices are an error, not a
    /// no-op, and that includes any removal from an empty queue.
    pub fn remove_at(&mut self, index: usize) -> Result<QueueEntry, QueueError> {
        if index >= self.entries.len() {
            return Err(QueueError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    /// Apply a vote to the entry at `index` and re-settle its position
    /// with a local bubble pass.
    ///
    /// The voted entry swaps with its immediate neighbor while the strict
    /// ordering comparison holds, one step at a time: upward bounded at
    /// index 1 (index 0 is pinned), downward bounded at the end. Ties
    /// never swap, so equal scores preserve insertion order.
    pub fn vote(&mut self, index: usize, delta: VoteDelta) -> Result<(), QueueError> {
        let len = self.entries.len();
        if index >= len {
            return Err(QueueError::IndexOutOfRange { index, len });
        }

        self.entries[index].votes += delta.value();

        // The pinned now-playing entry changes score but never position.
        if index == 0 {
            return Ok(());
        }

        let mut idx = index;
        while idx > 1 && self.entries[idx - 1].votes < self.entries[idx].votes {
            self.entries.swap(idx - 1, idx);
            idx -= 1;
        }
        while idx < len - 1 && self.entries[idx + 1].votes > self.entries[idx].votes {
            self.entries.swap(idx, idx + 1);
            idx += 1;
        }

        Ok(())
    }

    /// The entry at index 0, if any
    pub fn current(&self) -> Option<&QueueEntry> {
        self.entries.first()
    }

    /// Immutable copy of the full ordered sequence for transmission
    pub fn snapshot(&self) -> Vec<QueueEntry> {
        self.entries.clone()
    }
}
