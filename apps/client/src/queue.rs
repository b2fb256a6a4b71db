//! Ordered queue of mutations that could not reach the server.
//!
//! Items are replayed strictly in FIFO order. No deduplication and no
//! merging: two queued toggles for the same key both replay, restoring
//! the original value. A failed replay moves its item to the tail and
//! ends the drain pass.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use habit_core::types::Habit;

/// Payload for an add-habit request, queued verbatim when offline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHabit {
    pub name: String,
    pub emoji: Option<String>,
    pub color: Option<String>,
}

impl NewHabit {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            emoji: None,
            color: None,
        }
    }
}

/// One deferred mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "camelCase")]
pub enum SyncAction {
    AddHabit(NewHabit),
    DeleteHabit { habit_id: i64 },
    UpdateHabits { habits: Vec<Habit> },
    ToggleCompletion { habit_id: i64, day: u32, month: u32, year: i32 },
    UpdateLanguage { language: String },
}

impl SyncAction {
    /// Short tag used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddHabit(_) => "addHabit",
            Self::DeleteHabit { .. } => "deleteHabit",
            Self::UpdateHabits { .. } => "updateHabits",
            Self::ToggleCompletion { .. } => "toggleCompletion",
            Self::UpdateLanguage { .. } => "updateLanguage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub action: SyncAction,
    pub timestamp: DateTime<Utc>,
}

/// FIFO queue with a single-flight drain guard.
#[derive(Default)]
pub struct SyncQueue {
    items: Mutex<VecDeque<QueueItem>>,
    draining: AtomicBool,
}

impl SyncQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, action: SyncAction) {
        tracing::debug!(action = action.name(), "queued for sync");
        self.lock().push_back(QueueItem {
            action,
            timestamp: Utc::now(),
        });
    }

    pub fn pop_front(&self) -> Option<QueueItem> {
        self.lock().pop_front()
    }

    /// Put a failed item back at the tail, behind everything else.
    pub fn requeue(&self, item: QueueItem) {
        self.lock().push_back(item);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of the queued actions, front first.
    pub fn actions(&self) -> Vec<SyncAction> {
        self.lock().iter().map(|item| item.action.clone()).collect()
    }

    /// Claim the drain flag. Returns false when a drain is already
    /// running; the caller must not proceed.
    pub fn try_begin_drain(&self) -> bool {
        self.draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn end_drain(&self) {
        self.draining.store(false, Ordering::Release);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<QueueItem>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
