//! Offline-tolerant client for the habitgrid backend.
//!
//! Wraps the REST API with a local session cache, an optimistic mutation
//! layer and a FIFO replay queue, so a UI keeps working while the server
//! is unreachable and converges once connectivity returns.

pub mod api;
pub mod connectivity;
pub mod error;
pub mod queue;
pub mod session;

pub use habit_core::stats::MonthStats;
pub use habit_core::types::{Completions, Habit, User};

pub use api::{ApiClient, LoginSuccess, Outcome, Snapshot};
pub use connectivity::{ConnectionStatus, ConnectivityMonitor};
pub use error::{ClientError, Result};
pub use queue::{NewHabit, QueueItem, SyncAction, SyncQueue};
pub use session::{SessionData, SessionStore};
