//! Connectivity state, push-based.
//!
//! The monitor does not probe the network itself; callers report
//! transitions (a failed request, a platform event) and subscribers watch
//! the status. Going from offline to online kicks off a queue drain.

use tokio::sync::watch;

use crate::api::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Online,
    Offline,
}

pub struct ConnectivityMonitor {
    status_tx: watch::Sender<ConnectionStatus>,
    client: ApiClient,
}

impl ConnectivityMonitor {
    /// Starts online; the first failed request flips it.
    pub fn new(client: ApiClient) -> Self {
        let (status_tx, _) = watch::channel(ConnectionStatus::Online);
        Self { status_tx, client }
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status_tx.borrow()
    }

    /// Watch for status changes without polling.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_tx.subscribe()
    }

    /// Report that the server is reachable again. An offline-to-online
    /// transition drains the sync queue before returning.
    pub async fn set_online(&self) {
        let previous = self.status_tx.send_replace(ConnectionStatus::Online);
        if previous == ConnectionStatus::Offline {
            tracing::info!("back online, replaying queued changes");
            self.client.process_sync_queue().await;
        }
    }

    /// Report that the server is unreachable.
    pub fn set_offline(&self) {
        let previous = self.status_tx.send_replace(ConnectionStatus::Offline);
        if previous == ConnectionStatus::Online {
            tracing::info!("connection lost, working offline");
        }
    }
}
