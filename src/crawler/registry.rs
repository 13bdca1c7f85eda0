//! Visited registry: the single owner of the claimed-address set
//!
//! The set lives inside one spawned task. Crawl tasks talk to it through a
//! cloneable [`RegistryHandle`], sending one claim request at a time and waiting
//! for the answer. Because the owner handles requests strictly one after the
//! other, the check and the mark of a claim can never interleave with another
//! claim.

use std::collections::HashSet;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Pending claim requests buffered before senders wait
const REQUEST_BUFFER: usize = 256;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("visited registry stopped while claims were still being made")]
    Stopped,
}

struct ClaimRequest {
    address: String,
    respond: oneshot::Sender<bool>,
}

/// Cloneable access point to a running registry
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    requests: mpsc::Sender<ClaimRequest>,
}

impl RegistryHandle {
    /// Claims `address` for the caller
    ///
    /// Returns `true` exactly once per address for the registry's lifetime: to
    /// the first claimant. Every later claim returns `false` and changes nothing.
    pub async fn claim_if_new(&self, address: &str) -> Result<bool, RegistryError> {
        let (respond, answer) = oneshot::channel();
        let request = ClaimRequest {
            address: address.to_string(),
            respond,
        };

        self.requests
            .send(request)
            .await
            .map_err(|_| RegistryError::Stopped)?;
        answer.await.map_err(|_| RegistryError::Stopped)
    }
}

/// The registry's owning task
///
/// The registry shuts down once every [`RegistryHandle`] has been dropped;
/// [`VisitedRegistry::shutdown`] waits for that and returns the number of
/// addresses claimed.
pub struct VisitedRegistry {
    worker: JoinHandle<usize>,
}

impl VisitedRegistry {
    /// Starts a registry with an empty claimed set
    pub fn start() -> (Self, RegistryHandle) {
        let (requests, inbox) = mpsc::channel(REQUEST_BUFFER);
        let worker = tokio::spawn(serve_claims(inbox));
        (Self { worker }, RegistryHandle { requests })
    }

    /// Waits for the registry to stop and reports how many addresses were claimed
    ///
    /// All handles must have been dropped first, otherwise this waits forever.
    pub async fn shutdown(self) -> Result<usize, RegistryError> {
        self.worker.await.map_err(|_| RegistryError::Stopped)
    }
}

async fn serve_claims(mut inbox: mpsc::Receiver<ClaimRequest>) -> usize {
    let mut claimed = HashSet::new();

    while let Some(ClaimRequest { address, respond }) = inbox.recv().await {
        // insert() is the whole check-and-mark
        let is_new = claimed.insert(address);
        // A claimant that stopped waiting still holds the claim
        let _ = respond.send(is_new);
    }

    tracing::debug!("Visited registry stopping after {} claims", claimed.len());
    claimed.len()
}
