use super::models::{Grant, PermissionState, RequestToken};
use crate::error::{permission_request_error, GateResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use tracing::{debug, warn};

type Pending = oneshot::Sender<GateResult<PermissionState>>;

/// Outstanding permission requests keyed by correlation token
///
/// Every lookup, resolution and removal happens under a single lock
/// acquisition, so a response can never be delivered twice.
#[derive(Debug, Default)]
pub struct RequestTracker {
    pending: Mutex<HashMap<RequestToken, Pending>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<RequestToken, Pending>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start tracking `token`; the receiver yields the eventual answer
    pub fn register(
        &self,
        token: RequestToken,
    ) -> GateResult<oneshot::Receiver<GateResult<PermissionState>>> {
        let mut pending = self.lock();
        if pending.contains_key(&token) {
            return Err(permission_request_error(&format!(
                "request {} is already outstanding",
                token
            )));
        }

        let (tx, rx) = oneshot::channel();
        pending.insert(token, tx);
        debug!("Tracking permission request {} ({} outstanding)", token, pending.len());
        Ok(rx)
    }

    /// Stop tracking `token` without answering it
    pub fn cancel(&self, token: &RequestToken) -> bool {
        self.lock().remove(token).is_some()
    }

    /// Number of requests still waiting for an answer
    pub fn outstanding(&self) -> usize {
        self.lock().len()
    }

    /// Deliver the authority's answer for `token`
    ///
    /// The first grant decides the outcome. An empty answer, or an answer
    /// for an unknown token, rejects the request only when it is the single
    /// one outstanding; with several outstanding it is dropped. Returns
    /// whether no requests remain.
    pub fn resolve(&self, token: &RequestToken, grants: &[Grant]) -> bool {
        let mut pending = self.lock();

        match pending.remove(token) {
            Some(sender) => match grants.first() {
                Some(Grant::Granted) => {
                    let _ = sender.send(Ok(PermissionState::Authorized));
                }
                Some(Grant::Denied) => {
                    let _ = sender.send(Ok(PermissionState::Denied));
                }
                None if pending.is_empty() => {
                    let _ = sender.send(Err(permission_request_error("Request was cancelled")));
                }
                None => {
                    warn!(
                        "Dropping empty permission response for {} with {} other requests outstanding",
                        token,
                        pending.len()
                    );
                }
            },
            None if pending.len() == 1 => {
                let only = pending.keys().next().copied();
                if let Some(sender) = only.and_then(|key| pending.remove(&key)) {
                    let _ = sender.send(Err(permission_request_error(&format!(
                        "Received a response for unknown request {}",
                        token
                    ))));
                }
            }
            None => {
                warn!(
                    "Dropping permission response for unknown request {} ({} outstanding)",
                    token,
                    pending.len()
                );
            }
        }

        pending.is_empty()
    }
}
