use super::history::RequestHistory;
use super::models::{Grant, PermissionState, RequestToken, Scope};
use super::tracker::RequestTracker;
use super::PermissionAuthority;
use crate::error::{permission_request_error, Error, GateResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Decides the permission state and drives permission requests
pub struct PermissionGate {
    authority: Arc<dyn PermissionAuthority>,
    history: Arc<dyn RequestHistory>,
    tracker: Arc<RequestTracker>,
    timeout: Option<Duration>,
}

impl PermissionGate {
    /// Create a gate with its own request tracker and no timeout
    pub fn new(authority: Arc<dyn PermissionAuthority>, history: Arc<dyn RequestHistory>) -> Self {
        Self {
            authority,
            history,
            tracker: Arc::new(RequestTracker::new()),
            timeout: None,
        }
    }

    /// Share an existing request tracker
    pub fn with_tracker(mut self, tracker: Arc<RequestTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    /// Give up on unanswered requests after `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn tracker(&self) -> &Arc<RequestTracker> {
        &self.tracker
    }

    /// Current state for `scope`; never records anything
    pub fn check(&self, scope: Scope) -> PermissionState {
        if self.authority.current_grant(scope) == Grant::Granted {
            PermissionState::Authorized
        } else if !self.history.get_requested(scope) {
            PermissionState::Undetermined
        } else if self.authority.should_show_rationale(scope) {
            PermissionState::Denied
        } else {
            PermissionState::Restricted
        }
    }

    /// Fail with `PermissionDenied` unless `scope` is granted
    pub fn ensure(&self, scope: Scope) -> GateResult<()> {
        match self.authority.current_grant(scope) {
            Grant::Granted => Ok(()),
            Grant::Denied => Err(Error::PermissionDenied(format!("no {} permission", scope))),
        }
    }

    /// Ask for `scope` with a fresh correlation token
    pub async fn request(&self, scope: Scope) -> GateResult<PermissionState> {
        self.request_with_token(scope, RequestToken::new()).await
    }

    /// Ask for `scope`, correlating the answer with `token`
    ///
    /// The request is recorded in the history before the authority is
    /// consulted. Resolves to `Authorized` or `Denied`.
    pub async fn request_with_token(
        &self,
        scope: Scope,
        token: RequestToken,
    ) -> GateResult<PermissionState> {
        self.history.set_requested(scope)?;

        if self.authority.current_grant(scope) == Grant::Granted {
            debug!("Calendar {} permission already granted", scope);
            return Ok(PermissionState::Authorized);
        }

        let answer = self.tracker.register(token)?;
        info!("Requesting calendar {} permission ({})", scope, token);

        if let Err(e) = self.authority.request_grant(scope, token) {
            self.tracker.cancel(&token);
            return Err(e);
        }

        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, answer).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    self.tracker.cancel(&token);
                    warn!("Permission request {} timed out after {:?}", token, limit);
                    return Err(permission_request_error(&format!(
                        "no answer within {}s",
                        limit.as_secs()
                    )));
                }
            },
            None => answer.await,
        };

        let state = outcome
            .map_err(|_| permission_request_error("Request was abandoned without an answer"))??;
        info!("Calendar {} permission request resolved: {}", scope, state);
        Ok(state)
    }

    /// Host callback carrying the authority's answer; see [`RequestTracker::resolve`]
    pub fn on_request_result(&self, token: RequestToken, grants: &[Grant]) -> bool {
        self.tracker.resolve(&token, grants)
    }
}
