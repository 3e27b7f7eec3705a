//! Calendar permission checks and the request flow.

mod gate;
mod history;
pub mod models;
mod tracker;

pub use gate::PermissionGate;
pub use history::{FileRequestHistory, MemoryRequestHistory, RequestHistory};
pub use models::{Grant, PermissionState, RequestToken, Scope};
pub use tracker::RequestTracker;

use crate::error::GateResult;

/// The host's permission system
pub trait PermissionAuthority: Send + Sync {
    /// Whether every permission of `scope` is currently granted
    fn current_grant(&self, scope: Scope) -> Grant;

    /// Whether the host would explain the request again, i.e. the user has
    /// not permanently refused
    fn should_show_rationale(&self, scope: Scope) -> bool;

    /// Ask the user for `scope`
    ///
    /// Returns once the request is underway. The answer is delivered later
    /// through [`PermissionGate::on_request_result`] with the same `token`.
    fn request_grant(&self, scope: Scope, token: RequestToken) -> GateResult<()>;
}
