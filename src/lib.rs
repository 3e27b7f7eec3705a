pub mod components;
pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

pub use components::availability::Availability;
pub use components::calendar::{AccessLevel, CalendarDescriptor};
pub use components::dispatcher::CalendarHandle;
pub use components::events::{EventDescriptor, EventTarget, FieldMapper};
pub use components::permission::{
    Grant, PermissionAuthority, PermissionGate, PermissionState, RequestHistory, RequestToken,
    Scope,
};
pub use components::recurrence::RecurrenceRule;
pub use components::store::CalendarStore;
pub use config::Config;
pub use error::{Error, GateResult};
