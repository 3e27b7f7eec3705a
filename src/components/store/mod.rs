//! The calendar database as seen by this crate.
//!
//! The host application implements [`CalendarStore`] on top of whatever
//! calendar provider the platform offers. Implementations report failures
//! with [`crate::error::store_error`]; the message reaches the caller as is.

pub mod models;

pub use models::{CalendarAttributes, EventAttributes, EventFilter, EventSelector};

use crate::error::GateResult;
use async_trait::async_trait;

/// Content location of the default events table
pub const DEFAULT_EVENTS_URI: &str = "content://com.android.calendar/events";

/// Calendar database collaborator
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// Insert a calendar and return its id
    async fn insert_calendar(&self, attrs: CalendarAttributes) -> GateResult<i64>;

    /// Delete one calendar, returning the affected row count
    async fn delete_calendar(&self, id: i64) -> GateResult<u64>;

    /// Delete every local calendar owned by `account_name`
    async fn delete_calendars_matching(&self, account_name: &str) -> GateResult<u64>;

    /// Id of the local calendar owned by `account_name`, if any
    async fn find_calendar_id_by_account_name(&self, account_name: &str)
        -> GateResult<Option<i64>>;

    /// Insert an event and return its id
    async fn insert_event(&self, attrs: EventAttributes) -> GateResult<i64>;

    /// Insert all events in one call, returning the inserted count
    async fn bulk_insert_events(&self, attrs: Vec<EventAttributes>) -> GateResult<u64>;

    /// Apply `attrs` to the selected events, returning the affected row count
    async fn update_events(&self, selector: &EventSelector, attrs: EventAttributes)
        -> GateResult<u64>;

    /// Delete the selected events, returning the affected row count
    async fn delete_events(&self, selector: &EventSelector) -> GateResult<u64>;

    /// Where the store keeps its events
    fn events_uri(&self) -> String {
        DEFAULT_EVENTS_URI.to_string()
    }
}
