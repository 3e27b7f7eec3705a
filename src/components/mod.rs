// Export components
pub mod availability;
pub mod calendar;
pub mod dispatcher;
pub mod events;
pub mod permission;
pub mod recurrence;
pub mod store;

// Re-export the dispatcher handle
pub use dispatcher::CalendarHandle;
