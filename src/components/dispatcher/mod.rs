mod actor;
mod handle;

pub use handle::CalendarHandle;
