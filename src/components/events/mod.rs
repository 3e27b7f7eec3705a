mod mapper;
pub mod models;

pub use mapper::FieldMapper;
pub use models::{parse_calendar_id, EventDescriptor, EventTarget};
