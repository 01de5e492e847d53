pub mod datetime;
pub mod response;

pub use datetime::parse_calendar_bound;
pub use response::ApiResponse;
