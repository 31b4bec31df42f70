pub mod coordinate;
pub mod location;
pub mod project;
pub mod time_entry;
pub mod week_summary;
