pub mod human_duration;
pub mod time_format;
