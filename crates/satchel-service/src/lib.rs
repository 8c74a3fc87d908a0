pub mod error;
pub mod event;
pub mod notify;
pub mod reminder;
pub mod subject;
