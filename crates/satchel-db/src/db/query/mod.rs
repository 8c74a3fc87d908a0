pub mod assessment;
pub mod homework;
pub mod lesson;
pub mod profile;
pub mod reminder;
pub mod subject;
pub mod user;
