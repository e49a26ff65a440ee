pub mod admin;
pub mod story;
