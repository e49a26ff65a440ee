pub mod cities;
pub mod config;
pub mod crossfade;
pub mod error;
pub mod flight;
pub mod geometry;
pub mod models;
pub mod projection;
pub mod reactor;
pub mod story;
pub mod viewport;
