pub mod config;
pub mod model;
pub mod tracker;
pub mod views;
