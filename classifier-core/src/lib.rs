pub mod classifier;
pub mod config;
pub mod logging;
pub mod reputation;
pub mod rules;
pub mod types;
