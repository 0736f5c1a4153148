pub mod backends;
pub mod config;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod model;
pub mod navigator;
pub mod registry;
pub mod search;
pub mod tools;
pub mod types;
