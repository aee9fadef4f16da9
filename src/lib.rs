pub mod analyzer;
pub mod cli;
pub mod cluster;
pub mod config;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod model;
pub mod smells;
pub mod util;
