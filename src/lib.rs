pub mod aggregator;
pub mod config;
pub mod error;
pub mod event;
pub mod input;
pub mod model;
pub mod simulator;
pub mod sink;
pub mod ticker;
pub mod ui;
