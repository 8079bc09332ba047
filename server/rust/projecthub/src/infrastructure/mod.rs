pub mod config;
pub mod database;
pub mod delayed_queue;
pub mod delivery;
pub mod metrics;
pub mod telemetry;
