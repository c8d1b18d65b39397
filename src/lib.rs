pub mod config;
pub mod db;
pub mod quiz;
pub mod server;
pub mod telemetry;
