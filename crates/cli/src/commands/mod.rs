pub mod config;
pub mod donate;
