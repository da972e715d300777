pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod openai;
pub mod schedule;
pub mod services;
pub mod store;
