pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod processing;
pub mod services;
pub mod storage;
pub mod utils;
