pub mod cli;
pub mod config;
pub mod doctor;
pub mod engine;
pub mod error;
pub mod logger;
pub mod mcp;
pub mod models;
pub mod service;
pub mod session;
