pub mod api;
pub mod config;
pub mod data_models;
pub mod describer;
pub mod error;
pub mod gemini;
pub mod prompt;
pub mod search;
