pub mod algorithms;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod models;
pub mod output;
pub mod random;
pub mod server;
pub mod state;
pub mod timeline;
