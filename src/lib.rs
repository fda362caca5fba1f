pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod repl;
pub mod session;
pub mod web_search;
