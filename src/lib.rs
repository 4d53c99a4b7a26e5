pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod moderation;
pub mod session;
pub mod types;
