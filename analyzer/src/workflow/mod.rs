pub mod config;
pub mod export;
pub mod report;
pub mod session;
