pub mod config;
pub mod fetch;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod session;
