pub mod config;
pub mod latentsense_client;
pub mod logger;
pub mod tool_executor;
pub mod validation;
