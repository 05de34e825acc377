pub mod app;
pub mod chat;
pub mod config;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod model_table;
pub mod relay;
pub mod upstream;
