pub mod api;
pub mod config;
pub mod deck;
pub mod server;
