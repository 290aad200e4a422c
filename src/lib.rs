pub mod binance;
pub mod config;
pub mod error;
pub mod input;
pub mod market;
pub mod model;
pub mod server;
pub mod ui;
