pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod matcher;
pub mod processor;
pub mod reference;
pub mod server;
pub mod store;
pub mod workbook;
