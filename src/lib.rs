pub mod catalog;
pub mod config;
pub mod detection;
pub mod error;
pub mod matching;
pub mod output;
pub mod search;
pub mod server;
pub mod session;
pub mod store;
pub mod suggest;
