pub mod config;
mod http_layers;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
#[allow(unused_imports)] // Used by main.rs
pub use server::{make_app, run_server};
pub use state::ServerState;
