pub mod artifacts;
pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod logging;
pub mod media;
pub mod server;
pub mod tools;

pub use error::{Error, Result};
