mod client;
mod types;

pub use client::{HttpMediaClient, MediaClient};
pub use types::*;
