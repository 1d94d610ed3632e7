mod client;
mod models;

pub use client::GambaClient;
pub use models::*;
