mod client;
mod queries;

pub use client::ApiClient;
pub use queries::{QueryPreset, DEFAULT_USER_ID};
