mod authenticate;
mod http_client;
pub mod jwt;

pub use authenticate::{fetch_token, AuthCredentials};
pub use http_client::{ClientError, Endpoints};
