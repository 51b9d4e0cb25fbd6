use super::http_client::ClientError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{header, StatusCode};
use serde::Deserialize;
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};
use url::Url;

/// The user's username and password, in a struct out of ease.
#[derive(Debug, Default)]
pub struct AuthCredentials {
    pub username: String,
    pub password: String,
}

/// The web client also accepts sign-in responses wrapped in an object.
#[derive(Deserialize)]
struct TokenEnvelope {
    token: String,
}

impl AuthCredentials {
    /// Value for the `Authorization` header, per RFC 7617.
    fn basic_authorization(&self) -> String {
        let pair = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(pair))
    }

    /// Ask for whichever of the username or password is still empty.
    ///
    /// Input is echoed back to the terminal; nothing here masks the password.
    pub fn prompt_missing<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<()> {
        if self.username.is_empty() {
            self.username = interactive_prompt("Enter username: ", input, output)?;
        }
        if self.password.is_empty() {
            self.password = interactive_prompt("Enter password: ", input, output)?;
        }
        Ok(())
    }
}

/// Quick and dirty function to read a single word from the user.
fn interactive_prompt<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<String> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut response = String::new();
    input.read_line(&mut response)?;

    // Only the first word counts, mirroring how the line would be tokenized.
    Ok(response
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string())
}

/// Sign in with Basic authentication, returning the issued JWT.
///
/// The sign-in endpoint takes no body. On success it responds with the token
/// as a bare JSON string literal, e.g. `"eyJ[..].eyJ[..].[..]"`.
pub async fn fetch_token(
    client: &reqwest::Client,
    endpoint: &Url,
    credentials: &AuthCredentials,
) -> Result<String, ClientError> {
    let request = client
        .post(endpoint.clone())
        .header(header::AUTHORIZATION, credentials.basic_authorization())
        .build()
        .map_err(ClientError::RequestConstruction)?;

    debug!(%endpoint, username = %credentials.username, "signing in");
    let result = client
        .execute(request)
        .await
        .map_err(ClientError::Network)?;

    let status = result.status();
    let body = result.text().await.map_err(ClientError::Network)?;
    debug!(%status, length = body.len(), "sign-in response received");

    if status != StatusCode::OK {
        warn!(%status, "sign-in was rejected");
        return Err(ClientError::Authentication {
            status: status.as_u16(),
            body,
        });
    }

    extract_token(&body)
}

/// Pull the JWT out of a successful sign-in body.
///
/// A token without any `.` cannot be a JWT, which is the only structural
/// check made here.
fn extract_token(body: &str) -> Result<String, ClientError> {
    let token = match serde_json::from_str(body) {
        Ok(TokenEnvelope { token }) => token,
        Err(_) => body.trim_matches('"').to_string(),
    };

    if token.contains('.') {
        Ok(token)
    } else {
        Err(ClientError::MalformedToken {
            body: body.to_string(),
        })
    }
}
