use thiserror::Error;
use url::Url;

/// The sign-in endpoint, which exchanges Basic credentials for a JWT.
pub const AUTHENTICATE_ENDPOINT: &str = "https://learn.reboot01.com/api/auth/signin";

/// The Hasura GraphQL engine sitting behind the platform.
pub const GRAPHQL_ENDPOINT: &str = "https://learn.reboot01.com/api/graphql-engine/v1/graphql";

/// Possible HTTP issues across the sign-in and GraphQL requests.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to create request: {0}")]
    RequestConstruction(#[source] reqwest::Error),
    #[error("failed to send request: {0}")]
    Network(#[source] reqwest::Error),
    #[error("authentication failed with status {status}: {body}")]
    Authentication { status: u16, body: String },
    #[error("no JWT found in response: {body}")]
    MalformedToken { body: String },
    #[error("failed to parse response: {0}")]
    ResponseParse(#[source] serde_json::Error),
    #[error("GraphQL errors: {}", messages.join("; "))]
    GraphQl { messages: Vec<String> },
}

/// Where we sign in, and where we send queries afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub authenticate: Url,
    pub graphql: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        // Both are compile-time constants, so parsing them cannot fail.
        Self {
            authenticate: Url::parse(AUTHENTICATE_ENDPOINT)
                .expect("authenticate endpoint should be a valid URL"),
            graphql: Url::parse(GRAPHQL_ENDPOINT).expect("GraphQL endpoint should be a valid URL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoints_point_at_reboot01() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.authenticate.as_str(), AUTHENTICATE_ENDPOINT);
        assert_eq!(endpoints.graphql.as_str(), GRAPHQL_ENDPOINT);
        assert_eq!(endpoints.graphql.host_str(), Some("learn.reboot01.com"));
    }

    #[test]
    fn graphql_error_lists_every_message_in_order() {
        let error = ClientError::GraphQl {
            messages: vec![
                "field not found".to_string(),
                "permission denied".to_string(),
                "field not found".to_string(),
            ],
        };
        assert_eq!(
            error.to_string(),
            "GraphQL errors: field not found; permission denied; field not found"
        );
    }

    #[test]
    fn authentication_error_carries_status_and_body() {
        let error = ClientError::Authentication {
            status: 401,
            body: r#"{"error":"User does not exist or password incorrect"}"#.to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("password incorrect"));
    }
}
