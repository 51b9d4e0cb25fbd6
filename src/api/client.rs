use crate::reboot::ClientError;
use reqwest::header;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// The body POSTed to the GraphQL engine.
#[derive(Serialize, Debug)]
struct GraphQlRequest<'a> {
    query: &'a str,
}

/// The envelope every GraphQL response arrives in.
#[derive(Deserialize, Debug)]
struct GraphQlResponse {
    #[serde(default)]
    data: Value,
    /// Some engines send `"errors": null` rather than leaving the key out.
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize, Debug)]
struct GraphQlError {
    message: String,
}

#[derive(Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    /// The GraphQL endpoint all queries are sent to.
    endpoint: Url,
    /// The internal access token across API requests.
    access_token: String,
}

impl ApiClient {
    /// Creates a new API client around the given access token.
    pub fn new(client: reqwest::Client, endpoint: Url, access_token: String) -> Self {
        Self {
            client,
            endpoint,
            access_token,
        }
    }

    /// Runs `query` and returns its `data`, pretty-printed.
    ///
    /// Any entry within `errors` fails the whole query, even if `data` was
    /// partially filled in.
    pub async fn query(&self, query: &str) -> Result<String, ClientError> {
        let request = self
            .client
            .post(self.endpoint.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.access_token)
            .json(&GraphQlRequest { query })
            .build()
            .map_err(ClientError::RequestConstruction)?;

        debug!(endpoint = %self.endpoint, "sending GraphQL query");
        let result = self
            .client
            .execute(request)
            .await
            .map_err(ClientError::Network)?;

        // The engine reports failures within the body, so the status code
        // isn't consulted.
        let status = result.status();
        let body = result.bytes().await.map_err(ClientError::Network)?;
        debug!(%status, length = body.len(), "GraphQL response received");

        let response: GraphQlResponse =
            serde_json::from_slice(&body).map_err(ClientError::ResponseParse)?;
        let errors = response.errors.unwrap_or_default();
        if !errors.is_empty() {
            return Err(ClientError::GraphQl {
                messages: errors
                    .into_iter()
                    .map(|error| error.message)
                    .collect(),
            });
        }

        // Number literals come back exactly as the engine wrote them.
        serde_json::to_string_pretty(&response.data).map_err(ClientError::ResponseParse)
    }
}
