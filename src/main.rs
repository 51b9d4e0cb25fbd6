mod api;
mod reboot;

use crate::api::{ApiClient, QueryPreset, DEFAULT_USER_ID};
use crate::reboot::{jwt, AuthCredentials, ClientError, Endpoints};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "reboot01ctl",
    version,
    about = "Sign in to reboot01, inspect the issued JWT and query the GraphQL API"
)]
struct Cli {
    /// Username for authentication (prompted for if empty)
    #[arg(long, default_value = "")]
    username: String,

    /// Password for authentication (prompted for if empty)
    #[arg(long, default_value = "")]
    password: String,

    /// GraphQL query to execute instead of a preset
    #[arg(long, conflicts_with_all = ["preset", "me"])]
    query: Option<String>,

    /// Built-in query to execute
    #[arg(long, value_enum, default_value_t = QueryPreset::UserInfo)]
    preset: QueryPreset,

    /// Fetch the signed-in user's profile, using the JWT's `sub` claim as the id
    #[arg(long, default_value_t = false)]
    me: bool,

    /// Override the sign-in endpoint
    #[arg(long)]
    auth_endpoint: Option<Url>,

    /// Override the GraphQL endpoint
    #[arg(long)]
    graphql_endpoint: Option<Url>,

    /// Log requests and responses to stderr
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn endpoints(&self) -> Endpoints {
        let mut endpoints = Endpoints::default();
        if let Some(authenticate) = &self.auth_endpoint {
            endpoints.authenticate = authenticate.clone();
        }
        if let Some(graphql) = &self.graphql_endpoint {
            endpoints.graphql = graphql.clone();
        }
        endpoints
    }
}

/// Everything that can end a run early, prefixed with the stage it happened in.
#[derive(Debug, Error)]
enum RunError {
    #[error("Error reading credentials: {0}")]
    Prompt(#[source] io::Error),
    #[error("Error getting JWT: {0}")]
    Authenticate(#[source] ClientError),
    #[error("Error decoding JWT: {0}")]
    Decode(#[source] jwt::TokenError),
    #[error("Error querying GraphQL: {0}")]
    Query(#[source] ClientError),
    #[error("Error writing output: {0}")]
    Output(#[from] io::Error),
}

/// Sign in, show the token, then run a single query with it.
async fn run<R: BufRead, W: Write>(cli: Cli, input: &mut R, out: &mut W) -> Result<(), RunError> {
    let endpoints = cli.endpoints();
    let mut credentials = AuthCredentials {
        username: cli.username,
        password: cli.password,
    };
    credentials
        .prompt_missing(input, out)
        .map_err(RunError::Prompt)?;

    // Both requests share a single client.
    let client = reqwest::Client::new();

    writeln!(out, "Authenticating...")?;
    let token = reboot::fetch_token(&client, &endpoints.authenticate, &credentials)
        .await
        .map_err(RunError::Authenticate)?;
    writeln!(out, "JWT: {token}")?;

    writeln!(out, "\nDecoding JWT...")?;
    jwt::decode_and_print(&token, out).map_err(RunError::Decode)?;

    let query = match cli.query {
        Some(query) => query,
        None if cli.me => {
            let user_id = jwt::subject(&token).map_err(RunError::Decode)?;
            info!(%user_id, "querying as the signed-in user");
            cli.preset.document(&user_id)
        }
        None => cli.preset.document(DEFAULT_USER_ID),
    };

    writeln!(out, "\nQuerying GraphQL endpoint for data...")?;
    let data = ApiClient::new(client, endpoints.graphql, token)
        .query(&query)
        .await
        .map_err(RunError::Query)?;
    writeln!(out, "GraphQL Data:")?;
    writeln!(out, "{data}")?;

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "reboot01ctl=debug,warn"
    } else {
        "warn"
    };
    // Logs go to stderr so stdout only carries results.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();
    match run(cli, &mut input, &mut out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = out.flush();
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}
