//! `reqlife`: issue one API request under the request lifecycle.
//!
//! The command is the host: Ctrl+C tears its session down, which cancels the
//! in-flight attempt (or pending backoff) and silences the outcome.

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use reqwest::Method;

use request_lifecycle::config::{load_config, LifecycleConfig};
use request_lifecycle::lifecycle::signals::shutdown_signal;
use request_lifecycle::observability::logging::init_logging;
use request_lifecycle::transport::SessionCredentials;
use request_lifecycle::{
    ApiRequest, ReqwestTransport, RequestError, RetryPolicy, RetryingExecutor, Session,
};

const KEY: &str = "reqlife";

#[derive(Parser)]
#[command(name = "reqlife")]
#[command(about = "Send an API request with timeouts, retries and clean cancellation", long_about = None)]
struct Cli {
    /// Absolute URL, or a path resolved against `api.base_url`
    target: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// JSON request body
    #[arg(short, long)]
    data: Option<String>,

    /// Per-attempt timeout, overrides `timeouts.request_ms`
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Overrides `retries.max_retries`
    #[arg(long)]
    retries: Option<u32>,

    /// Bearer credential
    #[arg(long)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LifecycleConfig::default(),
    };

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("failed to initialise logging: {e}");
    }

    let mut policy = RetryPolicy::from_config(&config);
    if let Some(timeout_ms) = cli.timeout_ms {
        policy = policy.with_timeout(Duration::from_millis(timeout_ms.max(1)));
    }
    if let Some(retries) = cli.retries {
        policy = policy.with_max_retries(retries);
    }

    tracing::debug!(
        timeout_ms = policy.timeout.as_millis() as u64,
        max_retries = policy.max_retries,
        "Retry policy resolved"
    );

    let credentials = Arc::new(SessionCredentials::new());
    if let Some(token) = &cli.token {
        credentials.set_token(token.as_str());
    }

    let executor = RetryingExecutor::new(Arc::new(ReqwestTransport::new()))
        .with_credentials(credentials);
    let session = Session::from_config(&config, Arc::new(executor))?.with_policy(policy);

    let method = Method::from_str(&cli.method.to_ascii_uppercase())?;
    let mut request = ApiRequest::new(method, session.url(&cli.target)?);
    if let Some(data) = &cli.data {
        let body: serde_json::Value = serde_json::from_str(data)?;
        request = request.json(&body)?;
    }

    let fetch = session.fetch(KEY, request);
    tokio::pin!(fetch);

    let mut interrupted = false;
    let result = tokio::select! {
        result = &mut fetch => result,
        _ = shutdown_signal() => {
            interrupted = true;
            session.teardown();
            fetch.await
        }
    };

    match result {
        Ok(response) => {
            println!("{}", response.status);
            let body = response.text();
            if !body.is_empty() {
                println!("{body}");
            }
            Ok(if response.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(err) => {
            let classified = session.classify(&err);
            let silent = classified.is_none();
            match failure(&err, classified, interrupted) {
                Failure::Interrupted => {
                    tracing::info!(error = %err, "Request abandoned");
                    Ok(ExitCode::from(130))
                }
                Failure::Reported(message) => {
                    if silent {
                        tracing::warn!(error = %err, "Request cancelled");
                    }
                    eprintln!("{message}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

/// How a failed request is reported to the user.
#[derive(Debug, PartialEq, Eq)]
enum Failure {
    /// Ctrl+C tore the session down; nothing is printed.
    Interrupted,
    Reported(String),
}

fn failure(err: &RequestError, classified: Option<String>, interrupted: bool) -> Failure {
    match classified {
        Some(message) => Failure::Reported(message),
        None if interrupted => Failure::Interrupted,
        // Silent to the library, but the command still has to explain itself.
        None => Failure::Reported(err.to_string()),
    }
}
