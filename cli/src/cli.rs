//! Command-line arguments.

use clap::{ArgAction, Parser, Subcommand};
use restwrap_core::{BodyEncoding, ClientConfig, Query, RequestSpec};
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(name = "restwrap", version, about = "Send one JSON request and print the decoded response")]
pub struct Cli {
    /// Prefix joined to every request path.
    #[arg(long, env = "RESTWRAP_BASE_URI", default_value = "")]
    pub base_uri: String,

    #[arg(long, env = "RESTWRAP_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Connect and send deadline in milliseconds (0 disables).
    #[arg(long, env = "RESTWRAP_REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: Option<u64>,

    /// Whole-attempt deadline in milliseconds (0 disables).
    #[arg(long, env = "RESTWRAP_RESPONSE_TIMEOUT_MS")]
    pub response_timeout_ms: Option<u64>,

    /// Extra attempts after a connection failure or timeout.
    #[arg(long, env = "RESTWRAP_RETRIES")]
    pub retries: Option<u32>,

    /// Base delay between attempts in milliseconds, doubled each retry.
    #[arg(long, env = "RESTWRAP_RETRY_BACKOFF_MS")]
    pub retry_backoff_ms: Option<u64>,

    /// Send bodies as application/x-www-form-urlencoded.
    #[arg(long)]
    pub form: bool,

    /// Extra header, repeatable.
    #[arg(short = 'H', long = "header", value_name = "NAME=VALUE", value_parser = parse_pair)]
    pub headers: Vec<(String, String)>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// GET a path, optionally with query parameters.
    Get {
        path: String,
        #[arg(short, long = "query", value_name = "KEY=VALUE", value_parser = parse_pair)]
        query: Vec<(String, String)>,
    },
    /// POST a JSON body.
    Post {
        path: String,
        #[arg(short, long, value_name = "JSON", value_parser = parse_json)]
        data: Option<Value>,
    },
    /// PUT a JSON body.
    Put {
        path: String,
        #[arg(short, long, value_name = "JSON", value_parser = parse_json)]
        data: Option<Value>,
    },
}

impl Cli {
    /// Client configuration with unset options left at their defaults.
    pub fn config(&self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            base_uri: self.base_uri.clone(),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            request_timeout_ms: self.request_timeout_ms.unwrap_or(defaults.request_timeout_ms),
            response_timeout_ms: self.response_timeout_ms.unwrap_or(defaults.response_timeout_ms),
            retry_count: self.retries.unwrap_or(defaults.retry_count),
            retry_backoff_ms: self.retry_backoff_ms.unwrap_or(defaults.retry_backoff_ms),
            body_encoding: if self.form { BodyEncoding::Form } else { BodyEncoding::Json },
            default_headers: self.headers.iter().cloned().collect(),
        }
    }

    pub fn request(&self) -> RequestSpec {
        match &self.command {
            Command::Get { path, query } => {
                let query: Query = query.iter().cloned().collect();
                RequestSpec::get(path.as_str(), (!query.is_empty()).then_some(query))
            }
            Command::Post { path, data } => RequestSpec::post(path.as_str(), data.clone()),
            Command::Put { path, data } => RequestSpec::put(path.as_str(), data.clone()),
        }
    }
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    if key.is_empty() {
        return Err(format!("empty key in {s:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_json(s: &str) -> Result<Value, String> {
    serde_json::from_str(s).map_err(|e| format!("invalid JSON: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use restwrap_core::HttpMethod;
    use serde_json::json;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("restwrap").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn unset_options_use_defaults() {
        let cli = parse(&["get", "items"]);
        let config = cli.config();
        let defaults = ClientConfig::default();
        assert_eq!(config.request_timeout_ms, defaults.request_timeout_ms);
        assert_eq!(config.retry_count, defaults.retry_count);
        assert_eq!(config.body_encoding, BodyEncoding::Json);
    }

    #[test]
    fn options_override_defaults() {
        let cli = parse(&[
            "--base-uri",
            "http://host",
            "--retries",
            "0",
            "--response-timeout-ms",
            "5",
            "--form",
            "-H",
            "x-api=1",
            "post",
            "items",
            "-d",
            r#"{"a":1}"#,
        ]);
        let config = cli.config();
        assert_eq!(config.base_uri, "http://host");
        assert_eq!(config.retry_count, 0);
        assert_eq!(config.response_timeout_ms, 5);
        assert_eq!(config.body_encoding, BodyEncoding::Form);
        assert_eq!(config.default_headers.get("x-api").map(String::as_str), Some("1"));

        let spec = cli.request();
        assert_eq!(spec.method(), HttpMethod::Post);
        assert_eq!(spec.body(), Some(&json!({"a": 1})));
    }

    #[test]
    fn get_collects_query_pairs() {
        let spec = parse(&["get", "search", "-q", "q=rust", "-q", "page=2"]).request();
        assert_eq!(spec.method(), HttpMethod::Get);
        let query = spec.query().unwrap();
        assert_eq!(query.get("q").map(String::as_str), Some("rust"));
        assert_eq!(query.get("page").map(String::as_str), Some("2"));
    }

    #[test]
    fn get_without_query_sends_none() {
        assert!(parse(&["get", "items"]).request().query().is_none());
    }

    #[test]
    fn rejects_malformed_pairs_and_json() {
        assert!(Cli::try_parse_from(["restwrap", "get", "x", "-q", "novalue"]).is_err());
        assert!(Cli::try_parse_from(["restwrap", "put", "x", "-d", "{nope"]).is_err());
    }
}
