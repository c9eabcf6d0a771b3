//! Command-line interface for `jira-fetch`.
//!
//! Each subcommand maps onto one fetcher method and prints the aggregated
//! result as JSON on stdout.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::{info, warn};

use crate::api::auth::{self, Auth};
use crate::api::{JiraApiFetcher, JiraConnection, QueryParams};
use crate::config::Config;
use crate::error::{AppError, Result};

/// Endpoint used by `issues` when none is given.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "rest/api/2/search";

#[derive(Debug, Parser)]
#[command(
    name = "jira-fetch",
    version,
    about = "Fetch and aggregate JIRA REST API results as JSON"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection and output options shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Path to the configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Profile to use from the configuration file
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// JIRA base URL, overrides the profile
    #[arg(long, env = "JIRA_URL", global = true)]
    pub url: Option<String>,

    /// Account email, overrides the profile
    #[arg(long, env = "JIRA_EMAIL", global = true)]
    pub email: Option<String>,

    /// API token; defaults to the keyring entry of the profile
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,

    /// Mirror debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch an endpoint that returns a plain JSON array
    Array {
        /// Endpoint path, e.g. rest/api/3/resolution
        endpoint: String,

        /// Extra query parameters as a JSON object
        #[arg(long, value_name = "JSON")]
        params: Option<String>,
    },

    /// Fetch every page of an offset-paginated endpoint
    Paginated {
        /// Endpoint path, e.g. rest/api/3/statuses/search
        endpoint: String,

        /// Key holding each page's results
        #[arg(long, value_name = "KEY")]
        key: Option<String>,

        /// Extra query parameters as a JSON object
        #[arg(long, value_name = "JSON")]
        params: Option<String>,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Fetch issues matching a JQL query
    Issues {
        /// Search endpoint
        #[arg(default_value = DEFAULT_SEARCH_ENDPOINT)]
        endpoint: String,

        /// Comma-separated fields to return, e.g. summary,status
        #[arg(long)]
        fields: Option<String>,

        /// JQL filter
        #[arg(long)]
        jql: Option<String>,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Manage API tokens stored in the OS keyring
    Token {
        #[command(subcommand)]
        action: TokenCommand,
    },
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct PagingArgs {
    /// Results requested per page
    #[arg(long, value_name = "N")]
    pub page_size: Option<u32>,

    /// Stop after this many results
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Store a token for a profile
    Set {
        /// Profile name
        #[arg(value_name = "PROFILE")]
        name: String,
        /// API token to store
        #[arg(value_name = "TOKEN")]
        value: String,
    },
    /// Delete the token stored for a profile
    Delete {
        /// Profile name
        #[arg(value_name = "PROFILE")]
        name: String,
    },
}

/// Run a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.global.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let items = match cli.command {
        Command::Token { action } => return run_token(action, &config),
        Command::Array { endpoint, params } => {
            let params = match params.as_deref() {
                Some(json) => QueryParams::from_json_str(json)?,
                None => QueryParams::new(),
            };
            fetcher(&cli.global, &config, None)?
                .fetch_array_with(&endpoint, &params)
                .await?
        }
        Command::Paginated {
            endpoint,
            key,
            params,
            paging,
        } => {
            fetcher(&cli.global, &config, paging.limit)?
                .fetch_paginated(
                    &endpoint,
                    key.as_deref(),
                    params.as_deref(),
                    page_size(paging, &config),
                )
                .await?
        }
        Command::Issues {
            endpoint,
            fields,
            jql,
            paging,
        } => {
            fetcher(&cli.global, &config, paging.limit)?
                .fetch_issues(
                    &endpoint,
                    fields.as_deref(),
                    jql.as_deref(),
                    page_size(paging, &config),
                )
                .await?
        }
    };

    info!(items = items.len(), "Fetch complete");
    write_json(&mut io::stdout().lock(), &items, cli.global.compact)
}

fn run_token(action: TokenCommand, config: &Config) -> Result<()> {
    match action {
        TokenCommand::Set { name, value } => {
            if config.profile(&name).is_err() {
                warn!("Storing token for profile '{}' which is not configured", name);
            }
            auth::store_token(&name, &value)?;
            eprintln!("Token stored for profile '{}'", name);
        }
        TokenCommand::Delete { name } => {
            auth::delete_token(&name)?;
            eprintln!("Token deleted for profile '{}'", name);
        }
    }
    Ok(())
}

fn page_size(paging: PagingArgs, config: &Config) -> u32 {
    paging.page_size.unwrap_or(config.settings.page_size)
}

fn fetcher(args: &GlobalArgs, config: &Config, limit: Option<usize>) -> Result<JiraApiFetcher> {
    let connection = resolve_connection(args, config)?;
    Ok(JiraApiFetcher::new(connection).with_max_items(limit.or(config.settings.max_items)))
}

/// Build a connection from command-line overrides and the selected profile.
///
/// `--url`/`--email`/`--token` win over the profile. Without `--token` the
/// profile's keyring entry is used.
pub fn resolve_connection(args: &GlobalArgs, config: &Config) -> Result<JiraConnection> {
    let profile = config.select_profile(args.profile.as_deref())?;

    let url = args
        .url
        .clone()
        .or_else(|| profile.map(|p| p.url.clone()))
        .ok_or_else(|| AppError::other("No JIRA URL configured. Pass --url, set JIRA_URL, or add a profile."))?;

    let email = args
        .email
        .clone()
        .or_else(|| profile.map(|p| p.email.clone()))
        .ok_or_else(|| AppError::other("No account email configured. Pass --email, set JIRA_EMAIL, or add a profile."))?;

    let auth = match (&args.token, profile) {
        (Some(token), _) => Auth::new(&email, token),
        (None, Some(profile)) => Auth::from_keyring(&profile.name, &email)?,
        (None, None) => {
            return Err(AppError::other(
                "No API token available. Pass --token or set JIRA_API_TOKEN.",
            ))
        }
    };

    Ok(JiraConnection::with_auth(
        &url,
        auth,
        config.settings.timeout_secs,
    )?)
}

/// Write items as JSON followed by a newline.
pub fn write_json<W: Write>(out: &mut W, items: &[Value], compact: bool) -> Result<()> {
    if compact {
        serde_json::to_writer(&mut *out, items).map_err(io::Error::from)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, items).map_err(io::Error::from)?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;
    use clap::CommandFactory;
    use serde_json::json;
    use serial_test::serial;

    fn config_with_profile() -> Config {
        Config {
            profiles: vec![Profile::new(
                "work".to_string(),
                "https://company.atlassian.net".to_string(),
                "user@company.com".to_string(),
            )],
            ..Config::default()
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_issues_defaults_endpoint() {
        let cli = Cli::try_parse_from(["jira-fetch", "issues", "--jql", "project = FOO"]).unwrap();
        match cli.command {
            Command::Issues { endpoint, jql, .. } => {
                assert_eq!(endpoint, DEFAULT_SEARCH_ENDPOINT);
                assert_eq!(jql.as_deref(), Some("project = FOO"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_paginated_options() {
        let cli = Cli::try_parse_from([
            "jira-fetch",
            "paginated",
            "rest/agile/1.0/board",
            "--key",
            "values",
            "--params",
            r#"{"type":"scrum"}"#,
            "--page-size",
            "10",
            "--limit",
            "25",
        ])
        .unwrap();
        match cli.command {
            Command::Paginated { key, params, paging, .. } => {
                assert_eq!(key.as_deref(), Some("values"));
                assert_eq!(params.as_deref(), Some(r#"{"type":"scrum"}"#));
                assert_eq!(paging.page_size, Some(10));
                assert_eq!(paging.limit, Some(25));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_token_read_from_environment() {
        std::env::set_var("JIRA_API_TOKEN", "env-token");
        let parsed = Cli::try_parse_from(["jira-fetch", "array", "rest/api/3/resolution"]);
        std::env::remove_var("JIRA_API_TOKEN");

        let cli = parsed.unwrap();
        assert_eq!(cli.global.token.as_deref(), Some("env-token"));
    }

    #[test]
    #[serial]
    fn test_flag_overrides_environment() {
        std::env::set_var("JIRA_URL", "https://env.atlassian.net");
        let parsed = Cli::try_parse_from([
            "jira-fetch",
            "--url",
            "https://flag.atlassian.net",
            "array",
            "rest/api/3/resolution",
        ]);
        std::env::remove_var("JIRA_URL");

        let cli = parsed.unwrap();
        assert_eq!(cli.global.url.as_deref(), Some("https://flag.atlassian.net"));
    }

    #[test]
    fn test_parse_token_set() {
        let cli = Cli::try_parse_from(["jira-fetch", "token", "set", "work", "secret"]).unwrap();
        match cli.command {
            Command::Token {
                action: TokenCommand::Set { name, value },
            } => {
                assert_eq!(name, "work");
                assert_eq!(value, "secret");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_page_size_falls_back_to_settings() {
        let config = Config::default();
        assert_eq!(page_size(PagingArgs::default(), &config), 50);
        let paging = PagingArgs {
            page_size: Some(7),
            limit: None,
        };
        assert_eq!(page_size(paging, &config), 7);
    }

    #[test]
    fn test_resolve_connection_from_profile_with_token() {
        let args = GlobalArgs {
            token: Some("token".to_string()),
            ..GlobalArgs::default()
        };
        let conn = resolve_connection(&args, &config_with_profile()).unwrap();
        assert_eq!(conn.base_url(), "https://company.atlassian.net");
        assert_eq!(conn.username(), "user@company.com");
    }

    #[test]
    fn test_resolve_connection_overrides_win() {
        let args = GlobalArgs {
            url: Some("https://other.atlassian.net/".to_string()),
            email: Some("other@example.com".to_string()),
            token: Some("token".to_string()),
            ..GlobalArgs::default()
        };
        let conn = resolve_connection(&args, &config_with_profile()).unwrap();
        assert_eq!(conn.base_url(), "https://other.atlassian.net");
        assert_eq!(conn.username(), "other@example.com");
    }

    #[test]
    fn test_resolve_connection_without_url() {
        let args = GlobalArgs {
            token: Some("token".to_string()),
            ..GlobalArgs::default()
        };
        let err = resolve_connection(&args, &Config::default()).unwrap_err();
        assert!(err.user_message().contains("No JIRA URL"));
    }

    #[test]
    fn test_resolve_connection_without_token_or_profile() {
        let args = GlobalArgs {
            url: Some("https://company.atlassian.net".to_string()),
            email: Some("user@company.com".to_string()),
            ..GlobalArgs::default()
        };
        let err = resolve_connection(&args, &Config::default()).unwrap_err();
        assert!(err.user_message().contains("No API token"));
    }

    #[test]
    fn test_resolve_connection_unknown_profile() {
        let args = GlobalArgs {
            profile: Some("missing".to_string()),
            ..GlobalArgs::default()
        };
        let err = resolve_connection(&args, &config_with_profile()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_write_json_compact() {
        let mut out = Vec::new();
        write_json(&mut out, &[json!({"id": 1}), json!({"id": 2})], true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[{\"id\":1},{\"id\":2}]\n");
    }

    #[test]
    fn test_write_json_pretty() {
        let mut out = Vec::new();
        write_json(&mut out, &[json!({"id": 1})], false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\n  {"));
        assert!(text.ends_with("]\n"));
    }
}
