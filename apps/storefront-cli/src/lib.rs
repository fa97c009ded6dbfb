//! # Storefront CLI Library
//!
//! Command-line host for the storefront session core. It owns startup the
//! way a UI shell would: load configuration, open the session store, await
//! `initialize()`, then run exactly one command.
//!
//! ## Module Organization
//! ```text
//! storefront_cli/
//! ├── lib.rs          ◄─── You are here (argument parsing & run)
//! ├── state.rs        ◄─── AppState: store + AuthContext
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── session.rs  ◄─── status / login / signup / logout
//! │   └── config.rs   ◄─── Effective configuration
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Output
//! Successful commands print pretty JSON on stdout. Failures print an
//! [`ApiError`] as JSON on stderr and exit with status 1. Logs also go to
//! stderr so stdout stays machine-readable.

pub mod commands;
pub mod error;
pub mod state;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use storefront_session::{SessionConfig, SignupRequest};
use tracing::info;
use tracing::Subscriber;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "storefront", about = "Storefront session client", version)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "STOREFRONT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Identity service base URL, overriding config and environment
    #[arg(long, global = true)]
    pub identity_url: Option<String>,

    /// Session database file, overriding config and environment
    #[arg(long, global = true)]
    pub session_db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the current session
    Status,
    /// Log in and print the landing route for the user's role
    Login {
        username: String,
        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account (does not log in)
    Signup(SignupArgs),
    /// End the session
    Logout,
    /// Print the effective configuration
    Config,
}

#[derive(Args, Debug)]
pub struct SignupArgs {
    pub username: String,
    #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone_number: String,
    #[arg(long)]
    pub address: String,
}

impl From<SignupArgs> for SignupRequest {
    fn from(args: SignupArgs) -> Self {
        SignupRequest {
            username: args.username,
            password: args.password,
            email: args.email,
            phone_number: args.phone_number,
            address: args.address,
        }
    }
}

impl Cli {
    /// Loads the session config and applies command-line overrides on top.
    pub fn session_config(&self) -> Result<SessionConfig, ApiError> {
        let mut config = SessionConfig::load(self.config.clone())?;
        if let Some(url) = &self.identity_url {
            config.identity.base_url = url.clone();
        }
        if let Some(path) = &self.session_db {
            config.storage.path = Some(path.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Run
// =============================================================================

/// Runs the CLI.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       CLI Startup                                       │
/// │                                                                         │
/// │  1. Parse arguments                                                    │
/// │  2. Initialize logging (stderr, RUST_LOG aware)                        │
/// │  3. Load SessionConfig: file ─► environment ─► flags                   │
/// │  4. Open SqliteStore, build HttpAuthService + AuthContext              │
/// │  5. Await initialize() (restores any persisted session)                │
/// │  6. Run the command, print JSON                                        │
/// │  7. Close the store                                                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match execute(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err.to_json());
            ExitCode::FAILURE
        }
    }
}

/// Runs one parsed command and returns its JSON output.
pub async fn execute(cli: Cli) -> Result<String, ApiError> {
    let config = cli.session_config()?;

    if let Command::Config = cli.command {
        return render(&commands::config::get_config(&config, cli.config.clone()));
    }

    info!(identity_url = %config.base_url(), "Starting storefront session");
    let state = AppState::open(&config).await?;
    let output = run_command(&state, cli.command).await;
    state.close().await;
    output
}

async fn run_command(state: &AppState, command: Command) -> Result<String, ApiError> {
    use commands::session;

    match command {
        Command::Status => render(&session::status(&state.auth)),
        Command::Login { username, password } => {
            render(&session::login(&state.auth, username, password).await?)
        }
        Command::Signup(args) => render(&session::signup(&state.auth, args.into()).await?),
        Command::Logout => render(&session::logout(&state.auth).await?),
        Command::Config => Err(ApiError::internal("config is handled before startup")),
    }
}

fn render<T: Serialize>(value: &T) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn,storefront=debug,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront=trace` - Show trace for storefront crates only
/// - Default: warnings, plus debug for storefront crates
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    log_subscriber(filter).init();
}

/// Formatter writing to stderr, gated only by `filter`.
fn log_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login() {
        let cli = Cli::try_parse_from([
            "storefront",
            "login",
            "alice",
            "--password",
            "secret",
            "--identity-url",
            "https://identity.example.com",
        ])
        .unwrap();

        assert_eq!(cli.identity_url.as_deref(), Some("https://identity.example.com"));
        match cli.command {
            Command::Login { username, password } => {
                assert_eq!(username, "alice");
                assert_eq!(password, "secret");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_signup() {
        let cli = Cli::try_parse_from([
            "storefront",
            "signup",
            "bob",
            "--password",
            "hunter22",
            "--email",
            "bob@example.com",
            "--phone-number",
            "555-0100",
            "--address",
            "1 Main St",
        ])
        .unwrap();

        let Command::Signup(args) = cli.command else {
            panic!("expected signup");
        };
        let request = SignupRequest::from(args);
        assert_eq!(request.phone_number, "555-0100");
        assert_eq!(request.address, "1 Main St");
    }

    #[test]
    fn test_signup_requires_all_fields() {
        assert!(Cli::try_parse_from(["storefront", "signup", "bob", "--password", "x"]).is_err());
    }

    #[test]
    fn test_default_log_filter_is_honoured() {
        use tracing::Level;

        let subscriber = log_subscriber(EnvFilter::new(DEFAULT_LOG_FILTER));
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "storefront_session::controller", Level::DEBUG));
            assert!(!tracing::enabled!(target: "storefront_session::controller", Level::TRACE));
            assert!(tracing::enabled!(target: "sqlx::query", Level::WARN));
            assert!(!tracing::enabled!(target: "sqlx::query", Level::DEBUG));
            assert!(!tracing::enabled!(target: "hyper_util::client", Level::TRACE));
            assert!(!tracing::enabled!(target: "hyper_util::client", Level::INFO));
        });
    }

    #[tokio::test]
    async fn test_status_round_trip_against_file_store() {
        let dir = std::env::temp_dir().join(format!("storefront-cli-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let db = dir.join("session.db");
        let db_arg = db.to_string_lossy().into_owned();
        let config_path = dir.join("missing.toml");
        let config_arg = config_path.to_string_lossy().into_owned();

        let cli = Cli::try_parse_from([
            "storefront",
            "--config",
            config_arg.as_str(),
            "--session-db",
            db_arg.as_str(),
            "status",
        ])
        .unwrap();
        let output = execute(cli).await.unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["isInitialized"], true);
        assert_eq!(json["isAuthenticated"], false);
        assert!(db.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_invalid_identity_url_is_config_error() {
        let cli = Cli::try_parse_from([
            "storefront",
            "--config",
            "/nonexistent/storefront/session.toml",
            "--identity-url",
            "ftp://identity.example.com",
            "config",
        ])
        .unwrap();

        let err = execute(cli).await.unwrap_err();
        assert_eq!(err.code, error::ErrorCode::ConfigError);
    }
}
