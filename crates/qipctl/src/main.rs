// # qipctl - QIP command line client
//
// A THIN integration layer: read configuration, log in, run one command.
// All QIP logic lives in qip-core and qip-provision.
//
// ## Configuration
//
// Connection settings come from environment variables only, so credentials
// never show up in shell history or process listings:
//
// - `QIP_SERVER`: Base URL of the QIP server (http or https)
// - `QIP_ORG`: Organization name inside QIP
// - `QIP_USERNAME`: API user
// - `QIP_PASSWORD`: API password
// - `QIP_REQUEST_TIMEOUT`: Request timeout in seconds (default 20)
// - `QIP_LOG_LEVEL`: trace, debug, info, warn or error (default info)
//
// ## Example
//
// ```bash
// export QIP_SERVER=https://qip.example.com
// export QIP_ORG=Example
// export QIP_USERNAME=admin
// export QIP_PASSWORD=...
//
// qipctl address create --subnet 192.0.2.0 --name build-agent-01
// qipctl rr create --address 192.0.2.2 --name '*.apps' --domain int.example.com
// ```

mod cli;

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use qip_core::{Client, ClientConfig};
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;

/// Exit codes
///
/// - 0: Command succeeded
/// - 1: Configuration or startup error
/// - 2: Runtime error (login or command failed)
#[derive(Debug, Clone, Copy)]
enum QipExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<QipExitCode> for ExitCode {
    fn from(code: QipExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;

/// Application configuration
struct Config {
    server: String,
    org: String,
    username: String,
    /// ⚠️ NEVER log this value
    password: String,
    request_timeout_secs: u64,
    log_level: String,
}

fn required_var(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{} is required. Set it via: export {}=...", name, name))
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let request_timeout_secs = match env::var("QIP_REQUEST_TIMEOUT") {
            Ok(value) => value.trim().parse().with_context(|| {
                format!("QIP_REQUEST_TIMEOUT must be a number of seconds. Got: {}", value)
            })?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            server: required_var("QIP_SERVER")?,
            org: required_var("QIP_ORG")?,
            username: required_var("QIP_USERNAME")?,
            password: required_var("QIP_PASSWORD")?,
            request_timeout_secs,
            log_level: env::var("QIP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Field presence and the server URL are checked by
    /// `ClientConfig::validate`; this adds the CLI-level ranges.
    fn validate(&self) -> Result<()> {
        if !(1..=600).contains(&self.request_timeout_secs) {
            anyhow::bail!(
                "QIP_REQUEST_TIMEOUT must be between 1 and 600 seconds. Got: {}",
                self.request_timeout_secs
            );
        }

        if self.log_level().is_none() {
            anyhow::bail!(
                "QIP_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            );
        }

        self.client_config().validate()?;

        Ok(())
    }

    fn log_level(&self) -> Option<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }

    fn client_config(&self) -> ClientConfig {
        ClientConfig::new(
            self.server.as_str(),
            self.org.as_str(),
            self.username.as_str(),
            self.password.as_str(),
        )
        .with_request_timeout_secs(self.request_timeout_secs)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return QipExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return QipExitCode::ConfigError.into();
    }

    // Logs go to stderr, stdout carries the JSON result
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level().unwrap_or(Level::INFO))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return QipExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return QipExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run(cli, config).await {
            error!("{:#}", e);
            QipExitCode::RuntimeError
        } else {
            QipExitCode::Success
        }
    });

    result.into()
}

/// Log in and run the requested command
async fn run(cli: Cli, config: Config) -> Result<()> {
    let client = Client::from_config(&config.client_config())?;

    client
        .login(&config.username, &config.password)
        .await
        .with_context(|| format!("login to {} failed", config.server))?;

    cli::execute(cli.command, Arc::new(client)).await
}
