//! CLI command implementations.

pub(crate) mod auth;
pub(crate) mod call;
pub(crate) mod credentials;
pub(crate) mod diary;
pub(crate) mod foods;
pub(crate) mod profile;
pub(crate) mod recipes;
pub(crate) mod status;

use std::path::PathBuf;

use clap::Args;
use larder_api::FatSecretClient;
use larder_config::{CliSettings, Config};
use larder_oauth::oauth::TokenExchange;
use larder_oauth::{CredentialStore, HttpExecutor};
use tracing::info;

use crate::error::CliError;

pub(crate) use auth::AuthCommand;
pub(crate) use call::CallArgs;
pub(crate) use credentials::CredentialsCommand;
pub(crate) use diary::DiaryCommand;
pub(crate) use foods::FoodsCommand;
pub(crate) use recipes::RecipesCommand;

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover larder.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Credential file (overrides config).
    #[arg(long, global = true, env = "LARDER_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// Default consumer key when the credential file has none.
    #[arg(long, global = true, env = "FATSECRET_CONSUMER_KEY", hide_env_values = true)]
    consumer_key: Option<String>,

    /// Default consumer secret when the credential file has none.
    #[arg(long, global = true, env = "FATSECRET_CONSUMER_SECRET", hide_env_values = true)]
    consumer_secret: Option<String>,

    /// HTTP timeout in seconds, 0 for none (overrides config).
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Load configuration with CLI overrides applied.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let settings = CliSettings {
            credentials_path: self.credentials.clone(),
            consumer_key: self.consumer_key.clone(),
            consumer_secret: self.consumer_secret.clone(),
            timeout_secs: self.timeout,
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

/// Everything a command needs, built once per invocation.
pub(crate) struct Context {
    pub config: Config,
    pub store: CredentialStore,
    pub executor: HttpExecutor,
}

impl Context {
    pub(crate) fn new(args: &GlobalArgs) -> Result<Self, CliError> {
        let config = args.load_config()?;
        info!(
            config = ?config.config_path,
            credentials = %config.credentials_resolved.path.display(),
            "Loaded configuration"
        );
        let store = CredentialStore::from_config(&config.credentials_resolved);
        let executor = HttpExecutor::new(config.http.timeout());
        Ok(Self {
            config,
            store,
            executor,
        })
    }

    pub(crate) fn token_exchange(&self) -> TokenExchange<'_> {
        TokenExchange::new(&self.executor, &self.config.provider)
    }

    pub(crate) fn api_client(&self) -> FatSecretClient {
        FatSecretClient::new(
            self.executor.clone(),
            &self.config.provider.api_url,
            self.store.clone(),
        )
    }
}
