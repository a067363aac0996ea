//! Shared setup for commands: the session client and the credential store.

use anyhow::{Context, Result, bail};
use tracing::debug;

use budgeit_client::{ClientConfig, SessionClient};
use budgeit_core::traits::USER_CREDENTIALS_KEY;
use budgeit_core::models::User;
use budgeit_core::{ApiUrl, Credentials, SecureStore};

use crate::cli::Cli;
use crate::store::FileStore;

/// Everything a command needs to talk to the API.
pub struct AppContext {
    pub client: SessionClient,
    pub store: FileStore,
    /// Host of the API the client talks to.
    pub server: String,
    pub json: bool,
}

impl AppContext {
    pub fn new(cli: &Cli) -> Result<Self> {
        let url = ApiUrl::new(&cli.api_url).context("Invalid API URL")?;
        let server = url.host().unwrap_or_default().to_string();
        debug!(server = %server, "Using API server");

        let mut config = ClientConfig::new(url);
        if let Some(ref key) = cli.api_key {
            config = config.with_api_key(key);
        }

        let client = SessionClient::new(config).context("Failed to create client")?;

        let store = match cli.data_dir {
            Some(ref dir) => FileStore::new(dir)?,
            None => FileStore::open_default()?,
        };

        Ok(Self {
            client,
            store,
            server,
            json: cli.json,
        })
    }

    /// Credentials saved by `login --remember`.
    pub fn remembered(&self) -> Result<Option<Credentials>> {
        self.store
            .get(USER_CREDENTIALS_KEY)
            .context("Failed to read remembered credentials")
    }

    /// Establish a session by replaying remembered credentials.
    ///
    /// The session lives only as long as this process, so every command
    /// that needs one logs in again.
    pub async fn authenticate(&self) -> Result<User> {
        let credentials = self
            .remembered()?
            .context("Not logged in. Run 'budgeit login --remember' first.")?;

        debug!(email = credentials.email(), "Replaying remembered credentials");
        match self.client.login(&credentials).await {
            Ok(user) => Ok(user),
            Err(e) if e.status() == Some(401) => bail!(
                "Remembered credentials were rejected by {}. Run 'budgeit login --remember' again.",
                self.server
            ),
            Err(e) => Err(e).context("Failed to log in with remembered credentials"),
        }
    }
}
