//! Session wiring: token file, client and expiry notice.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;

use verigov_core::{ApiUrl, SessionEvent, Subscription, TokenStore};
use verigov_file::FileTokenStore;
use verigov_http::{ClientConfig, VerigovClient};

use crate::cli::BackendArgs;
use crate::output;

/// A client bound to the CLI's token file.
pub struct CliSession {
    client: VerigovClient,
    store: Arc<FileTokenStore>,
    _expiry: Subscription,
}

impl CliSession {
    /// Open the token file and build a client for the configured backend.
    pub fn open(backend: &BackendArgs) -> Result<Self> {
        let api_url = ApiUrl::new(&backend.api_url).context("Invalid API URL")?;
        let path = token_path(backend)?;

        let store = FileTokenStore::open(&path).with_context(|| {
            format!(
                "Failed to read session file {}. Remove it or run 'verigov auth login'.",
                path.display()
            )
        })?;
        let store = Arc::new(store);

        let config = ClientConfig::new(api_url)
            .with_user_agent(format!("verigov-cli/{}", env!("VERIGOV_VERSION")));
        let client =
            VerigovClient::new(config, store.clone()).context("Failed to create HTTP client")?;

        let expiry = client.events().subscribe(|event| match event {
            SessionEvent::Expired => {
                output::warning("Session expired, log in again with 'verigov auth login'")
            }
        });

        Ok(Self {
            client,
            store,
            _expiry: expiry,
        })
    }

    pub fn client(&self) -> &VerigovClient {
        &self.client
    }

    pub fn token_file(&self) -> &std::path::Path {
        self.store.path()
    }

    /// Fail early when no session is stored.
    pub fn require_login(&self) -> Result<()> {
        if !self.store.is_authenticated() {
            bail!("No active session. Run 'verigov auth login' first.");
        }
        Ok(())
    }
}

/// Resolve the session file path.
fn token_path(backend: &BackendArgs) -> Result<PathBuf> {
    if let Some(path) = &backend.token_file {
        return Ok(path.clone());
    }

    let dirs =
        ProjectDirs::from("", "", "verigov").context("Could not determine data directory")?;

    Ok(dirs.data_dir().join("session.json"))
}
