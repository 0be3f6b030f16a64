pub mod client;
pub mod pooler;

use uuid::Uuid;

use crate::browser::{Browser, SystemBrowser};
use crate::config::{Config, Options};
use crate::console::{is_decline, Console, Terminal};
use crate::env_file::EnvFile;
use crate::error::{Error, Result};

pub use client::InstagresClient;
pub use pooler::with_pooler;

pub const CONSENT_QUESTION: &str =
    "Would you like an instant Postgres connection string from Neon (No signup required)? (Y/n): ";

/// How a provisioning run ended, short of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The key was already set; nothing was touched.
    Existing(String),
    /// A new connection string was obtained and saved.
    Provisioned(String),
    /// The user answered `n` to the prompt.
    Declined,
}

impl Outcome {
    pub fn connection_string(&self) -> Option<&str> {
        match self {
            Outcome::Existing(value) | Outcome::Provisioned(value) => Some(value),
            Outcome::Declined => None,
        }
    }

    pub fn is_declined(&self) -> bool {
        matches!(self, Outcome::Declined)
    }
}

/// Makes sure the configured env file holds a connection string, provisioning
/// one interactively on the terminal if it does not.
///
/// # Arguments
/// * `options` - Caller options; `source` must be non-empty
///
/// # Returns
/// * `Ok(Outcome::Existing(_))` - Key already set, no prompt or network activity
/// * `Ok(Outcome::Provisioned(_))` - New connection string saved to the env file
/// * `Ok(Outcome::Declined)` - User declined, env file untouched
/// * `Err(...)` - Invalid options, env file I/O failure, or poll limit reached
pub async fn instagres(options: Options) -> Result<Outcome> {
    let config = Config::resolve(options)?;
    Provisioner::new(config, Terminal, SystemBrowser).run().await
}

/// The provisioning flow with its terminal and browser supplied by the caller.
pub struct Provisioner<C, B> {
    config: Config,
    console: C,
    browser: B,
}

impl<C: Console, B: Browser> Provisioner<C, B> {
    pub fn new(config: Config, console: C, browser: B) -> Self {
        Self {
            config,
            console,
            browser,
        }
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    pub async fn run(&mut self) -> Result<Outcome> {
        let key = self.config.dot_env_key.clone();
        let mut env = EnvFile::load(&self.config.dot_env_file)?;

        if let Some(existing) = env.get_non_empty(&key) {
            tracing::debug!("{} already set in {:?}", key, env.path());
            return Ok(Outcome::Existing(existing.to_string()));
        }

        let file = env.path().display().to_string();
        self.console.say(&format!("{key} not found in {file}"));

        let answer = self
            .console
            .ask(CONSENT_QUESTION)
            .await
            .map_err(Error::Prompt)?;
        if is_decline(&answer) {
            self.console.say("No problem! You can set it up manually.");
            return Ok(Outcome::Declined);
        }

        let client = InstagresClient::new(&self.config)?;
        let id = Uuid::new_v4();
        let verification_url = client.verification_url(&id, &self.config.source);

        self.console.say("");
        self.console
            .say("A tab will open in your browser just to check you're not a bot.");
        self.console
            .say("(Nothing to do there, just return here when it's done.)");
        self.console.say("");
        self.console
            .say("Paste the link below in your browser if it doesn't open automatically:");
        self.console.say(verification_url.as_str());

        if let Err(e) = self.browser.open(verification_url.as_str()) {
            tracing::warn!("Failed to open browser: {}", e);
        }

        let mut connection_string = client.wait_for_connection_string(&id).await?;
        if self.config.with_pooler {
            connection_string = with_pooler(&connection_string);
        }

        self.console.say("");
        self.console.say("Here's your connection string:");
        self.console.say(&connection_string);

        env.set(key.as_str(), connection_string.as_str());
        env.save()?;
        tracing::info!("Saved {} to {:?}", key, env.path());
        self.console.say(&format!("Saved it to {file} as {key}"));

        Ok(Outcome::Provisioned(connection_string))
    }
}
