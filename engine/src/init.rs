//! Startup wiring: config -> store, directory, notifier -> controller.

use std::path::PathBuf;

use anyhow::{Context, Result};
use signoff_config::SignoffConfig;
use signoff_notify::{LogTransport, Notifier, SmtpMailer};
use signoff_store::RecordStore;

use crate::controller::WorkflowController;

impl WorkflowController {
    /// Build the controller the binary runs with.
    ///
    /// Storage problems are fatal. A bad `[smtp]` section is not: the
    /// workflow still runs and notifications fall back to the log.
    pub fn from_config(config: &SignoffConfig) -> Result<Self> {
        let db_path = database_path(config)?;
        let store = RecordStore::open(&db_path)
            .with_context(|| format!("Failed to open record store at {}", db_path.display()))?;

        let directory = config.client_directory();
        tracing::info!(clients = directory.len(), "Client directory loaded");

        Ok(Self::new(store, directory, build_notifier(config)))
    }
}

fn database_path(config: &SignoffConfig) -> Result<PathBuf> {
    config
        .database_path()
        .context("Cannot determine a database location: no home directory and no [app] database")
}

fn build_notifier(config: &SignoffConfig) -> Notifier {
    let settings = match config.smtp_settings() {
        Ok(Some(settings)) => settings,
        Ok(None) => {
            tracing::info!("No [smtp] section; approval notifications will be logged only");
            return Notifier::new(LogTransport);
        }
        Err(err) => {
            tracing::warn!("{err}; approval notifications will be logged only");
            return Notifier::new(LogTransport);
        }
    };

    match SmtpMailer::new(&settings) {
        Ok(mailer) => Notifier::new(mailer),
        Err(err) => {
            tracing::warn!("Failed to set up SMTP relay: {err}; notifications will be logged only");
            Notifier::new(LogTransport)
        }
    }
}
