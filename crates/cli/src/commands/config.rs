//! Configuration file commands

use std::collections::BTreeMap;

use clap::Subcommand;
use mc_core::{Config, ConfigStore, Signature};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::Formatter;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write the default configuration if none exists
    Init,

    /// Print the configuration file path
    Path,

    /// Print the current configuration with secrets masked
    Show,
}

/// Host credentials with the secret key hidden
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MaskedHost {
    access_key: String,
    secret_key: String,
    signature: Signature,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigView {
    version: String,
    aliases: BTreeMap<String, String>,
    host_configs: BTreeMap<String, MaskedHost>,
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "*".repeat(8)
    }
}

impl From<Config> for ConfigView {
    fn from(config: Config) -> Self {
        Self {
            version: config.version,
            aliases: config.aliases,
            host_configs: config
                .host_configs
                .into_iter()
                .map(|(key, host)| {
                    let masked = MaskedHost {
                        secret_key: mask(&host.secret_key),
                        access_key: host.access_key,
                        signature: host.signature,
                    };
                    (key, masked)
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct InitOutput {
    path: String,
    created: bool,
}

/// Execute a config subcommand
pub fn execute(cmd: ConfigCommands, store: ConfigStore, formatter: &Formatter) -> ExitCode {
    let result = match cmd {
        ConfigCommands::Init => execute_init(&store, formatter),
        ConfigCommands::Path => {
            let path = store.config_path().display().to_string();
            formatter.report(&serde_json::json!({ "path": path }), &path);
            Ok(())
        }
        ConfigCommands::Show => store.load().map(|config| {
            // Same layout as the file, so both modes print JSON; quiet prints nothing
            formatter.json(&ConfigView::from(config));
        }),
    };

    match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}

fn execute_init(store: &ConfigStore, formatter: &Formatter) -> mc_core::Result<()> {
    let created = store.init()?;
    let path = store.config_path().display().to_string();

    if formatter.is_json() {
        formatter.json(&InitOutput { path, created });
    } else if created {
        formatter.success(&format!("Configuration written to {path}"));
    } else {
        formatter.println(&format!("Configuration already exists at {path}"));
    }
    Ok(())
}
