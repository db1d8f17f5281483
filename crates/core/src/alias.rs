//! Alias management
//!
//! Aliases are short names bound to S3-compatible endpoint URLs. A typed
//! identifier such as `play:bucket/key` is expanded by looking up the part
//! before the first `:` in the alias map.

use std::collections::BTreeMap;

use crate::config::{new_default_config, Config, ConfigStore, HostConfig};
use crate::error::{Error, Result};

/// Alias name to endpoint URL
pub type AliasMap = BTreeMap<String, String>;

/// Names of built-in commands; an alias may not shadow any of them
pub const RESERVED_COMMANDS: &[&str] = &[
    "access",
    "alias",
    "cat",
    "completions",
    "config",
    "cp",
    "diff",
    "help",
    "ls",
    "mb",
    "sync",
    "update",
    "version",
];

/// Check if a string is a valid alias name
///
/// A valid name starts with an ASCII letter, continues with letters, digits,
/// or hyphens, and is not a reserved command name.
pub fn is_valid_alias_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !RESERVED_COMMANDS.contains(&name)
}

/// Expand an `alias:path` identifier into a URL
///
/// Identifiers without a `:`, or whose prefix is not a known alias, are
/// returned unchanged. Unusable results are rejected later by whoever
/// dials the URL.
pub fn alias_expand(identifier: &str, aliases: &AliasMap) -> String {
    let Some((prefix, rest)) = identifier.split_once(':') else {
        return identifier.to_string();
    };

    match aliases.get(prefix) {
        Some(endpoint) => format!(
            "{}/{}",
            endpoint.trim_end_matches('/'),
            rest.trim_start_matches('/')
        ),
        None => identifier.to_string(),
    }
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = url::Url::parse(endpoint)
        .map_err(|e| Error::InvalidUrl(format!("{endpoint}: {e}")))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(()),
        _ => Err(Error::InvalidUrl(format!(
            "{endpoint}: expected an http or https URL"
        ))),
    }
}

/// Manager for alias operations
#[derive(Debug, Clone)]
pub struct AliasManager {
    store: ConfigStore,
}

impl AliasManager {
    /// Create a new AliasManager with a specific ConfigStore
    pub fn with_store(store: ConfigStore) -> Self {
        Self { store }
    }

    /// Create a new AliasManager using the default config location
    pub fn new() -> Result<Self> {
        Ok(Self {
            store: ConfigStore::new()?,
        })
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    fn load(&self) -> Result<Config> {
        match self.store.load() {
            Err(Error::ConfigNotFound(path)) => {
                tracing::warn!(path = %path.display(), "No configuration found, using defaults");
                Ok(new_default_config())
            }
            other => other,
        }
    }

    /// List all configured aliases as (name, endpoint) pairs, sorted by name
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        Ok(self.load()?.aliases.into_iter().collect())
    }

    /// Get the endpoint of an alias
    pub fn get(&self, name: &str) -> Result<String> {
        self.load()?
            .aliases
            .remove(name)
            .ok_or_else(|| Error::AliasNotFound(name.to_string()))
    }

    /// Add or update an alias
    pub fn set(&self, name: &str, endpoint: &str) -> Result<()> {
        self.set_with_host(name, endpoint, None)
    }

    /// Add or update an alias and, when given, its credentials in one write
    pub fn set_with_host(
        &self,
        name: &str,
        endpoint: &str,
        host: Option<HostConfig>,
    ) -> Result<()> {
        if !is_valid_alias_name(name) {
            return Err(Error::InvalidAliasName(name.to_string()));
        }
        validate_endpoint(endpoint)?;

        let mut config = self.load()?;
        config.aliases.insert(name.to_string(), endpoint.to_string());
        if let Some(host) = host {
            config.host_configs.insert(name.to_string(), host);
        }
        tracing::debug!(alias = name, endpoint, "Setting alias");

        self.store.save(&config)
    }

    /// Store credentials for an alias or raw host
    pub fn set_host_config(&self, key: &str, host: HostConfig) -> Result<()> {
        let mut config = self.load()?;
        config.host_configs.insert(key.to_string(), host);
        self.store.save(&config)
    }

    /// Credentials stored for an alias or raw host
    pub fn host_config(&self, key: &str) -> Result<Option<HostConfig>> {
        Ok(self.load()?.host_configs.remove(key))
    }

    /// Remove an alias along with its credentials
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.load()?;

        if config.aliases.remove(name).is_none() {
            return Err(Error::AliasNotFound(name.to_string()));
        }
        config.host_configs.remove(name);

        self.store.save(&config)
    }

    /// Expand an identifier against the configured aliases
    pub fn resolve(&self, identifier: &str) -> Result<String> {
        Ok(alias_expand(identifier, &self.load()?.aliases))
    }
}
