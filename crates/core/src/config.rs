//! Configuration management
//!
//! This module handles locating, loading, saving, and migrating the mc
//! configuration file. The configuration is stored as JSON at
//! `~/.mc/config.json` (`~/mc/config.json` on Windows).
//!
//! PROTECTED FILE: Changes to CONFIG_VERSION require migration support.

use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::alias::{is_valid_alias_name, AliasMap};
use crate::error::{Error, Result};

/// Current configuration schema version
///
/// IMPORTANT: Bumping this version requires:
/// 1. Keeping the previous shape as a legacy struct
/// 2. Adding a migration from it, dispatched from `load`
/// 3. Updating migration tests
pub const CONFIG_VERSION: &str = "2.0.0";

/// Schema version of the original layout (`hosts` with long key names)
const LEGACY_VERSION_V1: &str = "1.0.0";

#[cfg(not(windows))]
const CONFIG_DIR_NAME: &str = ".mc";
#[cfg(windows)]
const CONFIG_DIR_NAME: &str = "mc";

const CONFIG_FILE_NAME: &str = "config.json";

/// Aliases seeded into a freshly created configuration
const DEFAULT_ALIASES: [(&str, &str); 3] = [
    ("s3", "https://s3.amazonaws.com"),
    ("play", "http://play.minio.io:9000"),
    ("localhost", "http://localhost:9000"),
];

/// Request signature style used for a host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signature {
    #[default]
    S3v4,
    S3v2,
}

/// Credentials and connection attributes for one endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HostConfig {
    pub access_key: String,
    pub secret_key: String,
    #[serde(default)]
    pub signature: Signature,
}

impl HostConfig {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            signature: Signature::default(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Schema version tag
    pub version: String,

    /// Alias name to endpoint URL
    #[serde(default)]
    pub aliases: AliasMap,

    /// Alias name (or raw host) to credentials
    #[serde(default)]
    pub host_configs: BTreeMap<String, HostConfig>,
}

impl Config {
    /// An empty configuration at the current version
    pub fn empty() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            aliases: AliasMap::new(),
            host_configs: BTreeMap::new(),
        }
    }
}

/// Build a configuration at the current version with the default aliases
pub fn new_default_config() -> Config {
    let mut config = Config::empty();
    config.aliases = DEFAULT_ALIASES
        .iter()
        .map(|(name, url)| (name.to_string(), url.to_string()))
        .collect();
    config
}

/// Config file layout at version 1.0.0
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigV1 {
    #[allow(dead_code)]
    version: String,
    #[serde(default)]
    aliases: AliasMap,
    #[serde(default)]
    hosts: BTreeMap<String, HostConfigV1>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct HostConfigV1 {
    #[serde(default)]
    access_key_id: String,
    #[serde(default)]
    secret_access_key: String,
}

/// Move a 1.0.0 document into the current shape
fn migrate_v1(old: ConfigV1) -> Config {
    let host_configs = old
        .hosts
        .into_iter()
        .map(|(host, creds)| {
            (
                host,
                HostConfig::new(creds.access_key_id, creds.secret_access_key),
            )
        })
        .collect();

    Config {
        version: CONFIG_VERSION.to_string(),
        aliases: old.aliases,
        host_configs,
    }
}

/// Source of the current user's home directory
#[cfg_attr(test, mockall::automock)]
pub trait HomeDirProvider {
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Home directory lookup backed by the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHomeDir;

impl HomeDirProvider for SystemHomeDir {
    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

/// Resolve the configuration directory using the given home lookup
pub fn resolve_config_dir_with(home: &dyn HomeDirProvider) -> Result<PathBuf> {
    let home = home.home_dir().ok_or(Error::HomeDirUnavailable)?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Resolve the configuration directory of the current user
pub fn resolve_config_dir() -> Result<PathBuf> {
    let dir = resolve_config_dir_with(&SystemHomeDir)?;
    tracing::debug!(dir = %dir.display(), "Resolved config directory");
    Ok(dir)
}

/// Resolve the configuration file path of the current user
pub fn resolve_config_path() -> Result<PathBuf> {
    Ok(resolve_config_dir()?.join(CONFIG_FILE_NAME))
}

fn parse_error(path: &Path, reason: impl ToString) -> Error {
    Error::ConfigParse {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Load configuration from disk, migrating older versions
pub fn load(path: &Path) -> Result<Config> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut document: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| parse_error(path, e))?;

    // Numeric tags are read as their decimal form
    let version = match document.get("version") {
        Some(serde_json::Value::String(v)) => v.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(_) => return Err(parse_error(path, "version must be a string")),
        None => return Err(parse_error(path, "missing version")),
    };
    document["version"] = serde_json::Value::String(version.clone());

    let config = match version.as_str() {
        CONFIG_VERSION => {
            serde_json::from_value::<Config>(document).map_err(|e| parse_error(path, e))?
        }
        LEGACY_VERSION_V1 => {
            let old: ConfigV1 =
                serde_json::from_value(document).map_err(|e| parse_error(path, e))?;
            tracing::info!(
                path = %path.display(),
                from = LEGACY_VERSION_V1,
                to = CONFIG_VERSION,
                "Migrating configuration"
            );
            migrate_v1(old)
        }
        _ => return Err(Error::ConfigVersionUnsupported(version)),
    };

    if let Some(name) = config.aliases.keys().find(|n| !is_valid_alias_name(n)) {
        return Err(parse_error(path, format!("invalid alias name '{name}'")));
    }

    tracing::debug!(
        path = %path.display(),
        aliases = config.aliases.len(),
        hosts = config.host_configs.len(),
        "Loaded configuration"
    );
    Ok(config)
}

/// Save configuration to disk atomically
///
/// The document is written to a temporary file next to `path`, synced, and
/// renamed over the target. The temporary file is removed on failure.
/// Only documents that `load` accepts are written.
pub fn save(path: &Path, config: &Config) -> Result<()> {
    if config.version != CONFIG_VERSION {
        return Err(Error::ConfigVersionUnsupported(config.version.clone()));
    }
    if let Some(name) = config.aliases.keys().find(|n| !is_valid_alias_name(n)) {
        return Err(Error::InvalidAliasName(name.clone()));
    }

    let write_err = |source: std::io::Error| Error::ConfigWrite {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let content = serde_json::to_vec_pretty(config).map_err(|e| write_err(e.into()))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".config.json.")
        .tempfile_in(parent)
        .map_err(write_err)?;
    tmp.write_all(&content).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    // Set restrictive permissions on Unix systems
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::debug!(path = %path.display(), "Saved configuration");
    Ok(())
}

/// Handle on a configuration file location
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a ConfigStore at the current user's default path
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: resolve_config_path()?,
        })
    }

    /// Create a ConfigStore with a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Create a ConfigStore for `config.json` inside a custom directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::with_path(dir.as_ref().join(CONFIG_FILE_NAME))
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<Config> {
        load(&self.config_path)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        save(&self.config_path, config)
    }

    /// Load the configuration, or the default one if no file exists yet
    pub fn load_or_default(&self) -> Result<Config> {
        match self.load() {
            Err(Error::ConfigNotFound(_)) => Ok(new_default_config()),
            other => other,
        }
    }

    /// Write the default configuration if no file exists
    ///
    /// Returns true when a new file was created.
    pub fn init(&self) -> Result<bool> {
        match self.load() {
            Ok(_) => Ok(false),
            Err(Error::ConfigNotFound(_)) => {
                self.save(&new_default_config())?;
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (ConfigStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::in_dir(temp_dir.path());
        (store, temp_dir)
    }

    #[test]
    fn test_default_config() {
        let config = new_default_config();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.aliases["s3"], "https://s3.amazonaws.com");
        assert_eq!(config.aliases["play"], "http://play.minio.io:9000");
        assert_eq!(config.aliases["localhost"], "http://localhost:9000");
        assert!(config.host_configs.is_empty());
    }

    #[test]
    fn test_default_aliases_are_valid_names() {
        for name in new_default_config().aliases.keys() {
            assert!(is_valid_alias_name(name), "{name}");
        }
    }

    #[test]
    fn test_config_dir_naming() {
        let mut home = MockHomeDirProvider::new();
        home.expect_home_dir()
            .returning(|| Some(PathBuf::from("/home/minio")));

        let dir = resolve_config_dir_with(&home).unwrap();
        if cfg!(windows) {
            assert_eq!(dir, Path::new("/home/minio").join("mc"));
        } else {
            assert_eq!(dir, Path::new("/home/minio").join(".mc"));
        }
    }

    #[test]
    fn test_config_dir_without_home() {
        let mut home = MockHomeDirProvider::new();
        home.expect_home_dir().times(1).returning(|| None);

        let result = resolve_config_dir_with(&home);
        assert!(matches!(result, Err(Error::HomeDirUnavailable)));
    }

    #[test]
    fn test_config_path_is_inside_config_dir() {
        // Only meaningful where the environment has a home directory
        if let (Ok(dir), Ok(path)) = (resolve_config_dir(), resolve_config_path()) {
            assert_eq!(path, dir.join("config.json"));
            assert_eq!(resolve_config_dir().unwrap(), dir);
        }
    }

    #[test]
    fn test_save_and_load_default() {
        let (store, _temp_dir) = temp_store();

        store.save(&new_default_config()).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, new_default_config());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (store, _temp_dir) = temp_store();

        let mut config = new_default_config();
        config
            .aliases
            .insert("backup".into(), "https://backup.example.com".into());
        config.host_configs.insert(
            "backup".into(),
            HostConfig {
                access_key: "AKIA".into(),
                secret_key: "secret".into(),
                signature: Signature::S3v2,
            },
        );
        config
            .host_configs
            .insert("localhost:9000".into(), HostConfig::new("minio", "minio123"));

        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_save_uses_camel_case_fields() {
        let (store, _temp_dir) = temp_store();

        let mut config = Config::empty();
        config
            .host_configs
            .insert("play".into(), HostConfig::new("ak", "sk"));
        store.save(&config).unwrap();

        let raw = std::fs::read_to_string(store.config_path()).unwrap();
        assert!(raw.contains("\"hostConfigs\""));
        assert!(raw.contains("\"accessKey\": \"ak\""));
        assert!(raw.contains("\"signature\": \"S3v4\""));
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::in_dir(temp_dir.path().join("nested").join(".mc"));

        store.save(&new_default_config()).unwrap();
        assert!(store.config_path().exists());
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let (store, temp_dir) = temp_store();

        store.save(&new_default_config()).unwrap();
        store.save(&Config::empty()).unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("config.json")]);
        assert_eq!(store.load().unwrap(), Config::empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_sets_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _temp_dir) = temp_store();
        store.save(&new_default_config()).unwrap();

        let mode = std::fs::metadata(store.config_path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_save_into_file_parent_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let store = ConfigStore::in_dir(&blocker);
        let result = store.save(&new_default_config());
        assert!(matches!(result, Err(Error::ConfigWrite { .. })));
    }

    #[test]
    fn test_save_rejects_invalid_alias_name() {
        let (store, _temp_dir) = temp_store();

        let mut config = new_default_config();
        config.aliases.insert("help".into(), "http://h".into());

        let result = store.save(&config);
        assert!(matches!(result, Err(Error::InvalidAliasName(ref n)) if n == "help"));
        assert!(!store.config_path().exists());
    }

    #[test]
    fn test_save_rejects_other_version() {
        let (store, _temp_dir) = temp_store();
        store.save(&new_default_config()).unwrap();

        let mut config = new_default_config();
        config.version = LEGACY_VERSION_V1.to_string();

        let result = store.save(&config);
        assert!(matches!(result, Err(Error::ConfigVersionUnsupported(ref v)) if v == "1.0.0"));
        // Existing file is untouched
        assert_eq!(store.load().unwrap(), new_default_config());
    }

    #[test]
    fn test_save_failure_removes_temp_file() {
        let (store, temp_dir) = temp_store();
        std::fs::create_dir(store.config_path()).unwrap();
        std::fs::write(store.config_path().join("keep"), "x").unwrap();

        let result = store.save(&new_default_config());
        assert!(matches!(result, Err(Error::ConfigWrite { .. })));

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("config.json")]);
    }

    #[test]
    fn test_load_missing() {
        let (store, _temp_dir) = temp_store();
        let result = store.load();
        assert!(matches!(result, Err(Error::ConfigNotFound(ref p)) if p == store.config_path()));
    }

    #[test]
    fn test_load_malformed() {
        let (store, _temp_dir) = temp_store();
        std::fs::write(store.config_path(), "{ not json").unwrap();

        assert!(matches!(store.load(), Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_load_missing_version() {
        let (store, _temp_dir) = temp_store();
        std::fs::write(store.config_path(), r#"{"aliases": {}}"#).unwrap();

        assert!(matches!(store.load(), Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_load_unsupported_version() {
        let (store, _temp_dir) = temp_store();
        std::fs::write(store.config_path(), r#"{"version": "3.0.0"}"#).unwrap();

        let result = store.load();
        assert!(matches!(result, Err(Error::ConfigVersionUnsupported(ref v)) if v == "3.0.0"));
    }

    #[test]
    fn test_load_numeric_version_is_unsupported() {
        let (store, _temp_dir) = temp_store();
        std::fs::write(store.config_path(), r#"{"version": 2}"#).unwrap();

        let result = store.load();
        assert!(matches!(result, Err(Error::ConfigVersionUnsupported(ref v)) if v == "2"));
    }

    #[test]
    fn test_load_rejects_fields_of_other_version() {
        let (store, _temp_dir) = temp_store();
        let content = format!(r#"{{"version": "{CONFIG_VERSION}", "hosts": {{}}}}"#);
        std::fs::write(store.config_path(), content).unwrap();

        assert!(matches!(store.load(), Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_load_rejects_invalid_alias_name() {
        let (store, _temp_dir) = temp_store();
        let content = format!(
            r#"{{"version": "{CONFIG_VERSION}", "aliases": {{"help": "http://h"}}}}"#
        );
        std::fs::write(store.config_path(), content).unwrap();

        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("invalid alias name 'help'"));
    }

    #[test]
    fn test_migrate_v1() {
        let (store, _temp_dir) = temp_store();
        let content = r#"{
            "version": "1.0.0",
            "aliases": {
                "s3": "https://s3.amazonaws.com",
                "local": "http://localhost:9000"
            },
            "hosts": {
                "s3.amazonaws.com": {
                    "accessKeyId": "AKIAEXAMPLE",
                    "secretAccessKey": "wJalrXUtnFEMI"
                },
                "localhost:9000": {}
            }
        }"#;
        std::fs::write(store.config_path(), content).unwrap();

        let config = store.load().unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.aliases.len(), 2);
        assert_eq!(config.aliases["local"], "http://localhost:9000");

        let s3 = &config.host_configs["s3.amazonaws.com"];
        assert_eq!(s3.access_key, "AKIAEXAMPLE");
        assert_eq!(s3.secret_key, "wJalrXUtnFEMI");
        assert_eq!(s3.signature, Signature::S3v4);

        let local = &config.host_configs["localhost:9000"];
        assert_eq!(local, &HostConfig::new("", ""));
    }

    #[test]
    fn test_migrate_v1_then_save_writes_current_version() {
        let (store, _temp_dir) = temp_store();
        std::fs::write(store.config_path(), r#"{"version": "1.0.0"}"#).unwrap();

        let config = store.load().unwrap();
        assert_eq!(config, Config::empty());

        store.save(&config).unwrap();
        let raw = std::fs::read_to_string(store.config_path()).unwrap();
        assert!(raw.contains(CONFIG_VERSION));
    }

    #[test]
    fn test_load_or_default() {
        let (store, _temp_dir) = temp_store();
        assert_eq!(store.load_or_default().unwrap(), new_default_config());
        assert!(!store.config_path().exists());

        std::fs::write(store.config_path(), "[]").unwrap();
        assert!(store.load_or_default().is_err());
    }

    #[test]
    fn test_init() {
        let (store, _temp_dir) = temp_store();

        assert!(store.init().unwrap());
        assert_eq!(store.load().unwrap(), new_default_config());

        let mut config = Config::empty();
        config.aliases.insert("mine".into(), "http://mine".into());
        store.save(&config).unwrap();

        assert!(!store.init().unwrap());
        assert_eq!(store.load().unwrap(), config);
    }
}
