//! Alias management commands
//!
//! Aliases are short names for S3-compatible storage endpoints. Credentials
//! for an alias are stored separately under the same name.

use clap::Subcommand;
use mc_core::{AliasManager, ConfigStore, HostConfig, Signature};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Alias subcommands for managing storage service connections
#[derive(Subcommand, Debug)]
pub enum AliasCommands {
    /// Add or update an alias
    Set(SetArgs),

    /// List all configured aliases
    List(ListArgs),

    /// Remove an alias
    Remove(RemoveArgs),

    /// Expand an alias:path identifier into a URL
    Resolve(ResolveArgs),
}

/// Signature style accepted on the command line
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureArg {
    #[value(name = "S3v4")]
    S3v4,
    #[value(name = "S3v2")]
    S3v2,
}

impl From<SignatureArg> for Signature {
    fn from(arg: SignatureArg) -> Self {
        match arg {
            SignatureArg::S3v4 => Signature::S3v4,
            SignatureArg::S3v2 => Signature::S3v2,
        }
    }
}

/// Arguments for the `alias set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Alias name (e.g., "play", "backup")
    pub name: String,

    /// S3 endpoint URL (e.g., "http://localhost:9000", "https://s3.amazonaws.com")
    pub endpoint: String,

    /// Access key ID
    #[arg(requires = "secret_key")]
    pub access_key: Option<String>,

    /// Secret access key
    pub secret_key: Option<String>,

    /// Signature style for requests to this endpoint
    #[arg(long, value_enum, default_value = "S3v4")]
    pub signature: SignatureArg,
}

/// Arguments for the `alias list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show whether credentials are stored for each alias
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `alias remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the alias to remove
    pub name: String,
}

/// Arguments for the `alias resolve` command
#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Identifier such as "play:bucket/key"
    pub identifier: String,
}

/// JSON output for alias list
#[derive(Serialize)]
struct AliasListOutput {
    aliases: Vec<AliasInfo>,
}

/// Alias information for JSON output (without sensitive data)
#[derive(Serialize)]
struct AliasInfo {
    name: String,
    url: String,
    has_credentials: bool,
}

/// JSON output for alias set/remove operations
#[derive(Serialize)]
struct AliasOperationOutput {
    success: bool,
    alias: String,
    message: String,
}

#[derive(Serialize)]
struct ResolveOutput {
    identifier: String,
    url: String,
}

/// Execute an alias subcommand
pub fn execute(cmd: AliasCommands, store: ConfigStore, formatter: &Formatter) -> ExitCode {
    let manager = AliasManager::with_store(store);

    let result = match cmd {
        AliasCommands::Set(args) => execute_set(args, &manager, formatter),
        AliasCommands::List(args) => execute_list(args, &manager, formatter),
        AliasCommands::Remove(args) => execute_remove(args, &manager, formatter),
        AliasCommands::Resolve(args) => execute_resolve(args, &manager, formatter),
    };

    match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}

fn execute_set(
    args: SetArgs,
    manager: &AliasManager,
    formatter: &Formatter,
) -> mc_core::Result<()> {
    let host = match (args.access_key, args.secret_key) {
        (Some(access_key), Some(secret_key)) => Some(HostConfig {
            access_key,
            secret_key,
            signature: args.signature.into(),
        }),
        _ => None,
    };
    manager.set_with_host(&args.name, &args.endpoint, host)?;

    let message = format!("Alias '{}' configured successfully", args.name);
    formatter.report_success(
        &AliasOperationOutput {
            success: true,
            alias: args.name,
            message: message.clone(),
        },
        &message,
    );
    Ok(())
}

fn execute_list(
    args: ListArgs,
    manager: &AliasManager,
    formatter: &Formatter,
) -> mc_core::Result<()> {
    let config = manager.store().load_or_default()?;

    if formatter.is_json() {
        let output = AliasListOutput {
            aliases: config
                .aliases
                .iter()
                .map(|(name, url)| AliasInfo {
                    name: name.clone(),
                    url: url.clone(),
                    has_credentials: config.host_configs.contains_key(name),
                })
                .collect(),
        };
        formatter.json(&output);
    } else if config.aliases.is_empty() {
        formatter.println("No aliases configured.");
    } else {
        for (name, url) in &config.aliases {
            if args.long {
                let creds = if config.host_configs.contains_key(name) {
                    "credentials"
                } else {
                    "anonymous"
                };
                formatter.println(&format!("{name:<12} {url} ({creds})"));
            } else {
                formatter.println(&format!("{name:<12} {url}"));
            }
        }
    }
    Ok(())
}

fn execute_remove(
    args: RemoveArgs,
    manager: &AliasManager,
    formatter: &Formatter,
) -> mc_core::Result<()> {
    manager.remove(&args.name)?;

    let message = format!("Alias '{}' removed successfully", args.name);
    formatter.report_success(
        &AliasOperationOutput {
            success: true,
            alias: args.name,
            message: message.clone(),
        },
        &message,
    );
    Ok(())
}

fn execute_resolve(
    args: ResolveArgs,
    manager: &AliasManager,
    formatter: &Formatter,
) -> mc_core::Result<()> {
    let url = manager.resolve(&args.identifier)?;

    formatter.report(
        &ResolveOutput {
            identifier: args.identifier,
            url: url.clone(),
        },
        &url,
    );
    Ok(())
}
