//! mc-core: Core library for the mc S3 CLI client
//!
//! This crate provides the core functionality for the mc CLI, including:
//! - Configuration management and schema migration
//! - Alias validation, management and expansion
//! - Bucket ACL validation
//! - Retry classification for transport errors
//!
//! Nothing in this crate performs network I/O. It decides where the
//! configuration lives, what a typed identifier points at, and whether a
//! failed call is worth retrying.

pub mod acl;
pub mod alias;
pub mod config;
pub mod error;
pub mod retry;

pub use acl::{is_valid_bucket_acl, BucketAcl};
pub use alias::{alias_expand, is_valid_alias_name, AliasManager, AliasMap, RESERVED_COMMANDS};
pub use config::{
    new_default_config, resolve_config_dir, resolve_config_path, Config, ConfigStore, HostConfig,
    Signature, CONFIG_VERSION,
};
pub use error::{Error, Result};
pub use retry::{is_retryable, CallSite, DnsError, NetOp, OpError, TransportError};
