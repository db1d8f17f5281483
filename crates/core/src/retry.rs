//! Retry eligibility for transport errors
//!
//! Only a narrow whitelist of transient network conditions is retried: name
//! resolution failures and read/write/dial failures. Anything else, including
//! errors that cannot be inspected, is permanent. Backoff and attempt limits
//! belong to the caller.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Low-level network operation that failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetOp {
    Read,
    Write,
    Dial,
    /// Any other tag, kept verbatim
    Other(String),
}

impl NetOp {
    pub fn as_str(&self) -> &str {
        match self {
            NetOp::Read => "read",
            NetOp::Write => "write",
            NetOp::Dial => "dial",
            NetOp::Other(tag) => tag,
        }
    }
}

impl From<&str> for NetOp {
    fn from(tag: &str) -> Self {
        match tag {
            "read" => NetOp::Read,
            "write" => NetOp::Write,
            "dial" => NetOp::Dial,
            other => NetOp::Other(other.to_string()),
        }
    }
}

impl fmt::Display for NetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name resolution failure
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("lookup {name}: {message}")]
pub struct DnsError {
    /// Host name being resolved
    pub name: String,
    pub message: String,
}

impl DnsError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Failure of a tagged network operation
#[derive(Debug, Error)]
#[error("{op} {net} {}: {source}", .addr.as_deref().unwrap_or("-"))]
pub struct OpError {
    pub op: NetOp,
    /// Network type, e.g. "tcp"
    pub net: String,
    /// Remote address, when known
    pub addr: Option<String>,
    #[source]
    pub source: std::io::Error,
}

impl OpError {
    pub fn new(op: impl Into<NetOp>, net: impl Into<String>, source: std::io::Error) -> Self {
        Self {
            op: op.into(),
            net: net.into(),
            addr: None,
            source,
        }
    }

    pub fn with_addr(mut self, addr: impl Into<String>) -> Self {
        self.addr = Some(addr.into());
        self
    }
}

/// Where an error was wrapped, plus free-form diagnostic data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
    pub data: BTreeMap<String, String>,
}

impl CallSite {
    /// Capture the caller's location
    #[track_caller]
    pub fn here() -> Self {
        let location = std::panic::Location::caller();
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
            data: BTreeMap::new(),
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)?;
        for (key, value) in &self.data {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

/// Error observed on a network-facing call
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Dns(#[from] DnsError),

    #[error(transparent)]
    Op(#[from] OpError),

    /// Diagnostic wrapper; classification always looks through it
    #[error("{cause} [{context}]")]
    Traced {
        #[source]
        cause: Box<TransportError>,
        context: CallSite,
    },

    /// Opaque error that is never inspected
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TransportError {
    /// Wrap this error with the caller's location and extra data
    #[track_caller]
    pub fn traced<I, K, V>(self, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut context = CallSite::here();
        context
            .data
            .extend(data.into_iter().map(|(k, v)| (k.into(), v.into())));
        TransportError::Traced {
            cause: Box::new(self),
            context,
        }
    }

    /// The wrapped error, if this is a diagnostic wrapper
    pub fn cause(&self) -> Option<&TransportError> {
        match self {
            TransportError::Traced { cause, .. } => Some(cause),
            _ => None,
        }
    }

    /// The innermost error beneath all diagnostic wrappers
    pub fn root_cause(&self) -> &TransportError {
        let mut err = self;
        while let Some(cause) = err.cause() {
            err = cause;
        }
        err
    }
}

/// Decide whether the failure behind `err` is transient and safe to retry
pub fn is_retryable(err: Option<&TransportError>) -> bool {
    let Some(err) = err else {
        return false;
    };

    let retryable = match err.root_cause() {
        TransportError::Dns(_) => true,
        TransportError::Op(op) => matches!(op.op, NetOp::Read | NetOp::Write | NetOp::Dial),
        TransportError::Other(_) => false,
        TransportError::Traced { cause, .. } => is_retryable(Some(cause)),
    };

    tracing::debug!(error = %err, retryable, "Classified transport error");
    retryable
}
