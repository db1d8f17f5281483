//! Bucket access control policies
//!
//! The set of canned ACLs is fixed by the storage protocol; tokens are
//! matched exactly, without case folding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Canned ACL that can be attached to a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BucketAcl {
    Private,
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
}

impl BucketAcl {
    /// Every legal ACL, in protocol order
    pub const ALL: [BucketAcl; 4] = [
        BucketAcl::Private,
        BucketAcl::PublicRead,
        BucketAcl::PublicReadWrite,
        BucketAcl::AuthenticatedRead,
    ];

    /// Wire token for this ACL
    pub const fn as_str(self) -> &'static str {
        match self {
            BucketAcl::Private => "private",
            BucketAcl::PublicRead => "public-read",
            BucketAcl::PublicReadWrite => "public-read-write",
            BucketAcl::AuthenticatedRead => "authenticated-read",
        }
    }
}

impl fmt::Display for BucketAcl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BucketAcl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|acl| acl.as_str() == s)
            .ok_or_else(|| Error::InvalidAcl(s.to_string()))
    }
}

/// Check whether `token` names one of the canned bucket ACLs
pub fn is_valid_bucket_acl(token: &str) -> bool {
    token.parse::<BucketAcl>().is_ok()
}
