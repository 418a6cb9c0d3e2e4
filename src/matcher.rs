//! Hostname coverage checks against a parsed certificate.

use crate::error::{Error, Result};
use crate::types::{Certificate, MatchDecision, WildcardPolicy};

/// Decides whether `hostname` is covered by `cert`.
///
/// A wildcard Common Name is decided on the suffix after the first label
/// alone: when the suffixes differ the result is `NoMatch` even if the
/// hostname is listed in the SANs.
pub fn match_hostname(hostname: &str, cert: &Certificate, policy: WildcardPolicy) -> MatchDecision {
    let cn = cert.common_name.to_lowercase();

    if is_wildcard(&cn, policy) {
        return if registrable_suffix(hostname) == registrable_suffix(&cn) {
            MatchDecision::WildcardMatch
        } else {
            MatchDecision::NoMatch
        };
    }

    if hostname == cn || cert.subject_alt_names.iter().any(|san| san == hostname) {
        MatchDecision::ExactMatch
    } else {
        MatchDecision::NoMatch
    }
}

/// Like [`match_hostname`], but a `NoMatch` becomes the error shown to the user.
pub fn require_match(
    hostname: &str,
    cert: &Certificate,
    policy: WildcardPolicy,
) -> Result<MatchDecision> {
    match match_hostname(hostname, cert, policy) {
        MatchDecision::NoMatch if is_wildcard(&cert.common_name, policy) => {
            Err(Error::HostnameMismatch(
                "This is a Wildcard Certificate. The supplied hostname does not match the certificate"
                    .to_string(),
            ))
        }
        MatchDecision::NoMatch => Err(Error::HostnameMismatch(
            "The supplied hostname does not match the Common Name or Alternative Names of the supplied Certificate"
                .to_string(),
        )),
        decision => Ok(decision),
    }
}

pub fn is_wildcard(common_name: &str, policy: WildcardPolicy) -> bool {
    match policy {
        WildcardPolicy::Contains => common_name.contains("*."),
        WildcardPolicy::Prefix => common_name.starts_with("*."),
    }
}

/// Everything after the first `.`, or the whole name when it has no dot.
pub fn registrable_suffix(name: &str) -> &str {
    name.split_once('.').map(|(_, rest)| rest).unwrap_or(name)
}
