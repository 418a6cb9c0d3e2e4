//! custom-hostname - validate a certificate and register it as a custom hostname
//!
//! This library checks a certificate/key pair against a hostname and adds
//! that hostname as a custom hostname on a CDN zone:
//!
//! - Parsing an X.509 PEM certificate (Common Name, SANs, validity, serial)
//! - Matching a hostname against the Common Name and SANs, with wildcard support
//! - Verifying that a certificate and private key belong together
//! - Fetching the paginated custom hostname inventory of a zone
//! - Registering the hostname and reporting the names sharing its certificate
//!
//! # Examples
//!
//! ## Checking hostname coverage
//!
//! ```no_run
//! use custom_hostname::cert::parse_certificate_pem;
//! use custom_hostname::matcher::match_hostname;
//! use custom_hostname::types::{MatchDecision, WildcardPolicy};
//!
//! let pem = std::fs::read("cert.pem").unwrap();
//! let cert = parse_certificate_pem(&pem).unwrap();
//! let decision = match_hostname("shop.example.com", &cert, WildcardPolicy::Contains);
//! assert_ne!(decision, MatchDecision::NoMatch);
//! ```
//!
//! ## Registering a hostname
//!
//! ```no_run
//! use custom_hostname::client::CustomHostnameClient;
//! use custom_hostname::config::{load_config, ZoneDirectory};
//! use custom_hostname::register::{AssumeYes, Registrar, RegistrationRequest};
//!
//! # async fn example() -> custom_hostname::Result<()> {
//! let config = load_config("config/config.json")?;
//! let zones = ZoneDirectory::from_config(&config)?;
//! let client = CustomHostnameClient::new(&config)?;
//!
//! let request = RegistrationRequest {
//!     hostname: "shop.example.com".into(),
//!     origin: "origin.example.net".into(),
//!     certificate_path: "cert.pem".into(),
//!     key_path: "key.pem".into(),
//!     zone: "example.com".into(),
//! };
//!
//! let outcome = Registrar::new(&config, &zones, &client)
//!     .run(&request, &mut AssumeYes)
//!     .await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod cert;
pub mod client;
pub mod config;
pub mod error;
pub mod inventory;
pub mod keypair;
pub mod matcher;
pub mod register;
pub mod report;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};

pub use cert::parse_certificate_pem;
pub use client::{CustomHostnameClient, HostnameApi, NewCustomHostname};
pub use config::{load_config, Config, ZoneDirectory};
pub use inventory::Inventory;
pub use keypair::verify_key_pair;
pub use matcher::match_hostname;
pub use register::{Confirm, Outcome, Registrar, RegistrationRequest};
pub use types::{Certificate, HostnameRecord, MatchDecision, Stage, WildcardPolicy};

#[cfg(test)]
mod tests {
    use super::*;
    use cert::test_support::issue;

    #[test]
    fn test_parse_match_and_verify() {
        let (cert_pem, key_pem) = issue("*.example.com", &["example.com"], 0xABC123);

        let cert = parse_certificate_pem(cert_pem.as_bytes()).unwrap();
        assert_eq!(
            match_hostname("foo.example.com", &cert, WildcardPolicy::Contains),
            MatchDecision::WildcardMatch
        );
        assert!(verify_key_pair(cert_pem.as_bytes(), key_pem.as_bytes()).unwrap());
    }

    #[test]
    fn test_wildcard_certificate_rejects_other_domain() {
        let (cert_pem, _) = issue("*.example.com", &["example.com"], 1);
        let cert = parse_certificate_pem(cert_pem.as_bytes()).unwrap();

        assert_eq!(
            match_hostname("foo.other.com", &cert, WildcardPolicy::Contains),
            MatchDecision::NoMatch
        );
    }
}
