use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("There is no zone called {0}")]
    UnknownZone(String),

    #[error("Certificate parsing error: {0}")]
    CertParse(String),

    #[error("Private key parsing error: {0}")]
    KeyParse(String),

    #[error("PEM parsing error: {0}")]
    Pem(String),

    #[error("X509 parsing error: {0}")]
    X509Parse(String),

    #[error("DER decoding error: {0}")]
    DerDecode(String),

    #[error("Unsupported key: {0}")]
    UnsupportedKey(String),

    #[error("{0}")]
    HostnameMismatch(String),

    #[error("The certificate and the key don't match")]
    KeyMismatch,

    #[error("The hostname {hostname} already exists on the {zone} zone")]
    DuplicateHostname { hostname: String, zone: String },

    #[error("Failed to add {hostname}. {message}")]
    RegistrationRejected { hostname: String, message: String },

    #[error("Remote API error: {0}")]
    RemoteApi(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) | Error::UnknownZone(_) => 2,
            Error::CertParse(_)
            | Error::KeyParse(_)
            | Error::Pem(_)
            | Error::X509Parse(_)
            | Error::DerDecode(_)
            | Error::UnsupportedKey(_) => 3,
            Error::HostnameMismatch(_) => 4,
            Error::KeyMismatch => 5,
            Error::DuplicateHostname { .. } => 6,
            Error::RegistrationRejected { .. } | Error::RemoteApi(_) | Error::Http(_) => 7,
            Error::Io(_) | Error::Serialization(_) => 1,
        }
    }
}

impl From<x509_parser::error::X509Error> for Error {
    fn from(err: x509_parser::error::X509Error) -> Self {
        Error::X509Parse(err.to_string())
    }
}

impl From<x509_parser::nom::Err<x509_parser::error::X509Error>> for Error {
    fn from(err: x509_parser::nom::Err<x509_parser::error::X509Error>) -> Self {
        Error::X509Parse(err.to_string())
    }
}

impl From<x509_parser::nom::Err<x509_parser::error::PEMError>> for Error {
    fn from(err: x509_parser::nom::Err<x509_parser::error::PEMError>) -> Self {
        Error::Pem(err.to_string())
    }
}

impl From<der_parser::error::Error> for Error {
    fn from(err: der_parser::error::Error) -> Self {
        Error::DerDecode(err.to_string())
    }
}

impl From<rcgen::Error> for Error {
    fn from(err: rcgen::Error) -> Self {
        Error::KeyParse(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(format!("yaml: {}", err))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(format!("toml: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_category() {
        let codes = [
            Error::UnknownZone("example.com".into()).exit_code(),
            Error::CertParse("bad".into()).exit_code(),
            Error::HostnameMismatch("no".into()).exit_code(),
            Error::KeyMismatch.exit_code(),
            Error::DuplicateHostname {
                hostname: "a.example.com".into(),
                zone: "example.com".into(),
            }
            .exit_code(),
            Error::RemoteApi("down".into()).exit_code(),
        ];

        let mut unique = codes.to_vec();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), codes.len());
        assert!(codes.iter().all(|c| *c != 0));
    }

    #[test]
    fn test_registration_rejected_message() {
        let err = Error::RegistrationRejected {
            hostname: "shop.example.com".into(),
            message: "Duplicate custom hostname found.".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to add shop.example.com. Duplicate custom hostname found."
        );
        assert_eq!(err.exit_code(), 7);
    }
}
