use serde::{Deserialize, Serialize};

/// A parsed end-entity certificate, reduced to the fields used for hostname
/// coverage and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Certificate {
    pub common_name: String,
    pub subject_alt_names: Vec<String>,
    /// openssl-style rendering of the subjectAltName extension, empty if absent.
    pub san_text: String,
    /// `YYYYMMDDHHMMSSZ`
    pub not_before: String,
    /// `YYYYMMDDHHMMSSZ`
    pub not_after: String,
    pub serial_number: String,
}

impl Certificate {
    pub fn issued_on(&self) -> String {
        format_generalized_date(&self.not_before)
    }

    pub fn expires_on(&self) -> String {
        format_generalized_date(&self.not_after)
    }

    pub fn validity_status(&self) -> ValidityStatus {
        let now = chrono::Utc::now().format("%Y%m%d%H%M%SZ").to_string();
        if now < self.not_before {
            ValidityStatus::NotYetValid
        } else if now > self.not_after {
            ValidityStatus::Expired
        } else {
            ValidityStatus::Valid
        }
    }
}

/// Splits a generalized time into `YYYY-MM-DD`. Only the date digits are
/// read; time of day and zone are ignored.
pub fn format_generalized_date(value: &str) -> String {
    let year = value.get(0..4).unwrap_or_default();
    let month = value.get(4..6).unwrap_or_default();
    let day = value.get(6..8).unwrap_or_default();
    format!("{}-{}-{}", year, month, day)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidityStatus {
    Valid,
    Expired,
    NotYetValid,
}

impl ValidityStatus {
    pub fn name(&self) -> &'static str {
        match self {
            ValidityStatus::Valid => "Valid",
            ValidityStatus::Expired => "Expired",
            ValidityStatus::NotYetValid => "Not yet valid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDecision {
    ExactMatch,
    WildcardMatch,
    NoMatch,
}

/// How a Common Name is recognised as a wildcard pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WildcardPolicy {
    /// A literal `*.` anywhere in the Common Name.
    #[default]
    Contains,
    /// The Common Name must start with `*.`.
    Prefix,
}

impl std::str::FromStr for WildcardPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "contains" => Ok(WildcardPolicy::Contains),
            "prefix" => Ok(WildcardPolicy::Prefix),
            _ => Err(crate::Error::Config(format!(
                "Invalid wildcard policy: {}",
                s
            ))),
        }
    }
}

/// A custom hostname as reported by the remote inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostnameRecord {
    pub id: Option<String>,
    pub hostname: String,
    pub certificate_serial: Option<String>,
    pub ssl_status: Option<String>,
}

impl HostnameRecord {
    pub fn new(hostname: impl Into<String>, certificate_serial: Option<String>) -> Self {
        Self {
            id: None,
            hostname: hostname.into(),
            certificate_serial,
            ssl_status: None,
        }
    }
}

/// Progress through a registration run. Everything before `DuplicateChecked`
/// is a hard gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ZoneValidated,
    CertificateParsed,
    HostnameMatched,
    KeyPairVerified,
    DuplicateChecked,
    UserConfirmed,
    UserDeclined,
    Registered,
    ReportedSharedNames,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(OutputFormat::Pretty),
            "json" => Ok(OutputFormat::Json),
            _ => Err(crate::Error::Config(format!("Invalid format: {}", s))),
        }
    }
}
