//! The registration run: validation gates, confirmation, creation and the
//! shared-certificate report.

use crate::cert::parse_certificate_pem;
use crate::client::{HostnameApi, NewCustomHostname};
use crate::config::{Config, ZoneDirectory};
use crate::error::{Error, Result};
use crate::inventory::Inventory;
use crate::keypair::verify_key_pair;
use crate::matcher::require_match;
use crate::types::{Certificate, HostnameRecord, MatchDecision, Stage};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Asks the operator whether the mutating step may go ahead.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> Result<bool>,
{
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self(prompt)
    }
}

/// Confirms without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub hostname: String,
    pub origin: String,
    pub certificate_path: PathBuf,
    pub key_path: PathBuf,
    pub zone: String,
}

/// Everything gathered once all hard gates have passed.
#[derive(Clone)]
pub struct Prepared {
    pub zone_id: String,
    pub hostname: String,
    pub origin: String,
    pub certificate: Certificate,
    pub decision: MatchDecision,
    pub existing_hostnames: usize,
    certificate_pem: String,
    key_pem: String,
}

// Leaves the PEM material out of debug output.
impl std::fmt::Debug for Prepared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prepared")
            .field("zone_id", &self.zone_id)
            .field("hostname", &self.hostname)
            .field("origin", &self.origin)
            .field("certificate", &self.certificate)
            .field("decision", &self.decision)
            .field("existing_hostnames", &self.existing_hostnames)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub record: HostnameRecord,
    pub certificate_serial: Option<String>,
    pub shared_hostnames: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Registered(Registration),
    Cancelled,
}

pub struct Registrar<'a, A: HostnameApi + ?Sized> {
    config: &'a Config,
    zones: &'a ZoneDirectory,
    api: &'a A,
    stage: Stage,
}

impl<'a, A: HostnameApi + ?Sized> Registrar<'a, A> {
    pub fn new(config: &'a Config, zones: &'a ZoneDirectory, api: &'a A) -> Self {
        Self {
            config,
            zones,
            api,
            stage: Stage::Idle,
        }
    }

    /// Last stage reached. After an error this is the last gate that passed.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, stage: Stage) {
        debug!(from = ?self.stage, to = ?stage, "stage transition");
        self.stage = stage;
    }

    /// Runs every gate up to and including the duplicate check.
    pub async fn prepare(&mut self, request: &RegistrationRequest) -> Result<Prepared> {
        let zone_id = self.zones.zone_id(&request.zone)?.to_string();
        self.advance(Stage::ZoneValidated);

        let certificate_pem = fs::read_to_string(&request.certificate_path)?;
        let certificate = parse_certificate_pem(certificate_pem.as_bytes()).map_err(|e| {
            Error::CertParse(format!("{}: {}", request.certificate_path.display(), e))
        })?;
        self.advance(Stage::CertificateParsed);

        let decision = require_match(
            &request.hostname,
            &certificate,
            self.config.matching.wildcard_policy,
        )?;
        info!(hostname = %request.hostname, ?decision, "hostname covered by certificate");
        self.advance(Stage::HostnameMatched);

        let key_pem = fs::read_to_string(&request.key_path)?;
        if !verify_key_pair(certificate_pem.as_bytes(), key_pem.as_bytes())? {
            return Err(Error::KeyMismatch);
        }
        self.advance(Stage::KeyPairVerified);

        let inventory = Inventory::fetch_all_pages(self.api, &zone_id).await?;
        if inventory.exists(&request.hostname) {
            return Err(Error::DuplicateHostname {
                hostname: request.hostname.clone(),
                zone: request.zone.clone(),
            });
        }
        self.advance(Stage::DuplicateChecked);

        Ok(Prepared {
            zone_id,
            hostname: request.hostname.clone(),
            origin: request.origin.clone(),
            certificate,
            decision,
            existing_hostnames: inventory.len(),
            certificate_pem,
            key_pem,
        })
    }

    /// Asks for confirmation, registers, and reports the hostnames that share
    /// the newly registered certificate.
    pub async fn complete<C>(&mut self, prepared: Prepared, confirm: &mut C) -> Result<Outcome>
    where
        C: Confirm + ?Sized,
    {
        let prompt = format!("Add {} as a custom hostname? yes/no: ", prepared.hostname);
        if !confirm.confirm(&prompt)? {
            self.advance(Stage::UserDeclined);
            self.advance(Stage::Cancelled);
            return Ok(Outcome::Cancelled);
        }
        self.advance(Stage::UserConfirmed);

        let new_hostname = NewCustomHostname::new(
            prepared.hostname.clone(),
            prepared.origin.clone(),
            &prepared.certificate_pem,
            &prepared.key_pem,
        );
        let record = self.api.create(&prepared.zone_id, &new_hostname).await?;
        info!(hostname = %prepared.hostname, id = ?record.id, "custom hostname created");
        self.advance(Stage::Registered);

        let inventory = Inventory::fetch_all_pages(self.api, &prepared.zone_id).await?;
        let certificate_serial = inventory.serial_of(&prepared.hostname).map(str::to_string);
        let shared_hostnames = match &certificate_serial {
            Some(serial) => inventory
                .sharing_certificate(serial)
                .into_iter()
                .map(str::to_string)
                .collect(),
            None => {
                warn!(
                    hostname = %prepared.hostname,
                    "no certificate serial reported for the new hostname yet"
                );
                Vec::new()
            }
        };
        self.advance(Stage::ReportedSharedNames);

        Ok(Outcome::Registered(Registration {
            record,
            certificate_serial,
            shared_hostnames,
        }))
    }

    pub async fn run<C>(&mut self, request: &RegistrationRequest, confirm: &mut C) -> Result<Outcome>
    where
        C: Confirm + ?Sized,
    {
        let prepared = self.prepare(request).await?;
        self.complete(prepared, confirm).await
    }
}
