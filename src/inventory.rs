//! The full set of custom hostnames registered in a zone.

use crate::client::HostnameApi;
use crate::error::Result;
use crate::types::HostnameRecord;
use tracing::debug;

/// Every page fetched for a zone, kept in fetch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pages: Vec<Vec<HostnameRecord>>,
}

impl Inventory {
    /// Fetches page 1, then every following page up to the `total_pages`
    /// the provider reports. The first failing page aborts the whole fetch.
    pub async fn fetch_all_pages<A>(api: &A, zone_id: &str) -> Result<Self>
    where
        A: HostnameApi + ?Sized,
    {
        let mut pages = Vec::new();
        let mut page = 1;

        loop {
            let batch = api.list_page(zone_id, page).await?;
            let total_pages = batch.total_pages;
            pages.push(batch.records);

            if page >= total_pages {
                break;
            }
            page += 1;
        }

        let inventory = Self { pages };
        debug!(
            zone_id,
            pages = inventory.pages.len(),
            records = inventory.len(),
            "fetched hostname inventory"
        );
        Ok(inventory)
    }

    pub fn from_pages(pages: Vec<Vec<HostnameRecord>>) -> Self {
        Self { pages }
    }

    pub fn pages(&self) -> &[Vec<HostnameRecord>] {
        &self.pages
    }

    pub fn records(&self) -> impl Iterator<Item = &HostnameRecord> {
        self.pages.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn exists(&self, hostname: &str) -> bool {
        self.records().any(|r| r.hostname == hostname)
    }

    /// Certificate serial of the first record named `hostname`.
    pub fn serial_of(&self, hostname: &str) -> Option<&str> {
        self.records()
            .find(|r| r.hostname == hostname)
            .and_then(|r| r.certificate_serial.as_deref())
    }

    /// Hostnames whose certificate serial equals `serial`, in fetch order.
    /// Records without a certificate never match.
    pub fn sharing_certificate(&self, serial: &str) -> Vec<&str> {
        self.records()
            .filter(|r| r.certificate_serial.as_deref() == Some(serial))
            .map(|r| r.hostname.as_str())
            .collect()
    }
}
