//! X.509 certificate parsing.
//!
//! Only the end-entity certificate (the first PEM block) is read. The
//! subjectAltName extension is rendered the way `openssl x509 -text` prints
//! it and the SAN list is derived from that rendering.

use crate::error::{Error, Result};
use crate::types::Certificate;
use tracing::{debug, warn};
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::*;

pub fn parse_certificate_pem(pem: &[u8]) -> Result<Certificate> {
    let (_, block) = parse_x509_pem(pem)?;
    if block.label != "CERTIFICATE" {
        return Err(Error::CertParse(format!(
            "expected CERTIFICATE block, got {}",
            block.label
        )));
    }

    let x509 = block
        .parse_x509()
        .map_err(|e| Error::CertParse(format!("Failed to parse certificate: {}", e)))?;

    let common_name = x509
        .subject()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| {
            warn!("certificate subject has no Common Name");
            String::new()
        });

    let san_text = match x509.subject_alternative_name()? {
        Some(ext) => render_general_names(&ext.value.general_names),
        None => String::new(),
    };
    let subject_alt_names = san_entries(&san_text);

    let certificate = Certificate {
        common_name,
        subject_alt_names,
        san_text,
        not_before: generalized_time(&x509.validity.not_before),
        not_after: generalized_time(&x509.validity.not_after),
        serial_number: format_serial(&x509.serial.to_bytes_be()),
    };

    debug!(
        common_name = %certificate.common_name,
        sans = certificate.subject_alt_names.len(),
        serial = %certificate.serial_number,
        "parsed certificate"
    );

    Ok(certificate)
}

/// Derives the SAN list from an openssl-style rendering: `DNS:` prefixes and
/// all whitespace are dropped, then the text is split on commas.
pub fn san_entries(san_text: &str) -> Vec<String> {
    let stripped: String = san_text
        .replace("DNS:", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if stripped.is_empty() {
        return Vec::new();
    }

    stripped.split(',').map(str::to_string).collect()
}

fn render_general_names(names: &[GeneralName]) -> String {
    let mut parts = Vec::new();

    for name in names {
        match name {
            GeneralName::DNSName(dns) => parts.push(format!("DNS:{}", dns)),
            GeneralName::IPAddress(ip) => parts.push(format!("IP Address:{}", format_ip(ip))),
            GeneralName::RFC822Name(email) => parts.push(format!("email:{}", email)),
            GeneralName::URI(uri) => parts.push(format!("URI:{}", uri)),
            _ => {}
        }
    }

    parts.join(", ")
}

fn generalized_time(time: &ASN1Time) -> String {
    let dt = time.to_datetime();
    format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}Z",
        dt.year(),
        u8::from(dt.month()),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second()
    )
}

fn format_serial(serial: &[u8]) -> String {
    hex::encode_upper(serial)
}

fn format_ip(ip_bytes: &[u8]) -> String {
    if ip_bytes.len() == 4 {
        format!(
            "{}.{}.{}.{}",
            ip_bytes[0], ip_bytes[1], ip_bytes[2], ip_bytes[3]
        )
    } else if ip_bytes.len() == 16 {
        let mut parts = Vec::new();
        for i in (0..16).step_by(2) {
            parts.push(format!("{:x}", u16::from_be_bytes([ip_bytes[i], ip_bytes[i + 1]])));
        }
        parts.join(":")
    } else {
        format!("{:?}", ip_bytes)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::issue;
    use super::*;

    #[test]
    fn test_parse_certificate_fields() {
        let (pem, _) = issue(
            "example.com",
            &["app.example.com", "www.example.com"],
            0xABC123,
        );
        let cert = parse_certificate_pem(pem.as_bytes()).unwrap();

        assert_eq!(cert.common_name, "example.com");
        assert_eq!(
            cert.subject_alt_names,
            vec!["app.example.com".to_string(), "www.example.com".to_string()]
        );
        assert_eq!(cert.san_text, "DNS:app.example.com, DNS:www.example.com");
        assert_eq!(cert.serial_number, "ABC123");
        assert_eq!(cert.not_before, "20240115000000Z");
        assert_eq!(cert.issued_on(), "2024-01-15");
        assert_eq!(cert.expires_on(), "2025-02-20");
    }

    #[test]
    fn test_missing_san_extension_gives_empty_list() {
        let (pem, _) = issue("api.example.com", &[], 7);
        let cert = parse_certificate_pem(pem.as_bytes()).unwrap();

        assert_eq!(cert.common_name, "api.example.com");
        assert!(cert.subject_alt_names.is_empty());
        assert!(cert.san_text.is_empty());
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        assert!(parse_certificate_pem(b"not a certificate").is_err());

        let bogus = "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n";
        let err = parse_certificate_pem(bogus.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_key_block_is_not_a_certificate() {
        let (_, key) = issue("api.example.com", &[], 7);
        assert!(matches!(
            parse_certificate_pem(key.as_bytes()),
            Err(Error::CertParse(_))
        ));
    }

    #[test]
    fn test_san_entries() {
        assert_eq!(
            san_entries("DNS:a.example.com, DNS:b.example.com"),
            vec!["a.example.com".to_string(), "b.example.com".to_string()]
        );
        assert_eq!(
            san_entries("DNS:a.example.com, IP Address:10.0.0.1"),
            vec!["a.example.com".to_string(), "IPAddress:10.0.0.1".to_string()]
        );
        assert!(san_entries("").is_empty());
        assert!(san_entries("  ").is_empty());
    }
}
