//! Certificate / private key pairing.
//!
//! Both sides are reduced to their public key material (the RSA modulus, or
//! the raw public key for EC and EdDSA keys) and compared by SHA-256
//! fingerprint.

use crate::error::{Error, Result};
use der_parser::ber::{BerObject, BerObjectContent, Class, Tag};
use der_parser::der::{parse_der, parse_der_sequence};
use sha2::{Digest, Sha256};
use tracing::debug;
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::*;

/// Fingerprint of the public key carried by the certificate.
pub fn certificate_fingerprint(cert_pem: &[u8]) -> Result<String> {
    let (_, block) = parse_x509_pem(cert_pem)?;
    let x509 = block
        .parse_x509()
        .map_err(|e| Error::CertParse(format!("Failed to parse certificate: {}", e)))?;
    Ok(fingerprint(&spki_material(x509.public_key())))
}

/// Fingerprint of the public half of a PEM private key.
pub fn private_key_fingerprint(key_pem: &[u8]) -> Result<String> {
    let (_, block) = parse_x509_pem(key_pem)
        .map_err(|e| Error::KeyParse(format!("Invalid PEM: {}", e)))?;

    let material = match block.label.as_str() {
        "PRIVATE KEY" => pkcs8_material(&block.contents)?,
        "RSA PRIVATE KEY" => rsa_private_key_modulus(&block.contents)?,
        "EC PRIVATE KEY" => ec_private_key_point(&block.contents)?,
        "ENCRYPTED PRIVATE KEY" => {
            return Err(Error::UnsupportedKey(
                "encrypted private keys are not supported".to_string(),
            ))
        }
        other => {
            return Err(Error::KeyParse(format!(
                "expected a private key block, got {}",
                other
            )))
        }
    };

    Ok(fingerprint(&material))
}

pub fn verify_key_pair(cert_pem: &[u8], key_pem: &[u8]) -> Result<bool> {
    let cert = certificate_fingerprint(cert_pem)?;
    let key = private_key_fingerprint(key_pem)?;
    debug!(certificate = %cert, key = %key, "key pair fingerprints");
    Ok(cert == key)
}

fn fingerprint(material: &[u8]) -> String {
    hex::encode(Sha256::digest(material))
}

fn spki_material(spki: &SubjectPublicKeyInfo) -> Vec<u8> {
    match spki.parsed() {
        Ok(x509_parser::public_key::PublicKey::RSA(rsa)) => strip_leading_zeros(rsa.modulus),
        _ => spki.subject_public_key.data.to_vec(),
    }
}

const OID_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
const OID_EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";

/// `PrivateKeyInfo ::= SEQUENCE { version, privateKeyAlgorithm, privateKey, ... }`
///
/// RSA and EC keys are unwrapped and read directly, so key sizes and curves
/// are not limited to what rcgen can sign with. Other algorithms (Ed25519)
/// and EC keys that omit their public point go through rcgen.
fn pkcs8_material(der: &[u8]) -> Result<Vec<u8>> {
    let (_, obj) = parse_der_sequence(der).map_err(|e| Error::KeyParse(e.to_string()))?;
    let fields = obj.as_sequence()?;

    let algorithm = fields
        .get(1)
        .ok_or_else(|| Error::KeyParse("PKCS#8 key has no algorithm".to_string()))?
        .as_sequence()?
        .first()
        .ok_or_else(|| Error::KeyParse("PKCS#8 algorithm has no OID".to_string()))?
        .as_oid()?
        .to_id_string();
    let private_key = fields
        .get(2)
        .ok_or_else(|| Error::KeyParse("PKCS#8 key has no private key".to_string()))?
        .as_slice()?;

    match algorithm.as_str() {
        OID_RSA_ENCRYPTION => rsa_private_key_modulus(private_key),
        OID_EC_PUBLIC_KEY => match ec_private_key_point(private_key) {
            Err(Error::UnsupportedKey(_)) => rcgen_material(der),
            other => other,
        },
        _ => rcgen_material(der),
    }
}

fn rcgen_material(der: &[u8]) -> Result<Vec<u8>> {
    let key_pair = rcgen::KeyPair::from_der(der)
        .map_err(|e| Error::UnsupportedKey(format!("PKCS#8 key: {}", e)))?;
    let spki_der = key_pair.public_key_der();
    let (_, spki) = SubjectPublicKeyInfo::from_der(&spki_der)?;
    Ok(spki_material(&spki))
}

/// `RSAPrivateKey ::= SEQUENCE { version, modulus, publicExponent, ... }`
fn rsa_private_key_modulus(der: &[u8]) -> Result<Vec<u8>> {
    let (_, obj) = parse_der_sequence(der).map_err(|e| Error::KeyParse(e.to_string()))?;
    let modulus = obj
        .as_sequence()?
        .get(1)
        .ok_or_else(|| Error::KeyParse("RSA key has no modulus".to_string()))?;
    Ok(strip_leading_zeros(modulus.as_slice()?))
}

/// `ECPrivateKey ::= SEQUENCE { version, privateKey, [0] parameters, [1] publicKey }`
fn ec_private_key_point(der: &[u8]) -> Result<Vec<u8>> {
    let (_, obj) = parse_der_sequence(der).map_err(|e| Error::KeyParse(e.to_string()))?;
    let tagged = obj
        .as_sequence()?
        .iter()
        .find(|elem| elem.header.class() == Class::ContextSpecific && elem.header.tag() == Tag(1))
        .ok_or_else(|| {
            Error::UnsupportedKey("EC key does not embed its public key".to_string())
        })?;

    let point = tagged_bit_string(tagged)?;
    Ok(point)
}

fn tagged_bit_string(tagged: &BerObject) -> Result<Vec<u8>> {
    if let BerObjectContent::Tagged(_, _, inner) = &tagged.content {
        return Ok(inner.as_slice()?.to_vec());
    }
    let (_, inner) = parse_der(tagged.as_slice()?).map_err(|e| Error::KeyParse(e.to_string()))?;
    Ok(inner.as_slice()?.to_vec())
}

fn strip_leading_zeros(bytes: &[u8]) -> Vec<u8> {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    bytes[start..].to_vec()
}
