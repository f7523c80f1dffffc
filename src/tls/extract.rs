//! Certificate field extraction utilities.

use chrono::{DateTime, NaiveDateTime, Utc};
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::{GeneralName, ParsedExtension};
use x509_parser::public_key::PublicKey;
use x509_parser::time::ASN1Time;
use x509_parser::x509::X509Name;

use super::types::CertificateRecord;

/// Fills a [`CertificateRecord`] with everything parseable from the leaf
/// certificate: subject/issuer, serial, validity window, SANs, key and
/// signature algorithms.
pub(crate) fn extract_leaf_fields(cert: &X509Certificate<'_>, record: &mut CertificateRecord) {
    record.subject_cn = common_name(cert.subject());
    record.subject_org = organization(cert.subject());
    record.issuer_cn = common_name(cert.issuer());
    record.issuer_org = organization(cert.issuer());
    record.serial_number = Some(cert.raw_serial_as_string());

    record.not_before = asn1_to_datetime(&cert.validity().not_before);
    record.expires_on = asn1_to_datetime(&cert.validity().not_after);
    let now = Utc::now();
    if let Some(expires_on) = record.expires_on {
        record.days_until_expiry = Some((expires_on - now).num_days());
        record.expired = now > expires_on;
    }
    if let Some(not_before) = record.not_before {
        if now < not_before {
            record.expired = true;
        }
    }

    record.san_domains = extract_certificate_sans(cert);
    record.wildcard_cert = record.san_domains.iter().any(|san| san.starts_with("*."))
        || record
            .subject_cn
            .as_deref()
            .is_some_and(|cn| cn.starts_with("*."));

    let tbs_cert = &cert.tbs_certificate;
    record.key_algorithm = Some(key_algorithm_name(
        &tbs_cert.subject_pki.algorithm.algorithm.to_string(),
    ));
    record.signature_algorithm = Some(signature_algorithm_name(
        &cert.signature_algorithm.algorithm.to_string(),
    ));

    match tbs_cert.subject_pki.parsed() {
        Ok(PublicKey::RSA(rsa)) => {
            record.key_size = Some(rsa.key_size() as u32);
        }
        Ok(PublicKey::EC(ec)) => {
            record.key_size = Some(ec.key_size() as u32);
            record.key_curve = tbs_cert
                .subject_pki
                .algorithm
                .parameters
                .as_ref()
                .and_then(|params| params.as_oid().ok())
                .map(|oid| curve_name(&oid.to_string()));
        }
        _ => {}
    }

    record.self_signed = is_self_signed(
        record.subject_cn.as_deref(),
        record.subject_org.as_deref(),
        record.issuer_cn.as_deref(),
        record.issuer_org.as_deref(),
    );
}

/// Extracts Subject Alternative Names (SANs) from an X.509 certificate.
///
/// Only DNS names are extracted (not IP addresses, email addresses, etc.) as
/// they are the ones relevant for hostname matching.
pub(crate) fn extract_certificate_sans(cert: &X509Certificate<'_>) -> Vec<String> {
    let mut sans = Vec::new();

    for ext in cert.extensions() {
        if let ParsedExtension::SubjectAlternativeName(ref san) = ext.parsed_extension() {
            for general_name in &san.general_names {
                if let GeneralName::DNSName(dns_name) = general_name {
                    sans.push(dns_name.to_string());
                }
            }
        }
    }

    sans
}

/// Self-signedness as a tri-state: subject and issuer identical means
/// self-signed, differing means not, and a certificate naming neither CN nor
/// organization on one side cannot be judged at all.
pub(crate) fn is_self_signed(
    subject_cn: Option<&str>,
    subject_org: Option<&str>,
    issuer_cn: Option<&str>,
    issuer_org: Option<&str>,
) -> Option<bool> {
    match (subject_cn, issuer_cn) {
        (Some(subject), Some(issuer)) => Some(subject.eq_ignore_ascii_case(issuer)),
        _ => match (subject_org, issuer_org) {
            (Some(subject), Some(issuer)) => Some(subject.eq_ignore_ascii_case(issuer)),
            _ => None,
        },
    }
}

fn common_name(name: &X509Name<'_>) -> Option<String> {
    name.iter_common_name()
        .next()
        .and_then(|attr| attr.as_str().ok())
        .map(|s| s.to_string())
}

fn organization(name: &X509Name<'_>) -> Option<String> {
    name.iter_organization()
        .next()
        .and_then(|attr| attr.as_str().ok())
        .map(|s| s.to_string())
}

fn asn1_to_datetime(time: &ASN1Time) -> Option<DateTime<Utc>> {
    let rfc2822 = time.to_rfc2822().ok()?;
    NaiveDateTime::parse_from_str(&rfc2822, "%a, %d %b %Y %H:%M:%S %z")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Maps a public key algorithm OID to a display name. Unknown OIDs pass
/// through unchanged so nothing is silently dropped.
fn key_algorithm_name(oid_str: &str) -> String {
    if oid_str.contains("1.2.840.113549.1.1.1") {
        "RSA".to_string()
    } else if oid_str.contains("1.2.840.10045.2.1") {
        "ECDSA".to_string()
    } else if oid_str.contains("1.3.101.112") {
        "Ed25519".to_string()
    } else if oid_str.contains("1.3.101.113") {
        "Ed448".to_string()
    } else {
        oid_str.to_string()
    }
}

fn signature_algorithm_name(oid_str: &str) -> String {
    match oid_str {
        "1.2.840.113549.1.1.5" => "sha1WithRSAEncryption".to_string(),
        "1.2.840.113549.1.1.11" => "sha256WithRSAEncryption".to_string(),
        "1.2.840.113549.1.1.12" => "sha384WithRSAEncryption".to_string(),
        "1.2.840.113549.1.1.13" => "sha512WithRSAEncryption".to_string(),
        "1.2.840.10045.4.3.2" => "ecdsa-with-SHA256".to_string(),
        "1.2.840.10045.4.3.3" => "ecdsa-with-SHA384".to_string(),
        "1.2.840.10045.4.3.4" => "ecdsa-with-SHA512".to_string(),
        "1.3.101.112" => "Ed25519".to_string(),
        other => other.to_string(),
    }
}

fn curve_name(oid_str: &str) -> String {
    match oid_str {
        "1.2.840.10045.3.1.7" => "P-256".to_string(),
        "1.3.132.0.34" => "P-384".to_string(),
        "1.3.132.0.35" => "P-521".to_string(),
        other => other.to_string(),
    }
}
