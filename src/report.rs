use crate::error::Result;
use crate::register::Registration;
use crate::types::{Certificate, MatchDecision, OutputFormat, ValidityStatus};
use colored::Colorize;
use serde::Serialize;

pub fn ok(message: &str) -> String {
    format!("{} {}", "[ OK ]".green().bold(), message)
}

pub fn info(message: &str) -> String {
    format!("{} {}", "[ INFO ]".cyan().bold(), message)
}

pub fn warning(message: &str) -> String {
    format!("{} {}", "[ WARNING ]".yellow().bold(), message)
}

pub fn error(message: &str) -> String {
    format!("{} {}", "[ ERROR ]".red().bold(), message.bold())
}

pub fn cancelled(message: &str) -> String {
    format!("{} {}", "[ CANCELLED ]".red().bold(), message)
}

pub fn match_summary(decision: MatchDecision) -> Vec<String> {
    match decision {
        MatchDecision::WildcardMatch => vec![
            info("This is a Wildcard Certificate"),
            ok("The supplied hostname matches the Common Name Wildcard domain"),
        ],
        MatchDecision::ExactMatch => vec![ok(
            "The supplied hostname matches the Common Name or Alternative Names",
        )],
        MatchDecision::NoMatch => vec![error(
            "The supplied hostname does not match the supplied Certificate",
        )],
    }
}

#[derive(Serialize)]
struct CertificateSummary<'a> {
    hostname: &'a str,
    common_name: &'a str,
    associated_host_names: &'a str,
    subject_alt_names: &'a [String],
    issued_on: String,
    expires_on: String,
    serial_number: &'a str,
    validity_status: &'static str,
}

pub fn display_certificate_details(
    hostname: &str,
    cert: &Certificate,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(display_pretty(hostname, cert)),
        OutputFormat::Json => display_json(hostname, cert),
    }
}

fn display_pretty(hostname: &str, cert: &Certificate) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{}\n\n",
        info(&format!(
            "{} Supplied Certificate Details:",
            hostname.to_uppercase().bold()
        ))
    ));
    output.push_str(&format!("     {} {}\n", "HOSTNAME:".bold(), hostname));
    output.push_str(&format!(
        "     {} {}\n",
        "ASSOCIATED HOST NAMES:".bold(),
        cert.san_text
    ));
    output.push_str(&format!(
        "     {} {}\n",
        "CERTIFICATE ISSUED ON:".bold(),
        cert.issued_on()
    ));
    output.push_str(&format!(
        "     {} {}\n",
        "CERTIFICATE EXPIRES ON:".bold(),
        cert.expires_on()
    ));
    output.push_str(&format!(
        "     {} {}\n",
        "SERIAL NUMBER:".bold(),
        cert.serial_number.dimmed()
    ));

    let status = cert.validity_status();
    let colored_status = match status {
        ValidityStatus::Valid => status.name().green(),
        _ => status.name().red(),
    };
    output.push_str(&format!(
        "     {} {}\n",
        "VALIDITY STATUS:".bold(),
        colored_status
    ));

    output
}

fn display_json(hostname: &str, cert: &Certificate) -> Result<String> {
    let summary = CertificateSummary {
        hostname,
        common_name: &cert.common_name,
        associated_host_names: &cert.san_text,
        subject_alt_names: &cert.subject_alt_names,
        issued_on: cert.issued_on(),
        expires_on: cert.expires_on(),
        serial_number: &cert.serial_number,
        validity_status: cert.validity_status().name(),
    };

    Ok(serde_json::to_string_pretty(&summary)?)
}

pub fn display_registration(hostname: &str, registration: &Registration) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{}\n\n",
        ok(&format!("{} successfully added", hostname))
    ));

    if let Some(id) = &registration.record.id {
        output.push_str(&format!("     {} {}\n", "ID:".bold(), id));
    }
    if let Some(status) = &registration.record.ssl_status {
        output.push_str(&format!("     {} {}\n", "SSL STATUS:".bold(), status));
    }
    if let Some(serial) = &registration.certificate_serial {
        output.push_str(&format!("     {} {}\n", "CERTIFICATE SERIAL:".bold(), serial));
    }
    output.push('\n');

    output.push_str(&format!(
        "{}\n\n",
        info("The following names share this certificate.")
    ));
    output.push_str(&format!(
        "     {} {}\n",
        "SHARED CERTIFICATE NAMES:".bold(),
        registration.shared_hostnames.join(", ")
    ));

    output
}
