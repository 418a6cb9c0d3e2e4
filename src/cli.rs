use crate::client::CustomHostnameClient;
use crate::config::{load_config, LoggingConfig, ZoneDirectory};
use crate::error::Result;
use crate::register::{AssumeYes, Confirm, Outcome, Registrar, RegistrationRequest};
use crate::report::{
    cancelled, display_certificate_details, display_registration, info, match_summary, ok,
    warning,
};
use crate::types::{OutputFormat, ValidityStatus};
use clap::Parser;
use colored::Colorize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "custom-hostname")]
#[command(
    version,
    about = "Validate a certificate/key pair and add it as a custom hostname",
    long_about = None
)]
pub struct Cli {
    #[arg(short = 'n', long, help = "The hostname to add as a custom hostname")]
    pub hostname: String,

    #[arg(short, long, help = "The origin of the hostname")]
    pub origin: String,

    #[arg(short, long, help = "The certificate file to upload")]
    pub certificate: PathBuf,

    #[arg(short, long, help = "The key file to upload")]
    pub key: PathBuf,

    #[arg(short, long, help = "The zone to add the custom hostname to")]
    pub zone: String,

    #[arg(
        long,
        env = "CUSTOM_HOSTNAME_CONFIG",
        default_value = "config/config.json",
        help = "Configuration file (json, yaml or toml)"
    )]
    pub config: PathBuf,

    #[arg(long, help = "Log level (trace/debug/info/warn/error)")]
    pub log_level: Option<String>,

    #[arg(short, long, help = "Add the hostname without asking for confirmation")]
    pub yes: bool,

    #[arg(
        short,
        long,
        default_value = "pretty",
        help = "Certificate summary format: pretty or json"
    )]
    pub format: String,
}

/// Reads the answer to the confirmation prompt from stdin.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        print!("{}", warning(prompt));
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        Ok(is_affirmative(&answer))
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_tracing(&config.logging, cli.log_level.as_deref());

    let format = cli.format.parse::<OutputFormat>()?;
    let zones = ZoneDirectory::from_config(&config)?;
    let client = CustomHostnameClient::new(&config)?;
    let mut registrar = Registrar::new(&config, &zones, &client);

    let request = RegistrationRequest {
        hostname: cli.hostname.clone(),
        origin: cli.origin.clone(),
        certificate_path: cli.certificate.clone(),
        key_path: cli.key.clone(),
        zone: cli.zone.clone(),
    };

    println!(
        "{}\n",
        format!(
            "Analyzing supplied certificate and key for {}...",
            cli.hostname.to_uppercase()
        )
        .cyan()
    );

    let prepared = registrar.prepare(&request).await?;

    for line in match_summary(prepared.decision) {
        println!("{}\n", line);
    }
    println!("{}\n", ok("The certificate and the key match"));

    let status = prepared.certificate.validity_status();
    if status != ValidityStatus::Valid {
        warn!(status = status.name(), "certificate is outside its validity window");
        println!(
            "{}\n",
            warning(&format!("The supplied certificate is {}", status.name().to_lowercase()))
        );
    }

    println!(
        "{}",
        display_certificate_details(&prepared.hostname, &prepared.certificate, format)?
    );
    println!(
        "{}\n",
        info(&format!(
            "The hostname {} does not exist on the {} zone",
            cli.hostname, cli.zone
        ))
    );

    let outcome = if cli.yes {
        registrar.complete(prepared, &mut AssumeYes).await?
    } else {
        registrar.complete(prepared, &mut StdinConfirm).await?
    };

    match outcome {
        Outcome::Registered(registration) => {
            println!();
            println!("{}", display_registration(&cli.hostname, &registration));
        }
        Outcome::Cancelled => {
            println!();
            println!(
                "{}\n",
                cancelled("Adding a custom hostname has been cancelled")
            );
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `--log-level`, then `logging.level`, then `warn`.
fn init_tracing(config: &LoggingConfig, cli_level: Option<&str>) {
    let level = cli_level
        .or(config.level.as_deref())
        .unwrap_or("warn");

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    match config.format.as_deref().unwrap_or("pretty") {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        "compact" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_required_flags() {
        let cli = Cli::try_parse_from([
            "custom-hostname",
            "-n",
            "shop.example.com",
            "-o",
            "origin.example.net",
            "-c",
            "cert.pem",
            "-k",
            "key.pem",
            "-z",
            "example.com",
        ])
        .unwrap();

        assert_eq!(cli.hostname, "shop.example.com");
        assert_eq!(cli.certificate, PathBuf::from("cert.pem"));
        assert_eq!(cli.format, "pretty");
        assert!(!cli.yes);
    }

    #[test]
    fn test_missing_flag_is_rejected() {
        let result = Cli::try_parse_from([
            "custom-hostname",
            "--hostname",
            "shop.example.com",
            "--origin",
            "origin.example.net",
            "--certificate",
            "cert.pem",
            "--key",
            "key.pem",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("yes\n"));
        assert!(is_affirmative("Y\r\n"));
        assert!(!is_affirmative("no\n"));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("sure"));
    }
}
