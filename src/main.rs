#[cfg(feature = "cli")]
use custom_hostname::cli::run_cli;
#[cfg(feature = "cli")]
use custom_hostname::report;

#[cfg(feature = "cli")]
#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run_cli().await {
        eprintln!("{}", report::error(&e.to_string()));
        std::process::exit(e.exit_code());
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary requires the 'cli' feature to be enabled.");
    eprintln!("Build with: cargo build --features cli");
    std::process::exit(1);
}
