// ==========================================================
//  ghostscan - theatrical device scan for the terminal
// ==========================================================

use clap::Parser;
use ghostscan::app::{motion_allowed, ExportOptions, Experience};
use ghostscan::ui::dialogs::advisory_prompt;
use ghostscan::{RevealConfig, ScanError};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ghostscan", version, about = "Theatrical device scan. No harmful actions are performed.")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Geolocation endpoint
    #[arg(long)]
    provider: Option<String>,

    /// Pause after each revealed item, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Override the reported user-agent string
    #[arg(long)]
    user_agent: Option<String>,

    /// Disable rain, typing and progress animations
    #[arg(long)]
    no_motion: bool,

    /// Ask for consent before scanning
    #[arg(long)]
    consent: bool,

    /// Print the diagnostics JSON when done
    #[arg(long)]
    json: bool,

    /// Save diagnostics-<ip>.json into this directory
    #[arg(long, value_name = "DIR")]
    download: Option<PathBuf>,

    /// Copy the diagnostics JSON to the clipboard
    #[arg(long)]
    copy: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let directive = match verbose {
        0 => "ghostscan=warn",
        1 => "ghostscan=info",
        _ => "ghostscan=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<RevealConfig, ScanError> {
    let mut config = match &cli.config {
        Some(path) => RevealConfig::from_file(path)?,
        None => RevealConfig::default(),
    };
    if let Some(provider) = &cli.provider {
        config.provider_url = provider.clone();
    }
    if let Some(delay) = cli.delay_ms {
        config.reveal_delay_ms = delay;
    }
    if cli.user_agent.is_some() {
        config.user_agent = cli.user_agent.clone();
    }
    if cli.no_motion || !motion_allowed() {
        config.reduced_motion = true;
    }
    if cli.consent {
        config.require_consent = true;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), ScanError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(&cli)?;

    let mut stdout = std::io::stdout();
    if config.require_consent && !advisory_prompt(&mut std::io::stdin().lock(), &mut stdout) {
        println!("Aborted.");
        return Ok(());
    }

    let export = ExportOptions {
        print_json: cli.json,
        download_dir: cli.download.clone(),
        copy: cli.copy,
    };

    let experience = Experience::new(config)?;
    let cancel = experience.cancel_token();
    tokio::select! {
        result = experience.run(&mut stdout, &export) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            cancel.cancel();
            println!();
            println!("Interrupted.");
        }
    }
    Ok(())
}
