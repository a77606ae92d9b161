use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use clap::Parser;
use log::LevelFilter;
use netprobe_agent::{fetch_targets, parse_log_level, Config, Prober, Scheduler, ThreadSpawner};
use netprobe_probe::SystemRunner;
use netprobe_telemetry::TelemetryChannel;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

#[derive(Parser)]
#[command(name = "netprobe", version, about = "Network health probe agent")]
struct Cli {
    /// Path to the JSON config file.
    #[arg(long, default_value = netprobe_agent::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Overrides `log_level` from the config file.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    let level = cli
        .log_level
        .as_deref()
        .map(parse_log_level)
        .unwrap_or_else(|| config.level_filter());
    init_logging(level);

    log::info!(
        "netprobe {} starting as {} at {}",
        env!("CARGO_PKG_VERSION"),
        config.hostname,
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    let targets = fetch_targets(&config.targets_endpoint())?;

    let channel = Arc::new(TelemetryChannel::websocket(config.web_socket.clone()));
    // A failed first dial is retried by the first task whose send fails.
    let _ = channel.connect();

    let prober = Arc::new(Prober::new(
        config.hostname.clone(),
        Arc::new(SystemRunner),
        channel,
    ));
    let scheduler = Arc::new(Scheduler::new(prober, targets, Arc::new(ThreadSpawner)));
    scheduler.start()?;
    log::info!("scheduler started");

    loop {
        thread::park();
    }
}

fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_secs()
        .init();
    log::info!("log level set to {level}");
}
